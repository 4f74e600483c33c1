use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Configuration from hub.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    pub hub: HubInfo,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Name of the durable record; the file is `<key>.json`
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// A key must name a single file inside the hub directory.
    pub fn key_is_valid(&self) -> bool {
        let key = self.key.as_str();
        !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(['/', '\\'])
            && !key.chars().any(char::is_control)
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.key)
    }
}

/// Default: see src/cli/handlers/init.rs
fn default_storage_key() -> String {
    "resources".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    /// Category a fresh draft starts with
    #[serde(default)]
    pub default_category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-category colors keyed by label (e.g. `Design = "#44DDFF"`)
    #[serde(default)]
    pub category_colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
            category_colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
