use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::HubConfig;
use crate::model::hub::Hub;

/// Name of the directory that marks a hub
pub const HUB_DIR_NAME: &str = "reshub";

/// Error type for hub discovery and loading
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("not a resource hub: no reshub/ directory found (run `rh init`)")]
    NotAHub,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid storage key {0:?} in hub.toml (expected a plain file name)")]
    InvalidStorageKey(String),
    #[error("could not parse hub.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit hub.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for a `reshub/hub.toml`.
pub fn discover_hub(start: &Path) -> Result<PathBuf, HubError> {
    let mut current = start.to_path_buf();
    loop {
        let hub_dir = current.join(HUB_DIR_NAME);
        if hub_dir.is_dir() && hub_dir.join("hub.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(HubError::NotAHub);
        }
    }
}

/// Load the hub rooted at `root` (its configuration only; the stored
/// record is read by the resource store).
pub fn load_hub(root: &Path) -> Result<Hub, HubError> {
    let hub_dir = root.join(HUB_DIR_NAME);
    if !hub_dir.is_dir() {
        return Err(HubError::NotAHub);
    }

    let config_path = hub_dir.join("hub.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| HubError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: HubConfig = toml::from_str(&config_text)?;
    if !config.storage.key_is_valid() {
        return Err(HubError::InvalidStorageKey(config.storage.key));
    }

    Ok(Hub {
        root: root.to_path_buf(),
        hub_dir,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_hub(dir: &Path) {
        let hub_dir = dir.join(HUB_DIR_NAME);
        fs::create_dir_all(&hub_dir).unwrap();
        fs::write(
            hub_dir.join("hub.toml"),
            "[hub]\nname = \"test\"\n\n[form]\ndefault_category = \"Inspiration\"\n",
        )
        .unwrap();
    }

    #[test]
    fn discover_from_root_and_subdirectory() {
        let tmp = TempDir::new().unwrap();
        create_test_hub(tmp.path());

        assert_eq!(discover_hub(tmp.path()).unwrap(), tmp.path());

        let sub = tmp.path().join("a/b");
        fs::create_dir_all(&sub).unwrap();
        assert_eq!(discover_hub(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn discover_without_hub_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(discover_hub(tmp.path()), Err(HubError::NotAHub)));
    }

    #[test]
    fn load_reads_config() {
        let tmp = TempDir::new().unwrap();
        create_test_hub(tmp.path());

        let hub = load_hub(tmp.path()).unwrap();
        assert_eq!(hub.config.hub.name, "test");
        assert_eq!(
            hub.config.form.default_category,
            crate::model::Category::Inspiration
        );
        assert_eq!(hub.storage_path(), tmp.path().join("reshub/resources.json"));
    }

    #[test]
    fn load_rejects_storage_key_with_path() {
        let tmp = TempDir::new().unwrap();
        let hub_dir = tmp.path().join(HUB_DIR_NAME);
        fs::create_dir_all(&hub_dir).unwrap();
        fs::write(
            hub_dir.join("hub.toml"),
            "[hub]\nname = \"x\"\n\n[storage]\nkey = \"../../elsewhere\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_hub(tmp.path()),
            Err(HubError::InvalidStorageKey(k)) if k == "../../elsewhere"
        ));
    }

    #[test]
    fn load_rejects_bad_config() {
        let tmp = TempDir::new().unwrap();
        let hub_dir = tmp.path().join(HUB_DIR_NAME);
        fs::create_dir_all(&hub_dir).unwrap();
        fs::write(hub_dir.join("hub.toml"), "[form]\ndefault_category = 3\n").unwrap();
        assert!(matches!(
            load_hub(tmp.path()),
            Err(HubError::ConfigParseError(_))
        ));
    }
}
