use std::fs;
use std::path::Path;

use crate::io::hub_io::HubError;
use crate::io::recovery::atomic_write;
use crate::model::category::Category;
use crate::model::config::HubConfig;

/// Read hub.toml, returning both the parsed config and the toml_edit
/// document for round-trip-safe editing.
pub fn read_config(hub_dir: &Path) -> Result<(HubConfig, toml_edit::DocumentMut), HubError> {
    let config_path = hub_dir.join("hub.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| HubError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: HubConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the document back, preserving comments and formatting.
pub fn write_config(hub_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), HubError> {
    let config_path = hub_dir.join("hub.toml");
    atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| HubError::ReadError {
        path: config_path,
        source: e,
    })
}

/// Set `[form] default_category`
pub fn set_default_category(doc: &mut toml_edit::DocumentMut, category: Category) {
    if !doc.contains_key("form") {
        doc["form"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["form"]["default_category"] = toml_edit::value(category.label());
}
