use std::path::PathBuf;

use super::config::HubConfig;

/// A discovered resource hub on disk
#[derive(Debug, Clone)]
pub struct Hub {
    /// Directory containing `reshub/`
    pub root: PathBuf,
    /// The `reshub/` directory itself
    pub hub_dir: PathBuf,
    pub config: HubConfig,
}

impl Hub {
    /// Path of the durable record for this hub
    pub fn storage_path(&self) -> PathBuf {
        self.hub_dir.join(self.config.storage.file_name())
    }
}
