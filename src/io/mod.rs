pub mod config_io;
pub mod hub_io;
pub mod lock;
pub mod recovery;
pub mod storage;
pub mod watcher;
