use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// The stored record changed on disk.
    RecordChanged,
}

/// Watches a hub directory for changes to its stored record.
pub struct HubWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl HubWatcher {
    /// Start watching `hub_dir` for changes to `record_path`.
    /// Call `poll()` each tick to drain pending events.
    pub fn start(hub_dir: &Path, record_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let record_name: Option<PathBuf> = record_path.file_name().map(PathBuf::from);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }

                // The atomic write renames a temp file over the record, so
                // match by file name rather than by full path.
                let relevant = event.paths.iter().any(|p| {
                    p.file_name().map(PathBuf::from).as_ref() == record_name.as_ref()
                });
                if relevant {
                    let _ = tx.send(FileEvent::RecordChanged);
                }
            },
            Config::default(),
        )?;

        watcher.watch(hub_dir, RecursiveMode::NonRecursive)?;
        Ok(HubWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll; returns every queued event.
    pub fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}
