use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::io::lock::{HubLock, LockError};
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, atomic_write, log_recovery};
use crate::model::hub::Hub;
use crate::model::resource::{Resource, ResourceFields, ResourceId};

/// Version written to every stored record.
pub const SCHEMA_VERSION: u64 = 1;

/// Error type for reading and writing the stored record
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not a valid resource record: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} is not valid UTF-8: {source}")]
    Encoding {
        path: PathBuf,
        source: std::str::Utf8Error,
    },
    #[error("{path} has schema version {found}, newer than supported version {}", SCHEMA_VERSION)]
    UnsupportedVersion { path: PathBuf, found: u64 },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Locked(#[from] LockError),
}

impl PersistenceError {
    /// Whether the record's content was copied to the recovery log
    pub fn content_logged(&self) -> bool {
        matches!(
            self,
            PersistenceError::Malformed { .. }
                | PersistenceError::Encoding { .. }
                | PersistenceError::UnsupportedVersion { .. }
        )
    }
}

/// The collection as read from disk
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub resources: Vec<Resource>,
    /// Next id to allocate; always above every stored id
    pub next_id: u64,
    /// Schema version the record was upgraded from, if it was not current
    pub migrated_from: Option<u64>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Snapshot {
            resources: Vec::new(),
            next_id: 1,
            migrated_from: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    version: u64,
    #[serde(default)]
    next_id: u64,
    resources: Vec<Resource>,
}

#[derive(Serialize)]
struct StoredRecordRef<'a> {
    version: u64,
    next_id: u64,
    resources: &'a [Resource],
}

/// Why a record could not be decoded
#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
    UnsupportedVersion(u64),
}

/// Decode a stored record.
///
/// A bare JSON array is the unversioned layout (records without ids); it is
/// upgraded by assigning ids in stored order.
pub fn decode(text: &str) -> Result<Snapshot, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(DecodeError::Json)?;

    if value.is_array() {
        let legacy: Vec<ResourceFields> =
            serde_json::from_value(value).map_err(DecodeError::Json)?;
        let resources: Vec<Resource> = legacy
            .into_iter()
            .zip(1u64..)
            .map(|(fields, n)| Resource::new(ResourceId(n), fields))
            .collect();
        let next_id = resources.len() as u64 + 1;
        return Ok(Snapshot {
            resources,
            next_id,
            migrated_from: Some(0),
        });
    }

    if let Some(found) = value.get("version").and_then(|v| v.as_u64())
        && found > SCHEMA_VERSION
    {
        return Err(DecodeError::UnsupportedVersion(found));
    }

    let record: StoredRecord = serde_json::from_value(value).map_err(DecodeError::Json)?;
    let max_id = record.resources.iter().map(|r| r.id.0).max().unwrap_or(0);
    let after_max = max_id.checked_add(1).ok_or_else(|| {
        DecodeError::Json(serde::de::Error::custom(format!(
            "resource id {} leaves no room for new ids",
            ResourceId(max_id)
        )))
    })?;
    Ok(Snapshot {
        next_id: record.next_id.max(after_max),
        resources: record.resources,
        migrated_from: (record.version < SCHEMA_VERSION).then_some(record.version),
    })
}

/// Encode the collection as a current-version record (pretty JSON).
pub fn encode(resources: &[Resource], next_id: u64) -> String {
    let record = StoredRecordRef {
        version: SCHEMA_VERSION,
        next_id,
        resources,
    };
    let mut out = serde_json::to_string_pretty(&record).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}

/// The durable record of one hub: a single JSON file rewritten whole on
/// every save.
#[derive(Debug, Clone)]
pub struct HubStorage {
    hub_dir: PathBuf,
    path: PathBuf,
}

impl HubStorage {
    pub fn new(hub_dir: &Path, file_name: &str) -> Self {
        HubStorage {
            hub_dir: hub_dir.to_path_buf(),
            path: hub_dir.join(file_name),
        }
    }

    pub fn for_hub(hub: &Hub) -> Self {
        HubStorage::new(&hub.hub_dir, &hub.config.storage.file_name())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn hub_dir(&self) -> &Path {
        &self.hub_dir
    }

    /// Read the stored record. `Ok(None)` means no record exists yet.
    ///
    /// Unreadable content is copied to the recovery log before the error is
    /// returned, so the next save cannot destroy it.
    pub fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(t) => t,
            Err(e) => {
                let source = e.utf8_error();
                log_recovery(
                    &self.hub_dir,
                    RecoveryEntry::new(RecoveryCategory::Parser, "resource record is not UTF-8")
                        .field("Source", self.file_name())
                        .field("Error", source.to_string())
                        .body(String::from_utf8_lossy(e.as_bytes()).into_owned()),
                );
                return Err(PersistenceError::Encoding {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if text.trim().is_empty() {
            return Ok(None);
        }

        match decode(&text) {
            Ok(snapshot) => {
                if let Some(from) = snapshot.migrated_from {
                    tracing::debug!(
                        path = %self.path.display(),
                        from,
                        to = SCHEMA_VERSION,
                        "upgrading stored record"
                    );
                }
                Ok(Some(snapshot))
            }
            Err(err) => {
                let (description, error) = match &err {
                    DecodeError::Json(e) => ("unreadable resource record", e.to_string()),
                    DecodeError::UnsupportedVersion(v) => {
                        ("unsupported record version", format!("version {}", v))
                    }
                };
                log_recovery(
                    &self.hub_dir,
                    RecoveryEntry::new(RecoveryCategory::Parser, description)
                        .field("Source", self.file_name())
                        .field("Error", error)
                        .body(text),
                );
                Err(match err {
                    DecodeError::Json(source) => PersistenceError::Malformed {
                        path: self.path.clone(),
                        source,
                    },
                    DecodeError::UnsupportedVersion(found) => {
                        PersistenceError::UnsupportedVersion {
                            path: self.path.clone(),
                            found,
                        }
                    }
                })
            }
        }
    }

    /// Overwrite the stored record with the full collection.
    pub fn save(&self, resources: &[Resource], next_id: u64) -> Result<(), PersistenceError> {
        let content = encode(resources, next_id);
        let result = HubLock::acquire_default(&self.hub_dir)
            .map_err(PersistenceError::from)
            .and_then(|_lock| {
                atomic_write(&self.path, content.as_bytes()).map_err(|e| PersistenceError::Write {
                    path: self.path.clone(),
                    source: e,
                })
            });

        if let Err(e) = &result {
            log_recovery(
                &self.hub_dir,
                RecoveryEntry::new(RecoveryCategory::Write, "resource record write failed")
                    .field("Target", self.file_name())
                    .field("Error", e.to_string())
                    .body(content),
            );
        } else {
            tracing::debug!(
                path = %self.path.display(),
                count = resources.len(),
                "saved resource record"
            );
        }
        result
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
