use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::io::lock::try_flock;

/// Log size above which old entries are trimmed on append (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Default age in days before entries become prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- reshub recovery log: append-only copies of data reshub could not keep.
     Unreadable resource records, unsaved writes and deleted resources
     end up here. View with: rh recovery
     Prune old entries: rh recovery prune
     Safe to delete once you have checked it. -->

---
";

const HEADER_SEP: &str = " | ";

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A stored record could not be read
    Parser,
    /// A write to the stored record failed
    Write,
    /// A resource was deleted
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parser => write!(f, "parser"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "parser" => Some(RecoveryCategory::Parser),
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {}{}{}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            HEADER_SEP,
            self.category,
            self.description,
        );

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push_str("\n---\n");
        out
    }

    /// JSON form for `rh recovery --json`.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }

    pub fn to_display_markdown(&self) -> String {
        self.to_markdown()
    }
}

pub fn recovery_log_path(hub_dir: &Path) -> PathBuf {
    hub_dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append an entry to the log. Failures are reported through `tracing` and
/// otherwise ignored, so logging never masks the error being recorded.
pub fn log_recovery(hub_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(hub_dir, &entry) {
        tracing::warn!(
            error = %e,
            category = %entry.category,
            "could not write to recovery log"
        );
    }
}

fn log_recovery_inner(hub_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(hub_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        try_inline_trim(&path);
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Drop entries older than the prune age when the log grows too large.
/// Skipped if another process holds the log.
fn try_inline_trim(path: &Path) {
    let file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(f) => f,
        Err(_) => return,
    };
    if try_flock(&file).is_err() {
        return;
    }

    let mut content = String::new();
    if io::BufReader::new(&file).read_to_string(&mut content).is_err() {
        return;
    }

    let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
    let trimmed = prune_entries_before(&content, &cutoff);
    if trimmed.len() < content.len()
        && let Ok(mut f) = File::create(path)
    {
        let _ = f.write_all(trimmed.as_bytes());
    }
}

/// Read entries, most recent first.
pub fn read_recovery_entries(
    hub_dir: &Path,
    limit: Option<usize>,
    since: Option<DateTime<Utc>>,
) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(hub_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);
    if let Some(since_dt) = since {
        entries.retain(|e| e.timestamp >= since_dt);
    }
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }
    entries.reverse();
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(header) = line.strip_prefix("## ") else {
            continue;
        };
        let Some((timestamp, category, description)) = parse_entry_header(header) else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body = String::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                continue;
            }
            if line == "---" || line.starts_with("## ") {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body,
        });
    }

    entries
}

/// Parse `<timestamp> | <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(HEADER_SEP)?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let (category_str, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}

/// Remove entries older than `before` (default: [`PRUNE_AGE_DAYS`]), or all
/// entries. Returns the number removed.
pub fn prune_recovery(
    hub_dir: &Path,
    before: Option<DateTime<Utc>>,
    all: bool,
) -> io::Result<usize> {
    let path = recovery_log_path(hub_dir);
    if !path.exists() {
        return Ok(0);
    }

    let file = OpenOptions::new().read(true).write(true).open(&path)?;
    let mut locked = false;
    for _ in 0..10 {
        if try_flock(&file).is_ok() {
            locked = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    if !locked {
        return Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            "recovery log is in use, try again later",
        ));
    }

    let content = std::fs::read_to_string(&path)?;
    let original_count = parse_entries(&content).len();

    if all {
        std::fs::write(&path, FILE_HEADER)?;
        return Ok(original_count);
    }

    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));
    let trimmed = prune_entries_before(&content, &cutoff);
    let new_count = parse_entries(&trimmed).len();
    std::fs::write(&path, &trimmed)?;
    Ok(original_count - new_count)
}

/// Keep the file header and every entry stamped at or after `cutoff`.
fn prune_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let mut result = String::new();
    let mut current_entry = String::new();
    let mut current_timestamp: Option<DateTime<Utc>> = None;
    let mut in_header = true;

    for line in content.lines() {
        if in_header {
            result.push_str(line);
            result.push('\n');
            if line == "---" {
                in_header = false;
            }
            continue;
        }

        if let Some(stripped) = line.strip_prefix("## ") {
            if current_timestamp.is_some_and(|ts| ts >= *cutoff) {
                result.push_str(&current_entry);
            }
            current_entry.clear();
            current_timestamp = parse_entry_header(stripped).map(|(ts, _, _)| ts);
        }
        current_entry.push_str(line);
        current_entry.push('\n');
    }

    if current_timestamp.is_some_and(|ts| ts >= *cutoff) {
        result.push_str(&current_entry);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_entry(category: RecoveryCategory, desc: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry::new(category, desc)
            .field("Source", "resources.json")
            .field("Error", "expected value at line 1 column 1")
            .body(body)
    }

    #[test]
    fn entry_formatting() {
        let md = make_entry(RecoveryCategory::Parser, "unreadable record", "not json").to_markdown();
        assert!(md.starts_with("## "));
        assert!(md.contains(" | parser: unreadable record"));
        assert!(md.contains("Source: resources.json"));
        assert!(md.contains("```text\nnot json\n```"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn log_and_read_back() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Write, "write failed", "[]"));
        log_recovery(
            tmp.path(),
            make_entry(RecoveryCategory::Delete, "resource R-001 deleted", "{}"),
        );

        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, RecoveryCategory::Delete);
        assert_eq!(entries[1].category, RecoveryCategory::Write);
        assert_eq!(entries[1].body, "[]");
        assert_eq!(
            entries[1].fields[0],
            ("Source".to_string(), "resources.json".to_string())
        );
    }

    #[test]
    fn header_written_once() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Parser, "a", ""));
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Parser, "b", ""));
        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(content.starts_with("<!-- reshub recovery log"));
        assert_eq!(content.matches("reshub recovery log").count(), 1);
    }

    #[test]
    fn read_with_limit_returns_most_recent() {
        let tmp = TempDir::new().unwrap();
        for i in 0..5 {
            log_recovery(
                tmp.path(),
                make_entry(RecoveryCategory::Write, &format!("entry {}", i), ""),
            );
        }
        let entries = read_recovery_entries(tmp.path(), Some(2), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "entry 4");
        assert_eq!(entries[1].description, "entry 3");
    }

    #[test]
    fn prune_all_keeps_header() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Write, "x", "body"));
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Write, "y", "body"));

        assert_eq!(prune_recovery(tmp.path(), None, true).unwrap(), 2);
        assert!(read_recovery_entries(tmp.path(), None, None).is_empty());
        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert_eq!(content, FILE_HEADER);
    }

    #[test]
    fn prune_before_cutoff_keeps_recent() {
        let old = RecoveryEntry {
            timestamp: Utc::now() - chrono::Duration::days(60),
            ..make_entry(RecoveryCategory::Parser, "old", "stale")
        };
        let recent = make_entry(RecoveryCategory::Parser, "recent", "fresh");
        let content = format!("{}{}{}", FILE_HEADER, old.to_markdown(), recent.to_markdown());

        let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
        let trimmed = prune_entries_before(&content, &cutoff);
        let entries = parse_entries(&trimmed);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "recent");
        assert!(trimmed.starts_with(FILE_HEADER));
    }

    #[test]
    fn prune_without_log_is_zero() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(prune_recovery(tmp.path(), None, false).unwrap(), 0);
    }

    #[test]
    fn body_with_separator_lines_survives() {
        let tmp = TempDir::new().unwrap();
        let body = "{\n---\n## not a header\n}";
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Parser, "odd body", body));
        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].body, body);
    }

    #[test]
    fn parse_header_rejects_unknown_category() {
        assert!(parse_entry_header("2026-01-02T03:04:05Z | conflict: x").is_none());
        assert!(parse_entry_header("garbage").is_none());
        let (_, cat, desc) = parse_entry_header("2026-01-02T03:04:05Z | write: disk full").unwrap();
        assert_eq!(cat, RecoveryCategory::Write);
        assert_eq!(desc, "disk full");
    }

    #[test]
    fn atomic_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resources.json");
        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn entry_to_json_has_fields() {
        let json = make_entry(RecoveryCategory::Delete, "gone", "{}").to_json();
        assert_eq!(json["category"], "delete");
        assert_eq!(json["fields"]["Source"], "resources.json");
        assert_eq!(json["body"], "{}");
    }
}
