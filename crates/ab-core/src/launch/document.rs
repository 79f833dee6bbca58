//! Merge-by-name into the persisted launch file
//!
//! The document is kept as an order-preserving JSON map so that keys and
//! entries the operator wrote come back out exactly where they were. Managed
//! entries are matched by `name`: an existing entry is replaced in place, a
//! new one is appended. Nothing else is touched.

use super::model::LaunchSet;
use crate::io::{DocumentError, atomic_write};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key holding launch configurations
pub const CONFIGURATIONS_KEY: &str = "configurations";
/// Key holding compound configurations
pub const COMPOUNDS_KEY: &str = "compounds";
/// `version` written into newly created files
pub const LAUNCH_FILE_VERSION: &str = "0.2.0";

/// Per-collection merge counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryCounts {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl EntryCounts {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged
    }
}

/// What a merge did to each managed collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub launch: EntryCounts,
    pub compounds: EntryCounts,
}

impl MergeSummary {
    /// True when every managed entry was already present with the same value.
    pub fn is_noop(&self) -> bool {
        self.launch.created + self.launch.updated + self.compounds.created + self.compounds.updated
            == 0
    }
}

/// In-memory launch file
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchDocument {
    root: Map<String, Value>,
}

impl Default for LaunchDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchDocument {
    /// Empty document in the layout VS Code creates.
    pub fn new() -> Self {
        let mut root = Map::new();
        root.insert(
            "version".to_string(),
            Value::String(LAUNCH_FILE_VERSION.to_string()),
        );
        root.insert(CONFIGURATIONS_KEY.to_string(), Value::Array(Vec::new()));
        root.insert(COMPOUNDS_KEY.to_string(), Value::Array(Vec::new()));
        Self { root }
    }

    /// Parse file contents, rejecting anything the merge could damage.
    ///
    /// `path` is only used for error reporting.
    pub fn parse(bytes: &[u8], path: &Path) -> Result<Self, DocumentError> {
        let corrupt = |reason: String| DocumentError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        let value: Value = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
        let Value::Object(root) = value else {
            return Err(corrupt("top-level value is not an object".to_string()));
        };

        for key in [CONFIGURATIONS_KEY, COMPOUNDS_KEY] {
            if let Some(v) = root.get(key) {
                if !v.is_array() {
                    return Err(corrupt(format!("\"{key}\" is not an array")));
                }
            }
        }

        Ok(Self { root })
    }

    /// Load `path`, returning `None` if it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, DocumentError> {
        read_existing(path)?
            .map(|bytes| Self::parse(&bytes, path))
            .transpose()
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn configurations(&self) -> &[Value] {
        self.collection(CONFIGURATIONS_KEY)
    }

    pub fn compounds(&self) -> &[Value] {
        self.collection(COMPOUNDS_KEY)
    }

    pub fn find_configuration(&self, name: &str) -> Option<&Value> {
        self.configurations().iter().find(|e| entry_name(e) == Some(name))
    }

    pub fn find_compound(&self, name: &str) -> Option<&Value> {
        self.compounds().iter().find(|e| entry_name(e) == Some(name))
    }

    fn collection(&self, key: &str) -> &[Value] {
        self.root
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Merge `entries` into the array under `key`, creating it if absent.
    ///
    /// The array is taken out and put back under the same key, so an
    /// existing key keeps its position in the document.
    fn merge_collection(&mut self, key: &str, entries: Vec<(String, Value)>) -> EntryCounts {
        let mut items = match self.root.get_mut(key).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        let counts = merge_entries(&mut items, entries);
        self.root.insert(key.to_string(), Value::Array(items));
        counts
    }

    /// Merge a synthesized set into the document by entry name.
    ///
    /// # Errors
    ///
    /// Fails only if an entry cannot be converted to JSON.
    pub fn merge(&mut self, set: &LaunchSet) -> Result<MergeSummary, serde_json::Error> {
        let launch = set
            .configurations
            .iter()
            .map(|c| serde_json::to_value(c).map(|v| (c.name.clone(), v)))
            .collect::<Result<Vec<_>, _>>()?;
        let compounds = set
            .compounds
            .iter()
            .map(|c| serde_json::to_value(c).map(|v| (c.name.clone(), v)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MergeSummary {
            launch: self.merge_collection(CONFIGURATIONS_KEY, launch),
            compounds: self.merge_collection(COMPOUNDS_KEY, compounds),
        })
    }

    /// Serialize with 4-space indentation and a trailing newline.
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.root.serialize(&mut ser)?;
        out.push(b'\n');
        Ok(out)
    }
}

fn entry_name(entry: &Value) -> Option<&str> {
    entry.get("name").and_then(Value::as_str)
}

/// Equal including key order; `Value` equality alone ignores it.
fn same_entry(a: &Value, b: &Value) -> bool {
    a == b && a.to_string() == b.to_string()
}

fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, DocumentError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(DocumentError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replace-or-append each `(name, value)` into `items`.
///
/// The first entry carrying a managed name is replaced in place; further
/// entries with that same name are dropped so exactly one remains.
fn merge_entries(items: &mut Vec<Value>, entries: Vec<(String, Value)>) -> EntryCounts {
    let mut counts = EntryCounts::default();

    for (name, value) in entries {
        let mut positions = items
            .iter()
            .enumerate()
            .filter(|(_, e)| entry_name(e) == Some(name.as_str()))
            .map(|(i, _)| i);

        match positions.next() {
            Some(first) => {
                let duplicates: Vec<usize> = positions.collect();
                let same = duplicates.is_empty() && same_entry(&items[first], &value);
                items[first] = value;
                if !duplicates.is_empty() {
                    warn!("dropping {} duplicate entries named {name:?}", duplicates.len());
                    for index in duplicates.into_iter().rev() {
                        items.remove(index);
                    }
                }
                if same {
                    counts.unchanged += 1;
                } else {
                    counts.updated += 1;
                }
            }
            None => {
                items.push(value);
                counts.created += 1;
            }
        }
    }

    counts
}

/// Whether the file at the target path existed before the write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// The file did not exist and was created
    Created,
    /// The file existed and was replaced
    Updated,
    /// The file already held exactly these bytes; nothing was written
    Unchanged,
}

/// Result of [`write_launch_file`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub path: PathBuf,
    pub outcome: WriteOutcome,
    pub summary: MergeSummary,
}

/// Merge `set` into the launch file at `path` and write it back atomically.
///
/// A missing file is treated as empty. An unparsable file is never
/// overwritten.
///
/// # Errors
///
/// - `DocumentError::Corrupt` if the existing file cannot be parsed
/// - `DocumentError::Io` / `DocumentError::Serialize` if writing fails
pub fn write_launch_file(path: &Path, set: &LaunchSet) -> Result<WriteReport, DocumentError> {
    let existing = read_existing(path)?;
    let mut document = match &existing {
        Some(bytes) => LaunchDocument::parse(bytes, path)?,
        None => LaunchDocument::new(),
    };

    let serialize_err = |source| DocumentError::Serialize {
        path: path.to_path_buf(),
        source,
    };

    let summary = document.merge(set).map_err(serialize_err)?;
    let bytes = document.to_pretty_bytes().map_err(serialize_err)?;

    if existing.as_deref() == Some(bytes.as_slice()) {
        debug!("{} already up to date", path.display());
        return Ok(WriteReport {
            path: path.to_path_buf(),
            outcome: WriteOutcome::Unchanged,
            summary,
        });
    }

    atomic_write(path, &bytes)?;
    debug!(
        created = summary.launch.created + summary.compounds.created,
        updated = summary.launch.updated + summary.compounds.updated,
        "wrote {}",
        path.display()
    );

    Ok(WriteReport {
        path: path.to_path_buf(),
        outcome: if existing.is_some() {
            WriteOutcome::Updated
        } else {
            WriteOutcome::Created
        },
        summary,
    })
}
