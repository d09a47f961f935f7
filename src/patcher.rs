//! Path-addressed corrections applied to the raw document before validation.
//!
//! An override table is an ordered list of [`Override`] entries. Each entry is
//! applied against the document as left by the entries before it, so negative
//! sequence indices resolve against the sequence length at that moment.
//!
//! Tables can be authored in Rust (see [`crate::overrides`]) or loaded from a
//! YAML/JSON file with [`load_table`]:
//!
//! ```yaml
//! - path: [paths, "/1/user/-/activities/list.json", get, parameters, 2, enum]
//!   value: [asc, desc]
//! - path: [paths, "/1/user/-/activities/list.json", get, parameters, -1]
//!   value: null   # deletes the addressed node
//! ```

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

/// One step of an override path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Sequence index, negative counts from the end
    Index(i64),
    /// Map key
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<i64> for PathSegment {
    fn from(index: i64) -> Self {
        PathSegment::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Key(k) => write!(f, "{:?}", k),
        }
    }
}

/// A single correction: replace the addressed node, or delete it when
/// `replacement` is `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Override {
    pub path: Vec<PathSegment>,
    #[serde(rename = "value", default)]
    pub replacement: Option<Value>,
}

impl Override {
    pub fn replace(path: Vec<PathSegment>, value: Value) -> Self {
        Self {
            path,
            replacement: Some(value),
        }
    }

    pub fn delete(path: Vec<PathSegment>) -> Self {
        Self {
            path,
            replacement: None,
        }
    }

    /// Renders the path as `[key, index, ...]` for error messages
    pub fn path_display(&self) -> String {
        let segments: Vec<String> = self.path.iter().map(ToString::to_string).collect();
        format!("[{}]", segments.join(", "))
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::Patch {
            path: self.path_display(),
            reason: reason.into(),
        }
    }
}

/// Resolves a possibly negative index against the current sequence length
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        i64::try_from(len).ok()?.checked_add(index)?
    } else {
        index
    };
    usize::try_from(resolved).ok().filter(|i| *i < len)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn step<'v>(
    node: &'v mut Value,
    segment: &PathSegment,
    entry: &Override,
    depth: usize,
) -> Result<&'v mut Value> {
    match (node, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map
            .get_mut(key)
            .ok_or_else(|| entry.error(format!("key {:?} not found at segment {}", key, depth))),
        (Value::Array(seq), PathSegment::Index(index)) => {
            let len = seq.len();
            let resolved = resolve_index(*index, len).ok_or_else(|| {
                entry.error(format!(
                    "index {} out of range for an array of length {} at segment {}",
                    index, len, depth
                ))
            })?;
            Ok(&mut seq[resolved])
        }
        (other, segment) => Err(entry.error(format!(
            "cannot address {} with {} at segment {}",
            kind_of(other),
            segment,
            depth
        ))),
    }
}

/// Applies a single override to `document` in place.
pub fn apply_override(document: &mut Value, entry: &Override) -> Result<()> {
    let Some((last, parents)) = entry.path.split_last() else {
        return Err(entry.error("empty path"));
    };

    let mut node = document;
    for (depth, segment) in parents.iter().enumerate() {
        node = step(node, segment, entry, depth)?;
    }

    let depth = parents.len();
    match (node, last, &entry.replacement) {
        (Value::Object(map), PathSegment::Key(key), None) => {
            map.shift_remove(key)
                .ok_or_else(|| entry.error(format!("key {:?} not found at segment {}", key, depth)))?;
        }
        (Value::Object(map), PathSegment::Key(key), Some(value)) => {
            map.insert(key.clone(), value.clone());
        }
        (Value::Array(seq), PathSegment::Index(index), replacement) => {
            let len = seq.len();
            let resolved = resolve_index(*index, len).ok_or_else(|| {
                entry.error(format!(
                    "index {} out of range for an array of length {} at segment {}",
                    index, len, depth
                ))
            })?;
            match replacement {
                Some(value) => seq[resolved] = value.clone(),
                None => {
                    seq.remove(resolved);
                }
            }
        }
        (other, segment, _) => {
            return Err(entry.error(format!(
                "cannot address {} with {} at segment {}",
                kind_of(other),
                segment,
                depth
            )))
        }
    }
    Ok(())
}

/// Applies every entry of `table` to `document`, in table order.
///
/// Stops at the first entry that does not resolve; the document is then left
/// partially patched and must be discarded by the caller.
pub fn apply(mut document: Value, table: &[Override]) -> Result<Value> {
    debug!("Applying {} overrides", table.len());
    for entry in table {
        debug!("Applying override at {}", entry.path_display());
        apply_override(&mut document, entry)?;
    }
    Ok(document)
}

/// Parses an override table from YAML (or JSON) text
pub fn parse_table(content: &str) -> Result<Vec<Override>> {
    let table: Vec<Override> = serde_yaml::from_str(content)?;
    if let Some(entry) = table.iter().find(|e| e.path.is_empty()) {
        return Err(Error::Config(format!(
            "override entry has an empty path: {}",
            entry.path_display()
        )));
    }
    Ok(table)
}

/// Loads an override table file
pub fn load_table(path: &Path) -> Result<Vec<Override>> {
    debug!("Loading override table from {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_table(&content)
}
