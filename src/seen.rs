//! The durable set of entry identifiers observed in earlier runs.
//!
//! On disk this is a JSON object mapping each identifier to a marker string.
//! New entries are written as `"exists"`; other markers already in the file
//! are kept as they are.  The file is loaded once at startup and rewritten in
//! full at the end of a run that found something new.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Marker stored against identifiers recorded by this program.
pub const EXISTS: &str = "exists";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    entries: BTreeMap<String, String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from `path`.
    ///
    /// A missing file or one with no content is a fresh start.  Anything else
    /// must decode; running on without dedup state would report every entry
    /// as new.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rewrite the whole store at `path`.
    ///
    /// Writes to a temporary file next to `path` and renames it into place, so
    /// an interrupted save leaves the previous store intact.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_vec(self).map_err(|source| StoreError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        write_atomic(path, &json)
    }

    /// Record `id`.  Returns `true` if it was not already present; a present
    /// entry keeps its marker.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        match self.entries.entry(id.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(EXISTS.to_string());
                true
            }
        }
    }

    /// The marker stored for `id`.
    pub fn marker(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Replace `path` with `contents` via temp file + rename in the same directory.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
