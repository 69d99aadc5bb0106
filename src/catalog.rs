//! Embedded resource catalog.
//!
//! The generator bakes a fixed set of named resources into the packaged
//! executable. The catalog is built once before the relay starts and is
//! read-only for the life of the process, so sessions can share it without
//! locking. Lookup is exact-match on the name; the host does not validate key
//! shape.

use std::collections::HashMap;
use std::path::PathBuf;

/// One embedded resource.
#[derive(Debug, Clone)]
pub enum ResourceEntry {
    /// Content embedded directly in the binary image.
    Inline(Vec<u8>),
    /// Content extracted next to the binary by the generator; read on demand.
    File(PathBuf),
}

/// Outcome of one catalog lookup, consumed by the relay's response encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Vec<u8>),
    NotFound,
    IoError(String),
}

/// Fixed name → content mapping supplied by the generator.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    entries: HashMap<String, ResourceEntry>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog of inline entries, the common generated shape.
    pub fn from_entries(entries: &[(&str, &[u8])]) -> Self {
        let mut catalog = Self::new();
        for (name, content) in entries {
            catalog.insert_inline(name, content.to_vec());
        }
        catalog
    }

    pub fn insert_inline(&mut self, name: &str, content: Vec<u8>) {
        self.entries
            .insert(name.to_string(), ResourceEntry::Inline(content));
    }

    pub fn insert_file(&mut self, name: &str, path: PathBuf) {
        self.entries
            .insert(name.to_string(), ResourceEntry::File(path));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve one request. File-backed entries can fail to read; that failure
    /// is a per-request result, never a panic or a session-ending error.
    pub fn lookup(&self, name: &str) -> Lookup {
        match self.entries.get(name) {
            None => Lookup::NotFound,
            Some(ResourceEntry::Inline(content)) => Lookup::Found(content.clone()),
            Some(ResourceEntry::File(path)) => match std::fs::read(path) {
                Ok(content) => Lookup::Found(content),
                Err(e) => Lookup::IoError(format!("failed to read `{}`: {e}", path.display())),
            },
        }
    }
}
