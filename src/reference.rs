//! Reference term storage
//!
//! The reference set is a flat JSON array of lowercase terms. Every
//! reference analysis replaces the file wholesale.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct ReferenceStore {
    path: PathBuf,
}

impl ReferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the terms as a sorted JSON array, creating parent directories.
    pub fn save(&self, terms: &BTreeSet<String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(terms)?;
        fs::write(&self.path, json)?;
        log::info!("Saved {} reference terms to {}", terms.len(), self.path.display());
        Ok(())
    }

    /// Returns an empty set if the file doesn't exist or can't be parsed.
    pub fn load(&self) -> BTreeSet<String> {
        if !self.path.exists() {
            return BTreeSet::new();
        }
        match fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str::<Vec<String>>(&s).map_err(|e| e.to_string()))
        {
            Ok(terms) => terms.into_iter().collect(),
            Err(e) => {
                log::warn!(
                    "Could not load reference terms from {}: {}",
                    self.path.display(),
                    e
                );
                BTreeSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::new(dir.path().join("reference_terms.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_preserves_terms() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::new(dir.path().join("nested").join("terms.json"));
        store.save(&set(&["paging", "kernel"])).unwrap();
        assert_eq!(store.load(), set(&["kernel", "paging"]));
    }

    #[test]
    fn save_overwrites_instead_of_merging() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::new(dir.path().join("terms.json"));
        store.save(&set(&["paging"])).unwrap();
        store.save(&set(&["scheduler"])).unwrap();
        assert_eq!(store.load(), set(&["scheduler"]));
    }

    #[test]
    fn file_is_a_plain_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::new(dir.path().join("terms.json"));
        store.save(&set(&["b", "a"])).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec!["a", "b"]);
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.json");
        fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        assert!(ReferenceStore::new(path).load().is_empty());
    }
}
