//! Baseline persistence: one JSON document per logical application key.
//!
//! The store keeps at most one snapshot per key; saving overwrites the prior
//! baseline (last writer wins). A missing key is `Ok(None)`, never an error:
//! callers fall back to quality-only evaluation when no baseline exists.

use crate::models::StructuralSnapshot;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("baseline io error: {0}")]
    Io(#[from] io::Error),
    #[error("baseline document is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// File-backed baseline store rooted at a directory.
pub struct BaselineStore {
    dir: PathBuf,
}

impl BaselineStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist `snapshot` under `key`, replacing any prior baseline.
    pub fn save(&self, key: &str, snapshot: &StructuralSnapshot) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_string_pretty(snapshot)?;
        fs::write(self.path_for(key), body)?;
        Ok(())
    }

    /// Load the baseline for `key`, or `None` when none was captured.
    pub fn load(&self, key: &str) -> Result<Option<StructuralSnapshot>, StoreError> {
        let path = self.path_for(key);
        let body = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&body)?))
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Keys become file names; anything outside a safe character set is mapped
/// to `-` so a key can never escape the store directory.
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;

    const PAGE: &str = "<html lang=\"en\"><head><title>Shop</title>\
        <meta name=\"viewport\" content=\"w\">\
        <link rel=\"stylesheet\" href=\"style.css\"></head>\
        <body><button id=\"buy\" class=\"cta primary\">Buy</button>\
        <label for=\"qty\">Qty</label><input id=\"qty\" type=\"number\">\
        <img src=\"hero.png\" alt=\"Hero\">\
        <a href=\"/cart\">Cart</a>\
        <script src=\"app.js\"></script></body></html>";

    #[test]
    fn save_then_load_round_trips_every_field() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BaselineStore::new(tmp.path());
        let snapshot = extract(PAGE, "https://shop.test/");
        store.save("shop", &snapshot).unwrap();
        let loaded = store.load("shop").unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn load_of_absent_key_is_none_not_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BaselineStore::new(tmp.path());
        assert!(store.load("never-captured").unwrap().is_none());
    }

    #[test]
    fn save_overwrites_prior_baseline() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BaselineStore::new(tmp.path());
        let first = extract("<title>v1</title>", "u");
        let second = extract("<title>v2</title>", "u");
        store.save("app", &first).unwrap();
        store.save("app", &second).unwrap();
        let loaded = store.load("app").unwrap().unwrap();
        assert_eq!(loaded.title.as_deref(), Some("v2"));
    }

    #[test]
    fn corrupt_baseline_surfaces_as_store_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BaselineStore::new(tmp.path());
        std::fs::write(store.path_for("bad"), "not json").unwrap();
        assert!(matches!(store.load("bad"), Err(StoreError::Serde(_))));
    }

    #[test]
    fn keys_cannot_escape_the_store_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BaselineStore::new(tmp.path());
        let path = store.path_for("../../etc/passwd");
        assert!(path.starts_with(tmp.path()));
        assert_eq!(sanitize_key(""), "default");
    }
}
