//! Starred image list.
//!
//! The starred list is a JSON array persisted at a single path. Each element
//! is an arbitrary object supplied by the browser; the only field the server
//! looks at is `image_path`, which identifies the element. The array is kept
//! newest-first and holds at most one element per `image_path`.
//!
//! Nothing is cached between calls. Every operation loads the file, works on
//! the in-memory copy, and (for mutations) writes the whole array back.
//! A missing file reads as an empty list.
//!
//! ## Serialisation
//!
//! Load-modify-store cycles run under one mutex per [`StarredStore`], so two
//! requests toggling at once cannot drop each other's update. Writes go to a
//! sibling temp file that is then renamed over the target. Processes sharing
//! a file are not coordinated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarredError {
    #[error("Failed to access starred list {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Starred list {path} is not a valid JSON array of objects: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid starred entry: {0}")]
    Validation(String),
}

/// One starred image: a caller-defined JSON object keyed by `image_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarredImage(Map<String, Value>);

impl StarredImage {
    /// The identity key, if present and a string.
    pub fn image_path(&self) -> Option<&str> {
        self.0.get("image_path").and_then(Value::as_str)
    }
}

impl TryFrom<Value> for StarredImage {
    type Error = StarredError;

    /// Accepts only objects with a string `image_path`.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(StarredError::Validation(
                "image_data must be a JSON object".into(),
            ));
        };
        let image = StarredImage(map);
        match image.image_path() {
            Some(path) if !path.is_empty() => Ok(image),
            _ => Err(StarredError::Validation(
                "image_data.image_path must be a non-empty string".into(),
            )),
        }
    }
}

/// File-backed starred list.
#[derive(Debug)]
pub struct StarredStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StarredStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current list, newest first.
    pub fn list(&self) -> Result<Vec<StarredImage>, StarredError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.load()
    }

    /// Star `entry` if its `image_path` is not starred, unstar it otherwise.
    ///
    /// Returns the new state: `true` when the image is now starred. New
    /// stars go to the front of the list.
    pub fn toggle(&self, entry: StarredImage) -> Result<bool, StarredError> {
        let key = entry
            .image_path()
            .ok_or_else(|| StarredError::Validation("entry has no image_path".into()))?
            .to_string();

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut starred = self.load()?;

        let is_starred = match starred.iter().position(|s| s.image_path() == Some(key.as_str())) {
            Some(index) => {
                starred.remove(index);
                false
            }
            None => {
                starred.insert(0, entry);
                true
            }
        };

        self.save(&starred)?;
        tracing::info!(image_path = %key, is_starred, "toggled star");
        Ok(is_starred)
    }

    /// Drop every element whose `image_path` equals `image_path`.
    ///
    /// Succeeds whether or not the image was starred.
    pub fn remove(&self, image_path: &str) -> Result<(), StarredError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut starred = self.load()?;
        let before = starred.len();
        starred.retain(|s| s.image_path() != Some(image_path));
        self.save(&starred)?;
        if starred.len() != before {
            tracing::info!(image_path = %image_path, "removed from starred list");
        }
        Ok(())
    }

    fn load(&self) -> Result<Vec<StarredImage>, StarredError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StarredError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| StarredError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, starred: &[StarredImage]) -> Result<(), StarredError> {
        let io_err = |source| StarredError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_vec(starred).map_err(|source| StarredError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, json).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn star(path: &str) -> StarredImage {
        StarredImage::try_from(json!({ "image_path": path, "txt_path": "x.txt" })).unwrap()
    }

    fn paths(list: &[StarredImage]) -> Vec<&str> {
        list.iter().map(|s| s.image_path().unwrap()).collect()
    }

    fn store(tmp: &TempDir) -> StarredStore {
        StarredStore::new(tmp.path().join("starred_images.json"))
    }

    // =========================================================================
    // StarredImage
    // =========================================================================

    #[test]
    fn entry_requires_object() {
        assert!(StarredImage::try_from(json!("a.jpg")).is_err());
        assert!(StarredImage::try_from(json!(["a.jpg"])).is_err());
    }

    #[test]
    fn entry_requires_string_image_path() {
        assert!(StarredImage::try_from(json!({})).is_err());
        assert!(StarredImage::try_from(json!({ "image_path": 3 })).is_err());
        assert!(StarredImage::try_from(json!({ "image_path": "" })).is_err());
    }

    #[test]
    fn entry_keeps_extra_fields() {
        let entry =
            StarredImage::try_from(json!({ "image_path": "a.jpg", "annotation": "hi" })).unwrap();
        assert_eq!(serde_json::to_value(&entry).unwrap()["annotation"], "hi");
    }

    // =========================================================================
    // list
    // =========================================================================

    #[test]
    fn list_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        assert!(store.list().unwrap().is_empty());
        // Reading does not create the file
        assert!(!store.path().exists());
    }

    #[test]
    fn list_corrupt_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.list(), Err(StarredError::Parse { .. })));
    }

    #[test]
    fn list_non_array_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        fs::write(store.path(), r#"{"image_path": "a.jpg"}"#).unwrap();
        assert!(matches!(store.list(), Err(StarredError::Parse { .. })));
    }

    #[test]
    fn list_reads_existing_file_in_order() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        fs::write(
            store.path(),
            r#"[{"image_path":"b.jpg"},{"image_path":"a.jpg","extra":1}]"#,
        )
        .unwrap();

        let list = store.list().unwrap();
        assert_eq!(paths(&list), vec!["b.jpg", "a.jpg"]);
        assert_eq!(serde_json::to_value(&list[1]).unwrap()["extra"], 1);
    }

    // =========================================================================
    // toggle
    // =========================================================================

    #[test]
    fn toggle_stars_then_unstars() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        assert!(store.toggle(star("a.jpg")).unwrap());
        assert_eq!(paths(&store.list().unwrap()), vec!["a.jpg"]);

        assert!(!store.toggle(star("a.jpg")).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn toggle_inserts_newest_first() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.toggle(star("A")).unwrap();
        store.toggle(star("B")).unwrap();
        assert_eq!(paths(&store.list().unwrap()), vec!["B", "A"]);
    }

    #[test]
    fn double_toggle_restores_membership_and_order() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        for p in ["c", "b", "a"] {
            store.toggle(star(p)).unwrap();
        }
        let before = store.list().unwrap();

        store.toggle(star("z")).unwrap();
        store.toggle(star("z")).unwrap();

        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn unstar_removes_from_middle_keeping_order() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        for p in ["c", "b", "a"] {
            store.toggle(star(p)).unwrap();
        }

        store.toggle(star("b")).unwrap();
        assert_eq!(paths(&store.list().unwrap()), vec!["a", "c"]);
    }

    #[test]
    fn unstar_matches_on_image_path_only() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        store.toggle(star("a.jpg")).unwrap();

        let different_payload =
            StarredImage::try_from(json!({ "image_path": "a.jpg", "annotation": "new" })).unwrap();
        assert!(!store.toggle(different_payload).unwrap());
    }

    #[test]
    fn toggle_persists_to_disk() {
        let tmp = TempDir::new().unwrap();
        store(&tmp).toggle(star("a.jpg")).unwrap();

        let on_disk: Value =
            serde_json::from_slice(&fs::read(tmp.path().join("starred_images.json")).unwrap())
                .unwrap();
        assert_eq!(on_disk, json!([{ "image_path": "a.jpg", "txt_path": "x.txt" }]));
        assert!(!tmp.path().join("starred_images.json.tmp").exists());
    }

    #[test]
    fn toggle_on_corrupt_file_fails_without_overwriting() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        fs::write(store.path(), "garbage").unwrap();

        assert!(store.toggle(star("a.jpg")).is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "garbage");
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let store = StarredStore::new(tmp.path().join("state/nested/starred.json"));
        store.toggle(star("a.jpg")).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn concurrent_toggles_are_not_lost() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(store(&tmp));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.toggle(star(&format!("img-{i}.jpg"))).unwrap())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(store.list().unwrap().len(), 16);
    }

    // =========================================================================
    // remove
    // =========================================================================

    #[test]
    fn remove_drops_matching_entry() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        store.toggle(star("a")).unwrap();
        store.toggle(star("b")).unwrap();

        store.remove("a").unwrap();
        assert_eq!(paths(&store.list().unwrap()), vec!["b"]);
    }

    #[test]
    fn remove_unstarred_is_ok() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        store.toggle(star("a")).unwrap();

        store.remove("never-starred").unwrap();
        assert_eq!(paths(&store.list().unwrap()), vec!["a"]);
    }

    #[test]
    fn remove_with_missing_file_writes_empty_list() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.remove("a").unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn remove_drops_every_duplicate() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        fs::write(
            store.path(),
            r#"[{"image_path":"a"},{"image_path":"b"},{"image_path":"a"}]"#,
        )
        .unwrap();

        store.remove("a").unwrap();
        assert_eq!(paths(&store.list().unwrap()), vec!["b"]);
    }
}
