//! Opaque layout blob store.
//!
//! Layouts are persisted verbatim as pretty-printed JSON under
//! `<root>/layouts/<id>.json`. Nothing validates the blob's shape, on write
//! or on read. Concurrent saves to the same id are last-write-wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{StoreError, validate_id};

#[derive(Debug, Clone)]
pub struct LayoutStore {
    dir: PathBuf,
}

impl LayoutStore {
    /// A store rooted at `<root>/layouts`. Directories are created lazily on
    /// first save.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join("layouts"),
        }
    }

    fn path_for(&self, layout_id: &str) -> Result<PathBuf, StoreError> {
        validate_id(layout_id)?;
        Ok(self.dir.join(format!("{layout_id}.json")))
    }

    /// Persist an arbitrary JSON value under `layout_id`, returning the path
    /// written.
    pub fn save(&self, layout_id: &str, payload: &Value) -> Result<PathBuf, StoreError> {
        let path = self.path_for(layout_id)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serde_json::to_string_pretty(payload)?)?;
        tracing::debug!(layout_id, path = %path.display(), "layout saved");
        Ok(path)
    }

    /// Read a stored layout back, untyped.
    pub fn load(&self, layout_id: &str) -> Result<Value, StoreError> {
        let path = self.path_for(layout_id)?;
        let contents = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(layout_id.to_owned())
            } else {
                StoreError::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}
