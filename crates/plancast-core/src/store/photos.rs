//! Uploaded photo storage.
//!
//! Photos land under `<root>/photos/<room_id>/` with a server-minted id of
//! the form `{room_id}-{12 hex chars}`. The returned URL is relative to the
//! uploads root so the server can serve it statically.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{StoreError, validate_id};

/// Extensions kept from the original filename; anything else becomes `jpg`.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// A stored photo, as returned to the uploading client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    #[serde(rename = "roomId", alias = "room_id")]
    pub room_id: String,
    /// Original client-supplied filename, or the stored name when absent.
    pub name: String,
    /// Relative URL under the uploads root.
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    /// A store rooted at `<root>/photos`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join("photos"),
        }
    }

    /// Persist uploaded photo bytes for a room.
    ///
    /// Mints the photo id, keeps the original extension only when it is in
    /// the allowed set, and writes the file under the room's directory.
    pub fn save(
        &self,
        room_id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<PhotoRecord, StoreError> {
        validate_id(room_id)?;

        let suffix: [u8; 6] = rand::random();
        let photo_id = format!("{room_id}-{}", hex::encode(suffix));
        let extension = normalized_extension(original_name);
        let file_name = format!("{photo_id}.{extension}");

        let room_dir = self.dir.join(room_id);
        fs::create_dir_all(&room_dir)?;
        fs::write(room_dir.join(&file_name), bytes)?;
        tracing::debug!(room_id, photo_id, "photo stored");

        let name = if original_name.is_empty() {
            file_name.clone()
        } else {
            original_name.to_owned()
        };
        Ok(PhotoRecord {
            id: photo_id,
            room_id: room_id.to_owned(),
            name,
            url: format!("/uploads/photos/{room_id}/{file_name}"),
        })
    }
}

fn normalized_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| "jpg".to_owned())
}
