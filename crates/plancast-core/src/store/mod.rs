//! Flat-file persistence: opaque layout blobs and uploaded photos.

pub mod layouts;
pub mod photos;

pub use layouts::LayoutStore;
pub use photos::{PhotoRecord, PhotoStore};

use thiserror::Error;

/// Failure modes of the flat-file stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid identifier {0:?}")]
    InvalidId(String),

    #[error("layout {0:?} not found")]
    NotFound(String),

    #[error("stored layout is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Identifiers become file and directory names; reject anything that could
/// escape the store root.
fn validate_id(id: &str) -> Result<(), StoreError> {
    let escapes = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains('/')
        || id.contains('\\')
        || id.contains('\0');
    if escapes {
        return Err(StoreError::InvalidId(id.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        for id in ["layout-1", "room_2", "a.b", "ROOM-42"] {
            validate_id(id).unwrap_or_else(|e| panic!("{id:?} should be valid: {e}"));
        }
    }

    #[test]
    fn rejects_path_escapes() {
        for id in ["", ".", "..", "a/b", "a\\b", "x\0y"] {
            assert!(
                matches!(validate_id(id), Err(StoreError::InvalidId(_))),
                "{id:?} should be rejected"
            );
        }
    }
}
