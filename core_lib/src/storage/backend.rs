//! The contract every storage backend implements. The gateway only ever
//! talks to `dyn StorageBackend`; persistence, naming, content types, and
//! display modes all live behind this trait.

use async_trait::async_trait;
use thiserror::Error;

use super::models::StoredFile;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("file not found: {name}")]
    NotFound { name: String },

    #[error("invalid file name: {name}")]
    InvalidName { name: String },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// One-time startup initialization. Called explicitly from the process
    /// entry point before the first request, never from a constructor.
    async fn init(&self) -> StorageResult<()>;

    /// Names of all files currently stored, sorted.
    async fn list_all_files(&self) -> StorageResult<Vec<String>>;

    /// Descriptor plus content for one stored file. Fails with `NotFound`
    /// for unknown names.
    async fn get_file(&self, name: &str) -> StorageResult<StoredFile>;

    /// Stores `content` under `name`, replacing any previous content.
    /// `size` is the caller-declared length and must match the bytes
    /// actually received.
    async fn store(&self, name: &str, content: &[u8], size: u64) -> StorageResult<()>;

    /// Removes `name`. Returns `Ok(false)` when the name was not present.
    async fn delete_file(&self, name: &str) -> StorageResult<bool>;
}

/// Rejects names that could escape a filename-keyed namespace. Backends call
/// this before touching their store.
pub(crate) fn validate_name(name: &str) -> StorageResult<()> {
    let invalid = name.is_empty()
        || name.len() > 255
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || name == "."
        || name.contains("..");

    if invalid {
        return Err(StorageError::InvalidName {
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Declared upload sizes come from the client; a mismatch with the bytes
/// actually read means the stream was truncated or padded in transit.
pub(crate) fn check_declared_size(name: &str, content: &[u8], size: u64) -> StorageResult<()> {
    if content.len() as u64 != size {
        return Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "declared size {} does not match received {} bytes for {}",
                size,
                content.len(),
                name
            ),
        )));
    }

    Ok(())
}
