//! In-memory storage backend. Used as the fallback when no local root is
//! usable and as the backend of choice in tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::backend::{check_declared_size, validate_name, StorageBackend, StorageError, StorageResult};
use super::models::{DisplayMode, StoredFile};

#[derive(Debug, Clone)]
struct StoredEntry {
    content_type: String,
    display_mode: DisplayMode,
    content: Vec<u8>,
}

#[derive(Clone)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, StoredEntry>>>,
    inline_extensions: Vec<String>,
}

impl MemoryStorage {
    pub fn new(inline_extensions: Vec<String>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            inline_extensions,
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn list_all_files(&self) -> StorageResult<Vec<String>> {
        let entries = self.entries.read();
        let mut names: Vec<String> = entries.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn get_file(&self, name: &str) -> StorageResult<StoredFile> {
        validate_name(name)?;

        let entries = self.entries.read();
        let entry = entries.get(name).ok_or_else(|| StorageError::NotFound {
            name: name.to_string(),
        })?;

        Ok(StoredFile {
            file_name: name.to_string(),
            content_type: entry.content_type.clone(),
            display_mode: entry.display_mode,
            content: entry.content.clone(),
        })
    }

    async fn store(&self, name: &str, content: &[u8], size: u64) -> StorageResult<()> {
        validate_name(name)?;
        check_declared_size(name, content, size)?;

        let entry = StoredEntry {
            content_type: mime_guess::from_path(name)
                .first_or_octet_stream()
                .to_string(),
            display_mode: DisplayMode::for_filename(name, &self.inline_extensions),
            content: content.to_vec(),
        };

        self.entries.write().insert(name.to_string(), entry);
        Ok(())
    }

    async fn delete_file(&self, name: &str) -> StorageResult<bool> {
        validate_name(name)?;
        Ok(self.entries.write().remove(name).is_some())
    }
}
