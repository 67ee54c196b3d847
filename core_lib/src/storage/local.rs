//! Disk-backed storage. Every stored file is one regular file under the
//! configured root directory, keyed by its name.

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;

use async_trait::async_trait;

use super::backend::{check_declared_size, validate_name, StorageBackend, StorageError, StorageResult};
use super::models::{DisplayMode, StoredFile};

#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    inline_extensions: Vec<String>,
}

impl LocalStorage {
    pub fn new(root: PathBuf, inline_extensions: Vec<String>) -> Self {
        Self {
            root,
            inline_extensions,
        }
    }

    fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn init(&self) -> StorageResult<()> {
        if !self.root.exists() {
            async_fs::create_dir_all(&self.root).await?;
        }
        Ok(())
    }

    async fn list_all_files(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = async_fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    async fn get_file(&self, name: &str) -> StorageResult<StoredFile> {
        let path = self.path_for(name)?;

        let content = match async_fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        let content_type = mime_guess::from_path(name)
            .first_or_octet_stream()
            .to_string();

        Ok(StoredFile {
            file_name: name.to_string(),
            content_type,
            display_mode: DisplayMode::for_filename(name, &self.inline_extensions),
            content,
        })
    }

    async fn store(&self, name: &str, content: &[u8], size: u64) -> StorageResult<()> {
        let path = self.path_for(name)?;
        check_declared_size(name, content, size)?;

        let mut file = async_fs::File::create(&path).await?;
        file.write_all(content).await?;
        file.sync_all().await?;

        tracing::debug!(name = %name, size = size, "stored file");
        Ok(())
    }

    async fn delete_file(&self, name: &str) -> StorageResult<bool> {
        let path = self.path_for(name)?;

        match async_fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
