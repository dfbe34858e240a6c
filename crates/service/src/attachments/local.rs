use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::storage::{StorageBackend, StorageError};

/// Stores files under a root directory; the locator is `<root>/<key>`.
pub struct LocalFsBackend {
    root: PathBuf,
}

impl LocalFsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path { &self.root }

    fn path_for_key(&self, key: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(key);
        if rel.is_absolute() || rel.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(StorageError::InvalidLocator(key.to_string()));
        }
        Ok(self.root.join(rel))
    }

    /// Locators outside the root, or with `..` segments, are refused.
    fn path_for_locator(&self, locator: &str) -> Result<PathBuf, StorageError> {
        let path = PathBuf::from(locator);
        if path.components().any(|c| matches!(c, Component::ParentDir)) || !path.starts_with(&self.root) {
            return Err(StorageError::InvalidLocator(locator.to_string()));
        }
        Ok(path)
    }
}

#[async_trait]
impl StorageBackend for LocalFsBackend {
    fn kind(&self) -> &'static str { "local" }

    async fn store(&self, key: &str, bytes: &[u8], _content_type: Option<&str>) -> Result<String, StorageError> {
        let full_path = self.path_for_key(key)?;
        debug!(key = %key, size = bytes.len(), "local_store_write");
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // temp file + rename so a failed write never leaves a partial object
        let file_name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| StorageError::InvalidLocator(key.to_string()))?;
        let temp_path = full_path.with_file_name(format!("{file_name}.part"));
        let write = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &full_path).await
        };
        if let Err(e) = write.await {
            warn!(path = %temp_path.display(), error = %e, "local_store_write_failed");
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(full_path.to_string_lossy().into_owned())
    }

    async fn delete(&self, locator: &str) -> Result<(), StorageError> {
        let path = self.path_for_locator(locator)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(locator.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_then_delete() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let backend = LocalFsBackend::new(tmp.path());
        let locator = backend.store("svc/abc_notes.txt", b"hello", Some("text/plain")).await?;
        assert_eq!(PathBuf::from(&locator), tmp.path().join("svc/abc_notes.txt"));
        assert_eq!(tokio::fs::read(&locator).await?, b"hello");
        assert!(!tmp.path().join("svc/abc_notes.txt.part").exists());

        backend.delete(&locator).await?;
        assert!(matches!(backend.delete(&locator).await, Err(StorageError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn refuses_paths_outside_root() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let backend = LocalFsBackend::new(tmp.path().join("root"));
        assert!(matches!(backend.store("../escape.txt", b"x", None).await, Err(StorageError::InvalidLocator(_))));
        assert!(matches!(backend.store("/abs.txt", b"x", None).await, Err(StorageError::InvalidLocator(_))));

        let outside = tmp.path().join("other.txt");
        tokio::fs::write(&outside, b"keep").await?;
        let err = backend.delete(&outside.to_string_lossy()).await;
        assert!(matches!(err, Err(StorageError::InvalidLocator(_))));
        let sneaky = format!("{}/../other.txt", tmp.path().join("root").display());
        assert!(matches!(backend.delete(&sneaky).await, Err(StorageError::InvalidLocator(_))));
        assert!(outside.exists());
        Ok(())
    }
}
