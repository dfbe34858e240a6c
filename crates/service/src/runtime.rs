//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so the binary can prepare storage
//! without knowing which backend is configured.

use configs::{StorageBackendKind, StorageConfig};

/// Make sure the local upload root exists when the local backend is selected.
pub async fn ensure_storage(cfg: &StorageConfig) -> anyhow::Result<()> {
    match cfg.backend {
        StorageBackendKind::Local => common::env::ensure_dir(&cfg.local_root).await,
        StorageBackendKind::S3 => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_local_root_only_for_local_backend() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("uploads");
        let mut cfg = StorageConfig { local_root: root.to_string_lossy().into_owned(), ..StorageConfig::default() };

        cfg.backend = StorageBackendKind::S3;
        ensure_storage(&cfg).await?;
        assert!(!root.exists());

        cfg.backend = StorageBackendKind::Local;
        ensure_storage(&cfg).await?;
        assert!(root.is_dir());
        Ok(())
    }
}
