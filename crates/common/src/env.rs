//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure a writable directory exists, creating it (and parents) when missing.
pub async fn ensure_dir(dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let dir = dir.as_ref();
    if tokio::fs::metadata(dir).await.is_err() {
        warn!(dir = %dir.display(), "directory missing; creating it");
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    info!(dir = %dir.display(), "directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_dir;

    #[tokio::test]
    async fn creates_nested_directories() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let nested = tmp.path().join("uploads").join("a");
        ensure_dir(&nested).await?;
        assert!(nested.is_dir());
        // second call is a no-op
        ensure_dir(&nested).await?;
        Ok(())
    }
}
