//! Attachment manager: binds uploaded bytes to a service.
//!
//! Physical storage sits behind [`StorageBackend`]; the concrete backend is
//! chosen once from configuration by [`backend_from_config`].

mod local;
mod s3;
mod service;
mod storage;

use std::sync::Arc;

use configs::{StorageBackendKind, StorageConfig};

pub use local::LocalFsBackend;
pub use s3::S3Backend;
pub use service::{AttachmentService, Upload};
pub use storage::{storage_key, StorageBackend, StorageError};

pub async fn backend_from_config(cfg: &StorageConfig) -> Result<Arc<dyn StorageBackend>, StorageError> {
    let backend: Arc<dyn StorageBackend> = match cfg.backend {
        StorageBackendKind::Local => Arc::new(LocalFsBackend::new(&cfg.local_root)),
        StorageBackendKind::S3 => Arc::new(S3Backend::from_config(cfg).await?),
    };
    tracing::info!(backend = backend.kind(), "storage backend selected");
    Ok(backend)
}
