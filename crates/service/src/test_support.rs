#![cfg(test)]
use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

use crate::attachments::{AttachmentService, LocalFsBackend};
use crate::catalog::{CatalogService, NewService};

/// Fresh, migrated in-memory database per test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Catalog wired to a local backend under a temp dir that lives as long as the returned guard.
pub async fn new_catalog_with_root(db: &DatabaseConnection) -> anyhow::Result<(CatalogService, Arc<AttachmentService>, TempDir)> {
    let root = tempfile::tempdir()?;
    let files = Arc::new(AttachmentService::new(db.clone(), Arc::new(LocalFsBackend::new(root.path()))));
    Ok((CatalogService::new(db.clone(), files.clone()), files, root))
}

/// Catalog for tests that never touch file bytes.
pub async fn new_catalog(db: &DatabaseConnection) -> anyhow::Result<CatalogService> {
    let backend = Arc::new(LocalFsBackend::new(std::env::temp_dir().join("catalog-tests-unused")));
    let files = Arc::new(AttachmentService::new(db.clone(), backend));
    Ok(CatalogService::new(db.clone(), files))
}

pub fn service_named(name: &str) -> NewService { NewService::named(name) }
