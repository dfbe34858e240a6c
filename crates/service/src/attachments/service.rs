use std::sync::Arc;

use chrono::Utc;
use models::{service, supporting_file};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::storage::{display_name, storage_key, StorageBackend, StorageError};
use crate::audit;
use crate::auth::Principal;
use crate::catalog::repository;
use crate::errors::ServiceError;

/// One uploaded file, fully buffered.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct AttachmentService {
    db: DatabaseConnection,
    backend: Arc<dyn StorageBackend>,
}

impl AttachmentService {
    pub fn new(db: DatabaseConnection, backend: Arc<dyn StorageBackend>) -> Self { Self { db, backend } }

    pub fn backend_kind(&self) -> &'static str { self.backend.kind() }

    /// Transfer the bytes, then record the metadata row. A row is never
    /// written for a failed transfer.
    #[instrument(skip(self, principal, upload), fields(tenant_id = %principal.tenant_id(), size = upload.bytes.len()))]
    pub async fn upload(&self, principal: &Principal, service_id: Uuid, upload: Upload) -> Result<supporting_file::Model, ServiceError> {
        repository::require_scoped(&self.db, principal.tenant_id(), service_id).await?;
        let file_name = display_name(&upload.file_name).to_string();
        if file_name.is_empty() {
            return Err(ServiceError::validation("file name required"));
        }
        let content_type = upload.content_type.filter(|c| !c.trim().is_empty());

        let key = storage_key(service_id, &file_name);
        let locator = self.backend.store(&key, &upload.bytes, content_type.as_deref()).await?;

        let am = supporting_file::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_id: Set(service_id),
            file_name: Set(file_name),
            file_path: Set(locator.clone()),
            mime_type: Set(content_type),
            uploaded_by: Set(principal.subject().to_string()),
            uploaded_at: Set(Utc::now().into()),
        };
        let row = match am.insert(&self.db).await {
            Ok(row) => row,
            Err(e) => {
                // the bytes would be unreachable without a row
                self.purge(std::slice::from_ref(&locator)).await;
                return Err(e.into());
            }
        };
        info!(file_id = %row.id, locator = %row.file_path, "file_uploaded");
        audit::record(&self.db, principal, audit::FILE_UPLOADED, format!("file {} on service {}", row.id, service_id)).await;
        Ok(row)
    }

    pub async fn list(&self, principal: &Principal, service_id: Uuid) -> Result<Vec<supporting_file::Model>, ServiceError> {
        repository::require_scoped(&self.db, principal.tenant_id(), service_id).await?;
        let rows = supporting_file::Entity::find()
            .filter(supporting_file::Column::ServiceId.eq(service_id))
            .order_by_asc(supporting_file::Column::UploadedAt)
            .order_by_asc(supporting_file::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Remove the stored object, then the metadata row. Storage failures are
    /// logged and do not block the row delete.
    #[instrument(skip(self, principal), fields(tenant_id = %principal.tenant_id(), file_id = %file_id))]
    pub async fn delete(&self, principal: &Principal, file_id: Uuid) -> Result<(), ServiceError> {
        let file = supporting_file::Entity::find_by_id(file_id)
            .join(JoinType::InnerJoin, supporting_file::Relation::Service.def())
            .filter(service::Column::AgencyId.eq(principal.tenant_id()))
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("file"))?;

        self.remove_bytes(&file.file_path).await;

        let res = supporting_file::Entity::delete_by_id(file.id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            // lost a race with another delete
            return Err(ServiceError::not_found("file"));
        }
        info!(locator = %file.file_path, "file_deleted");
        audit::record(&self.db, principal, audit::FILE_DELETED, format!("file {} on service {}", file.id, file.service_id)).await;
        Ok(())
    }

    /// Best-effort removal of stored objects whose rows are already gone.
    pub async fn purge(&self, locators: &[String]) {
        for locator in locators {
            self.remove_bytes(locator).await;
        }
    }

    async fn remove_bytes(&self, locator: &str) {
        match self.backend.delete(locator).await {
            Ok(()) => {}
            Err(StorageError::NotFound(_)) => {
                info!(locator = %locator, "stored object already absent");
            }
            Err(e) => warn!(locator = %locator, error = %e, "stored object delete failed"),
        }
    }
}
