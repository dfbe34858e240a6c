use std::sync::Arc;

use chrono::Utc;
use models::types::UserIds;
use models::{client_service, service, service_checklist, service_subtask, supporting_file};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{active_model, normalize, NewService, ServiceSettingsPatch, ServiceView};
use super::repository;
use crate::attachments::AttachmentService;
use crate::audit;
use crate::auth::Principal;
use crate::errors::ServiceError;
use crate::options::{checklist, subtask};

/// Owns the service aggregate: the service row plus its checklist items,
/// subtasks, client links and file records.
pub struct CatalogService {
    db: DatabaseConnection,
    attachments: Arc<AttachmentService>,
}

impl CatalogService {
    pub fn new(db: DatabaseConnection, attachments: Arc<AttachmentService>) -> Self { Self { db, attachments } }

    /// Create a service, with optional initial checklist items and subtasks, in one transaction.
    #[instrument(skip(self, principal, input), fields(tenant_id = %principal.tenant_id(), subject = %principal.subject()))]
    pub async fn create(&self, principal: &Principal, input: NewService) -> Result<ServiceView, ServiceError> {
        let tenant_id = principal.tenant_id();
        let mut model = service::Model {
            id: Uuid::new_v4(),
            agency_id: tenant_id,
            name: input.name,
            is_enabled: input.is_enabled,
            is_checklist_completion_required: input.is_checklist_completion_required,
            is_recurring: input.is_recurring,
            auto_task_creation_frequency: input.auto_task_creation_frequency,
            target_date_creation_date: input.target_date_creation_date,
            assign_auto_tasks_to_users_of_respective_clients: input.assign_auto_tasks_to_users_of_respective_clients,
            assign_auto_tasks_to_users: UserIds(input.assign_auto_tasks_to_users.parse()?),
            billing_sac_code: input.billing_sac_code,
            billing_gst_percent: input.billing_gst_percent,
            billing_default_rate: input.billing_default_rate,
            billing_default_billable: input.billing_default_billable,
            create_document_collection_request_automatically: input.create_document_collection_request_automatically,
            document_request_default_message: input.document_request_default_message,
            created_by: principal.subject().to_string(),
            created_at: Utc::now().into(),
        };
        normalize(&mut model)?;

        if repository::name_taken(&self.db, tenant_id, &model.name, None).await? {
            return Err(ServiceError::Conflict(format!("service '{}' already exists", model.name)));
        }

        // the unique index still decides concurrent creates; its violation maps to Conflict
        let txn = self.db.begin().await?;
        let created = active_model(model).insert(&txn).await?;
        let mut checklists = Vec::with_capacity(input.checklists.len());
        for (i, item) in input.checklists.iter().enumerate() {
            checklists.push(checklist::insert(&txn, created.id, item, i as i32).await?);
        }
        for (i, st) in input.subtasks.iter().enumerate() {
            subtask::insert(&txn, created.id, st, i as i32).await?;
        }
        txn.commit().await?;

        checklists.sort_by_key(|c| (c.sort_order, c.id));
        info!(service_id = %created.id, name = %created.name, "service_created");
        audit::record(&self.db, principal, audit::SERVICE_CREATED, format!("service {} ({})", created.id, created.name)).await;
        Ok(ServiceView { service: created, checklists })
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<ServiceView, ServiceError> {
        let svc = repository::require_scoped(&self.db, principal.tenant_id(), id).await?;
        let checklists = repository::checklists_of(&self.db, &svc).await?;
        Ok(ServiceView { service: svc, checklists })
    }

    pub async fn list(&self, principal: &Principal) -> Result<Vec<ServiceView>, ServiceError> {
        let services = repository::list_for_tenant(&self.db, principal.tenant_id()).await?;
        let checklists = services.load_many(service_checklist::Entity, &self.db).await?;
        Ok(services
            .into_iter()
            .zip(checklists)
            .map(|(service, mut checklists)| {
                checklists.sort_by_key(|c| (c.sort_order, c.id));
                ServiceView { service, checklists }
            })
            .collect())
    }

    /// Partial settings update; the merged record is re-validated as a whole.
    #[instrument(skip(self, principal, patch), fields(tenant_id = %principal.tenant_id(), service_id = %id))]
    pub async fn update_settings(&self, principal: &Principal, id: Uuid, patch: ServiceSettingsPatch) -> Result<ServiceView, ServiceError> {
        let tenant_id = principal.tenant_id();
        let current = repository::require_scoped(&self.db, tenant_id, id).await?;
        let mut merged = current.clone();
        patch.apply_to(&mut merged)?;

        if merged.name != current.name && repository::name_taken(&self.db, tenant_id, &merged.name, Some(id)).await? {
            return Err(ServiceError::Conflict(format!("service '{}' already exists", merged.name)));
        }

        let updated = if merged == current {
            current
        } else {
            let updated = active_model(merged).update(&self.db).await?;
            info!("service_updated");
            audit::record(&self.db, principal, audit::SERVICE_UPDATED, format!("service {id}")).await;
            updated
        };
        let checklists = repository::checklists_of(&self.db, &updated).await?;
        Ok(ServiceView { service: updated, checklists })
    }

    /// Delete the service and every owned row in one transaction, then ask the
    /// storage backend to drop the file bytes. Byte cleanup is best-effort.
    #[instrument(skip(self, principal), fields(tenant_id = %principal.tenant_id(), service_id = %id))]
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), ServiceError> {
        let svc = repository::require_scoped(&self.db, principal.tenant_id(), id).await?;

        let txn = self.db.begin().await?;
        let files = supporting_file::Entity::find()
            .filter(supporting_file::Column::ServiceId.eq(id))
            .all(&txn)
            .await?;
        service_checklist::Entity::delete_many()
            .filter(service_checklist::Column::ServiceId.eq(id))
            .exec(&txn)
            .await?;
        service_subtask::Entity::delete_many()
            .filter(service_subtask::Column::ServiceId.eq(id))
            .exec(&txn)
            .await?;
        client_service::Entity::delete_many()
            .filter(client_service::Column::ServiceId.eq(id))
            .exec(&txn)
            .await?;
        supporting_file::Entity::delete_many()
            .filter(supporting_file::Column::ServiceId.eq(id))
            .exec(&txn)
            .await?;
        service::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(files = files.len(), "service_deleted");
        let locators: Vec<String> = files.into_iter().map(|f| f.file_path).collect();
        self.attachments.purge(&locators).await;
        audit::record(&self.db, principal, audit::SERVICE_DELETED, format!("service {} ({})", id, svc.name)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::Upload;
    use crate::auth::Role;
    use crate::options::{NewChecklistItem, NewSubtask};
    use crate::test_support::{get_db, new_catalog_with_root, service_named};
    use models::service::Frequency;
    use sea_orm::PaginatorTrait;

    fn admin(tenant: Uuid) -> Principal { Principal::new("admin-1", Role::AgencyAdmin, tenant) }

    #[tokio::test]
    async fn recurring_without_frequency_is_rejected() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (catalog, _files, _root) = new_catalog_with_root(&db).await?;
        let input = NewService { is_recurring: true, ..service_named("Monthly close") };
        let err = catalog.create(&admin(Uuid::new_v4()), input).await;
        assert!(matches!(err, Err(ServiceError::Model(_))));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_within_tenant_only() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (catalog, _files, _root) = new_catalog_with_root(&db).await?;
        let t1 = admin(Uuid::new_v4());
        let t2 = admin(Uuid::new_v4());
        catalog.create(&t1, service_named("Audit")).await?;
        let err = catalog.create(&t1, service_named(" Audit ")).await;
        assert!(matches!(err, Err(ServiceError::Conflict(_))));
        catalog.create(&t2, service_named("Audit")).await?;
        Ok(())
    }

    #[tokio::test]
    async fn unique_index_backs_the_precheck() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (catalog, _files, _root) = new_catalog_with_root(&db).await?;
        let p = admin(Uuid::new_v4());
        let first = catalog.create(&p, service_named("Audit")).await?;
        // bypass the pre-check the way a concurrent writer would
        let mut row = first.service.clone();
        row.id = Uuid::new_v4();
        let err: ServiceError = active_model(row).insert(&db).await.unwrap_err().into();
        assert!(matches!(err, ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn create_with_children_and_read_back() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (catalog, _files, _root) = new_catalog_with_root(&db).await?;
        let p = admin(Uuid::new_v4());
        let input = NewService {
            is_recurring: true,
            auto_task_creation_frequency: Some(Frequency::Quarterly),
            checklists: vec![
                NewChecklistItem { item_text: "Second".into(), is_required: false, sort_order: Some(2) },
                NewChecklistItem { item_text: "First".into(), is_required: true, sort_order: Some(1) },
            ],
            subtasks: vec![NewSubtask {
                title: "Kickoff".into(),
                description: None,
                due_date: None,
                target_date: None,
                users: Default::default(),
                enable_workflow: true,
                sort_order: None,
            }],
            ..service_named("Quarterly review")
        };
        let created = catalog.create(&p, input).await?;
        assert_eq!(created.checklists.iter().map(|c| c.item_text.as_str()).collect::<Vec<_>>(), ["First", "Second"]);
        assert_eq!(created.service.created_by, "admin-1");
        assert_eq!(created.service.agency_id, p.tenant_id());

        let fetched = catalog.get(&p, created.service.id).await?;
        assert_eq!(fetched.checklists.len(), 2);
        let listed = catalog.list(&p).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].checklists[0].item_text, "First");
        assert_eq!(subtask::list(&db, &p, created.service.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn failing_child_rolls_back_service() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (catalog, _files, _root) = new_catalog_with_root(&db).await?;
        let p = admin(Uuid::new_v4());
        let input = NewService {
            checklists: vec![NewChecklistItem { item_text: "  ".into(), is_required: false, sort_order: None }],
            ..service_named("Broken")
        };
        assert!(catalog.create(&p, input).await.is_err());
        assert!(catalog.list(&p).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn cross_tenant_reads_are_not_found() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (catalog, _files, _root) = new_catalog_with_root(&db).await?;
        let owner = admin(Uuid::new_v4());
        let other = admin(Uuid::new_v4());
        let svc = catalog.create(&owner, service_named("Audit")).await?;
        assert!(matches!(catalog.get(&other, svc.service.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            catalog.update_settings(&other, svc.service.id, ServiceSettingsPatch::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(catalog.delete(&other, svc.service.id).await, Err(ServiceError::NotFound(_))));
        assert!(catalog.list(&other).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn settings_update_scenario() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (catalog, _files, _root) = new_catalog_with_root(&db).await?;
        let p = admin(Uuid::new_v4());
        let svc = catalog.create(&p, service_named("Audit")).await?;
        assert_eq!(svc.service.auto_task_creation_frequency, None);

        let patch: ServiceSettingsPatch =
            serde_json::from_value(serde_json::json!({"is_recurring": true, "auto_task_creation_frequency": "monthly"}))?;
        let v = catalog.update_settings(&p, svc.service.id, patch).await?;
        assert!(v.service.is_recurring);
        assert_eq!(v.service.auto_task_creation_frequency, Some(Frequency::Monthly));

        let patch: ServiceSettingsPatch = serde_json::from_value(serde_json::json!({"is_recurring": false}))?;
        let v = catalog.update_settings(&p, svc.service.id, patch).await?;
        assert!(!v.service.is_recurring);
        assert_eq!(v.service.auto_task_creation_frequency, None);
        assert_eq!(v.service.name, "Audit");

        let stored = catalog.get(&p, svc.service.id).await?;
        assert_eq!(stored.service.auto_task_creation_frequency, None);
        Ok(())
    }

    #[tokio::test]
    async fn rename_into_existing_name_conflicts() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (catalog, _files, _root) = new_catalog_with_root(&db).await?;
        let p = admin(Uuid::new_v4());
        catalog.create(&p, service_named("Audit")).await?;
        let b = catalog.create(&p, service_named("Payroll")).await?;
        let patch = ServiceSettingsPatch { name: Some("Audit".into()), ..Default::default() };
        assert!(matches!(catalog.update_settings(&p, b.service.id, patch).await, Err(ServiceError::Conflict(_))));
        let patch = ServiceSettingsPatch { name: Some("Payroll ".into()), is_enabled: Some(false), ..Default::default() };
        let v = catalog.update_settings(&p, b.service.id, patch).await?;
        assert_eq!(v.service.name, "Payroll");
        assert!(!v.service.is_enabled);
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_rows_and_bytes() -> anyhow::Result<()> {
        let db = get_db().await?;
        let (catalog, files, root) = new_catalog_with_root(&db).await?;
        let p = admin(Uuid::new_v4());
        let input = NewService {
            checklists: (0..3)
                .map(|i| NewChecklistItem { item_text: format!("step {i}"), is_required: false, sort_order: None })
                .collect(),
            ..service_named("Cascade")
        };
        let svc = catalog.create(&p, input).await?;
        let sid = svc.service.id;
        for title in ["a", "b"] {
            subtask::add(&db, &p, sid, NewSubtask {
                title: title.into(),
                description: None,
                due_date: None,
                target_date: None,
                users: Default::default(),
                enable_workflow: false,
                sort_order: None,
            })
            .await?;
        }
        let file = files
            .upload(&p, sid, Upload { file_name: "a.txt".into(), content_type: Some("text/plain".into()), bytes: b"hi".to_vec() })
            .await?;
        models::client_service::link(&db, Uuid::new_v4(), sid).await?;
        assert!(std::path::Path::new(&file.file_path).exists());

        catalog.delete(&p, sid).await?;
        assert_eq!(service_checklist::Entity::find().count(&db).await?, 0);
        assert_eq!(service_subtask::Entity::find().count(&db).await?, 0);
        assert_eq!(supporting_file::Entity::find().count(&db).await?, 0);
        assert_eq!(client_service::Entity::find().count(&db).await?, 0);
        assert!(!std::path::Path::new(&file.file_path).exists());
        assert!(root.path().exists());
        assert!(matches!(catalog.get(&p, sid).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(files.delete(&p, file.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
