//! Tenant-scoped queries shared by the catalog, option and attachment operations.

use models::{service, service_checklist};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::errors::ServiceError;

pub async fn find_scoped<C: ConnectionTrait>(db: &C, tenant_id: Uuid, id: Uuid) -> Result<Option<service::Model>, DbErr> {
    service::Entity::find_by_id(id)
        .filter(service::Column::AgencyId.eq(tenant_id))
        .one(db)
        .await
}

/// Like [`find_scoped`], but absence (including another tenant's row) is `NotFound`.
pub async fn require_scoped<C: ConnectionTrait>(db: &C, tenant_id: Uuid, id: Uuid) -> Result<service::Model, ServiceError> {
    find_scoped(db, tenant_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))
}

pub async fn name_taken<C: ConnectionTrait>(db: &C, tenant_id: Uuid, name: &str, except: Option<Uuid>) -> Result<bool, DbErr> {
    let mut q = service::Entity::find()
        .filter(service::Column::AgencyId.eq(tenant_id))
        .filter(service::Column::Name.eq(name));
    if let Some(id) = except {
        q = q.filter(service::Column::Id.ne(id));
    }
    Ok(q.count(db).await? > 0)
}

pub async fn list_for_tenant<C: ConnectionTrait>(db: &C, tenant_id: Uuid) -> Result<Vec<service::Model>, DbErr> {
    service::Entity::find()
        .filter(service::Column::AgencyId.eq(tenant_id))
        .order_by_asc(service::Column::CreatedAt)
        .order_by_asc(service::Column::Id)
        .all(db)
        .await
}

pub async fn checklists_of<C: ConnectionTrait>(db: &C, svc: &service::Model) -> Result<Vec<service_checklist::Model>, DbErr> {
    svc.find_related(service_checklist::Entity)
        .order_by_asc(service_checklist::Column::SortOrder)
        .order_by_asc(service_checklist::Column::Id)
        .all(db)
        .await
}
