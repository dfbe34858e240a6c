use models::{service, service_checklist};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, JoinType,
    PaginatorTrait, QueryFilter, QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::Principal;
use crate::catalog::repository;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewChecklistItem {
    pub item_text: String,
    #[serde(default)]
    pub is_required: bool,
    /// Defaults to the number of items already present.
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecklistPatch {
    pub item_text: Option<String>,
    pub is_required: Option<bool>,
    pub sort_order: Option<i32>,
}

pub(crate) async fn next_sort_order<C: ConnectionTrait>(db: &C, service_id: Uuid) -> Result<i32, ServiceError> {
    let n = service_checklist::Entity::find()
        .filter(service_checklist::Column::ServiceId.eq(service_id))
        .count(db)
        .await?;
    Ok(i32::try_from(n).unwrap_or(i32::MAX))
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    input: &NewChecklistItem,
    default_order: i32,
) -> Result<service_checklist::Model, ServiceError> {
    let item_text = service_checklist::validate_item_text(&input.item_text)?;
    let sort_order = input.sort_order.unwrap_or(default_order);
    service_checklist::validate_sort_order(sort_order)?;
    let am = service_checklist::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(service_id),
        item_text: Set(item_text),
        is_required: Set(input.is_required),
        sort_order: Set(sort_order),
    };
    Ok(am.insert(db).await?)
}

async fn find_scoped_item(db: &DatabaseConnection, tenant_id: Uuid, item_id: Uuid) -> Result<service_checklist::Model, ServiceError> {
    service_checklist::Entity::find_by_id(item_id)
        .join(JoinType::InnerJoin, service_checklist::Relation::Service.def())
        .filter(service::Column::AgencyId.eq(tenant_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("checklist item"))
}

#[instrument(skip(db, principal, input), fields(tenant_id = %principal.tenant_id()))]
pub async fn add(
    db: &DatabaseConnection,
    principal: &Principal,
    service_id: Uuid,
    input: NewChecklistItem,
) -> Result<service_checklist::Model, ServiceError> {
    repository::require_scoped(db, principal.tenant_id(), service_id).await?;
    let order = next_sort_order(db, service_id).await?;
    let item = insert(db, service_id, &input, order).await?;
    info!(item_id = %item.id, "checklist_item_added");
    Ok(item)
}

pub async fn list(db: &DatabaseConnection, principal: &Principal, service_id: Uuid) -> Result<Vec<service_checklist::Model>, ServiceError> {
    let svc = repository::require_scoped(db, principal.tenant_id(), service_id).await?;
    Ok(repository::checklists_of(db, &svc).await?)
}

#[instrument(skip(db, principal, patch), fields(tenant_id = %principal.tenant_id()))]
pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    item_id: Uuid,
    patch: ChecklistPatch,
) -> Result<service_checklist::Model, ServiceError> {
    let item = find_scoped_item(db, principal.tenant_id(), item_id).await?;
    let mut am = item.into_active_model();
    if let Some(text) = patch.item_text.as_deref() {
        am.item_text = Set(service_checklist::validate_item_text(text)?);
    }
    if let Some(required) = patch.is_required {
        am.is_required = Set(required);
    }
    if let Some(order) = patch.sort_order {
        service_checklist::validate_sort_order(order)?;
        am.sort_order = Set(order);
    }
    Ok(am.update(db).await?)
}

#[instrument(skip(db, principal), fields(tenant_id = %principal.tenant_id()))]
pub async fn delete(db: &DatabaseConnection, principal: &Principal, item_id: Uuid) -> Result<(), ServiceError> {
    let item = find_scoped_item(db, principal.tenant_id(), item_id).await?;
    service_checklist::Entity::delete_by_id(item.id).exec(db).await?;
    info!(item_id = %item_id, "checklist_item_deleted");
    Ok(())
}
