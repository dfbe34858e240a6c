use models::{service, service_subtask, types::UserIds};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::assignees::AssigneeInput;
use crate::auth::Principal;
use crate::catalog::repository;
use crate::errors::ServiceError;
use crate::patch::{apply as apply_patch, double_option};

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubtask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<i32>,
    #[serde(default)]
    pub target_date: Option<i32>,
    #[serde(default)]
    pub users: AssigneeInput,
    #[serde(default)]
    pub enable_workflow: bool,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// Partial subtask update; nullable fields accept `null` to clear.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubtaskPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_date: Option<Option<i32>>,
    pub users: Option<AssigneeInput>,
    pub enable_workflow: Option<bool>,
    pub sort_order: Option<i32>,
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

pub(crate) async fn next_sort_order<C: ConnectionTrait>(db: &C, service_id: Uuid) -> Result<i32, ServiceError> {
    let n = service_subtask::Entity::find()
        .filter(service_subtask::Column::ServiceId.eq(service_id))
        .count(db)
        .await?;
    Ok(i32::try_from(n).unwrap_or(i32::MAX))
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    input: &NewSubtask,
    default_order: i32,
) -> Result<service_subtask::Model, ServiceError> {
    let title = service_subtask::validate_title(&input.title)?;
    service_subtask::validate_day("due_date", input.due_date)?;
    service_subtask::validate_day("target_date", input.target_date)?;
    // parse the whole list before touching the database
    let users = input.users.parse()?;
    let sort_order = input.sort_order.unwrap_or(default_order);
    if sort_order < 0 {
        return Err(ServiceError::validation("sort_order must be >= 0"));
    }
    let am = service_subtask::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(service_id),
        title: Set(title),
        description: Set(non_blank(input.description.clone())),
        due_date: Set(input.due_date),
        target_date: Set(input.target_date),
        users: Set(UserIds(users)),
        enable_workflow: Set(input.enable_workflow),
        sort_order: Set(sort_order),
    };
    Ok(am.insert(db).await?)
}

async fn find_scoped_subtask(db: &DatabaseConnection, tenant_id: Uuid, subtask_id: Uuid) -> Result<service_subtask::Model, ServiceError> {
    service_subtask::Entity::find_by_id(subtask_id)
        .join(JoinType::InnerJoin, service_subtask::Relation::Service.def())
        .filter(service::Column::AgencyId.eq(tenant_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("subtask"))
}

#[instrument(skip(db, principal, input), fields(tenant_id = %principal.tenant_id()))]
pub async fn add(
    db: &DatabaseConnection,
    principal: &Principal,
    service_id: Uuid,
    input: NewSubtask,
) -> Result<service_subtask::Model, ServiceError> {
    repository::require_scoped(db, principal.tenant_id(), service_id).await?;
    let order = next_sort_order(db, service_id).await?;
    let subtask = insert(db, service_id, &input, order).await?;
    info!(subtask_id = %subtask.id, users = subtask.users.len(), "subtask_added");
    Ok(subtask)
}

pub async fn list(db: &DatabaseConnection, principal: &Principal, service_id: Uuid) -> Result<Vec<service_subtask::Model>, ServiceError> {
    repository::require_scoped(db, principal.tenant_id(), service_id).await?;
    let rows = service_subtask::Entity::find()
        .filter(service_subtask::Column::ServiceId.eq(service_id))
        .order_by_asc(service_subtask::Column::SortOrder)
        .order_by_asc(service_subtask::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

#[instrument(skip(db, principal, patch), fields(tenant_id = %principal.tenant_id()))]
pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    subtask_id: Uuid,
    patch: SubtaskPatch,
) -> Result<service_subtask::Model, ServiceError> {
    let current = find_scoped_subtask(db, principal.tenant_id(), subtask_id).await?;
    let mut merged = current.clone();
    if let Some(title) = patch.title.as_deref() {
        merged.title = service_subtask::validate_title(title)?;
    }
    apply_patch(&mut merged.description, patch.description.map(non_blank));
    apply_patch(&mut merged.due_date, patch.due_date);
    apply_patch(&mut merged.target_date, patch.target_date);
    service_subtask::validate_day("due_date", merged.due_date)?;
    service_subtask::validate_day("target_date", merged.target_date)?;
    if let Some(users) = &patch.users {
        merged.users = UserIds(users.parse()?);
    }
    if let Some(flag) = patch.enable_workflow {
        merged.enable_workflow = flag;
    }
    if let Some(order) = patch.sort_order {
        if order < 0 {
            return Err(ServiceError::validation("sort_order must be >= 0"));
        }
        merged.sort_order = order;
    }
    if merged == current {
        return Ok(current);
    }

    let mut am = current.into_active_model();
    am.title = Set(merged.title);
    am.description = Set(merged.description);
    am.due_date = Set(merged.due_date);
    am.target_date = Set(merged.target_date);
    am.users = Set(merged.users);
    am.enable_workflow = Set(merged.enable_workflow);
    am.sort_order = Set(merged.sort_order);
    Ok(am.update(db).await?)
}

#[instrument(skip(db, principal), fields(tenant_id = %principal.tenant_id()))]
pub async fn delete(db: &DatabaseConnection, principal: &Principal, subtask_id: Uuid) -> Result<(), ServiceError> {
    let subtask = find_scoped_subtask(db, principal.tenant_id(), subtask_id).await?;
    service_subtask::Entity::delete_by_id(subtask.id).exec(db).await?;
    info!(subtask_id = %subtask_id, "subtask_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::test_support::{get_db, new_catalog, service_named};

    fn subtask(title: &str, users: AssigneeInput) -> NewSubtask {
        NewSubtask {
            title: title.into(),
            description: Some("first pass".into()),
            due_date: Some(10),
            target_date: Some(5),
            users,
            enable_workflow: false,
            sort_order: None,
        }
    }

    #[tokio::test]
    async fn delimited_assignees_are_parsed() -> anyhow::Result<()> {
        let db = get_db().await?;
        let catalog = new_catalog(&db).await?;
        let p = Principal::new("u1", Role::AgencyAdmin, Uuid::new_v4());
        let svc = catalog.create(&p, service_named("ROC")).await?;
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let st = add(&db, &p, svc.service.id, subtask("Prepare", AssigneeInput::Delimited(format!("{a},{b}")))).await?;
        assert_eq!(st.users.as_slice(), &[a, b]);
        assert_eq!(st.sort_order, 0);
        let second = add(&db, &p, svc.service.id, subtask("Review", AssigneeInput::default())).await?;
        assert_eq!(second.sort_order, 1);
        assert!(second.users.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_assignee_rejects_whole_batch() -> anyhow::Result<()> {
        let db = get_db().await?;
        let catalog = new_catalog(&db).await?;
        let p = Principal::new("u1", Role::AgencyAdmin, Uuid::new_v4());
        let svc = catalog.create(&p, service_named("TDS")).await?;

        let bad = AssigneeInput::List(vec![Uuid::new_v4().to_string(), "bob".into()]);
        let err = add(&db, &p, svc.service.id, subtask("Prepare", bad)).await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
        assert!(list(&db, &p, svc.service.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn patch_clears_nullable_fields_and_keeps_the_rest() -> anyhow::Result<()> {
        let db = get_db().await?;
        let catalog = new_catalog(&db).await?;
        let p = Principal::new("u1", Role::CaAccountant, Uuid::new_v4());
        let svc = catalog.create(&p, service_named("Audit")).await?;
        let st = add(&db, &p, svc.service.id, subtask("Prepare", AssigneeInput::default())).await?;

        let patch: SubtaskPatch = serde_json::from_value(serde_json::json!({"description": null, "enable_workflow": true}))?;
        let updated = update(&db, &p, st.id, patch).await?;
        assert_eq!(updated.description, None);
        assert_eq!(updated.due_date, Some(10));
        assert_eq!(updated.title, "Prepare");
        assert!(updated.enable_workflow);

        let other = Principal::new("u2", Role::CaAccountant, Uuid::new_v4());
        assert!(matches!(delete(&db, &other, st.id).await, Err(ServiceError::NotFound(_))));
        delete(&db, &p, st.id).await?;
        assert!(matches!(update(&db, &p, st.id, SubtaskPatch::default()).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn negative_sort_order_is_rejected() -> anyhow::Result<()> {
        let db = get_db().await?;
        let catalog = new_catalog(&db).await?;
        let p = Principal::new("u1", Role::AgencyAdmin, Uuid::new_v4());
        let svc = catalog.create(&p, service_named("PF")).await?;

        let input = NewSubtask { sort_order: Some(-1), ..subtask("Prepare", AssigneeInput::default()) };
        let err = add(&db, &p, svc.service.id, input).await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
        assert!(list(&db, &p, svc.service.id).await?.is_empty());

        let input = NewSubtask { sort_order: Some(7), ..subtask("Review", AssigneeInput::default()) };
        assert_eq!(add(&db, &p, svc.service.id, input).await?.sort_order, 7);
        Ok(())
    }
}
