//! `/options/*`: settings patch, checklist items and subtasks.
//!
//! `POST`/`GET` take the parent service id; `PATCH`/`DELETE` take the item id.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use models::{service_checklist, service_subtask};
use service::catalog::{ServiceSettingsPatch, ServiceView};
use service::options::{checklist, subtask, ChecklistPatch, NewChecklistItem, NewSubtask, SubtaskPatch};
use uuid::Uuid;

use crate::auth::{ManageCatalog, Scoped, ServerState};
use crate::errors::JsonApiError;

#[utoipa::path(
    patch, path = "/options/settings/{id}", tag = "options",
    request_body = crate::openapi::ServiceSettingsPatchDoc,
    params(("id" = Uuid, Path, description = "Service id"), crate::openapi::TenantHeader),
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Conflict"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn update_settings(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ServiceSettingsPatch>,
) -> Result<Json<ServiceView>, JsonApiError> {
    Ok(Json(state.catalog.update_settings(&auth.principal, id, patch).await?))
}

#[utoipa::path(
    post, path = "/options/checklists/{id}", tag = "options",
    request_body = crate::openapi::NewChecklistItemDoc,
    params(("id" = Uuid, Path, description = "Service id"), crate::openapi::TenantHeader),
    responses((status = 201, description = "Created"), (status = 404, description = "Not Found"))
)]
pub async fn add_checklist_item(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(service_id): Path<Uuid>,
    Json(input): Json<NewChecklistItem>,
) -> Result<(StatusCode, Json<service_checklist::Model>), JsonApiError> {
    let item = checklist::add(&state.db, &auth.principal, service_id, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get, path = "/options/checklists/{id}", tag = "options",
    params(("id" = Uuid, Path, description = "Service id"), crate::openapi::TenantHeader),
    responses((status = 200, description = "Items ordered by sort order"), (status = 404, description = "Not Found"))
)]
pub async fn list_checklist_items(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Vec<service_checklist::Model>>, JsonApiError> {
    Ok(Json(checklist::list(&state.db, &auth.principal, service_id).await?))
}

#[utoipa::path(
    patch, path = "/options/checklists/{id}", tag = "options",
    request_body = crate::openapi::ChecklistPatchDoc,
    params(("id" = Uuid, Path, description = "Checklist item id"), crate::openapi::TenantHeader),
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"))
)]
pub async fn update_checklist_item(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(item_id): Path<Uuid>,
    Json(patch): Json<ChecklistPatch>,
) -> Result<Json<service_checklist::Model>, JsonApiError> {
    Ok(Json(checklist::update(&state.db, &auth.principal, item_id, patch).await?))
}

#[utoipa::path(
    delete, path = "/options/checklists/{id}", tag = "options",
    params(("id" = Uuid, Path, description = "Checklist item id"), crate::openapi::TenantHeader),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_checklist_item(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    checklist::delete(&state.db, &auth.principal, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post, path = "/options/subtasks/{id}", tag = "options",
    request_body = crate::openapi::NewSubtaskDoc,
    params(("id" = Uuid, Path, description = "Service id"), crate::openapi::TenantHeader),
    responses(
        (status = 201, description = "Created"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn add_subtask(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(service_id): Path<Uuid>,
    Json(input): Json<NewSubtask>,
) -> Result<(StatusCode, Json<service_subtask::Model>), JsonApiError> {
    let created = subtask::add(&state.db, &auth.principal, service_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/options/subtasks/{id}", tag = "options",
    params(("id" = Uuid, Path, description = "Service id"), crate::openapi::TenantHeader),
    responses((status = 200, description = "Subtasks ordered by sort order"), (status = 404, description = "Not Found"))
)]
pub async fn list_subtasks(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Vec<service_subtask::Model>>, JsonApiError> {
    Ok(Json(subtask::list(&state.db, &auth.principal, service_id).await?))
}

#[utoipa::path(
    patch, path = "/options/subtasks/{id}", tag = "options",
    request_body = crate::openapi::SubtaskPatchDoc,
    params(("id" = Uuid, Path, description = "Subtask id"), crate::openapi::TenantHeader),
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"))
)]
pub async fn update_subtask(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(subtask_id): Path<Uuid>,
    Json(patch): Json<SubtaskPatch>,
) -> Result<Json<service_subtask::Model>, JsonApiError> {
    Ok(Json(subtask::update(&state.db, &auth.principal, subtask_id, patch).await?))
}

#[utoipa::path(
    delete, path = "/options/subtasks/{id}", tag = "options",
    params(("id" = Uuid, Path, description = "Subtask id"), crate::openapi::TenantHeader),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_subtask(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(subtask_id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    subtask::delete(&state.db, &auth.principal, subtask_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
