use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service::catalog::{NewService, ServiceView};
use tracing::info;
use uuid::Uuid;

use crate::auth::{ManageCatalog, ReadCatalog, Scoped, ServerState};
use crate::errors::JsonApiError;

#[utoipa::path(
    post, path = "/services/", tag = "services",
    request_body = crate::openapi::NewServiceDoc,
    params(crate::openapi::TenantHeader),
    responses(
        (status = 201, description = "Created"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Conflict"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Json(input): Json<NewService>,
) -> Result<(StatusCode, Json<ServiceView>), JsonApiError> {
    let view = state.catalog.create(&auth.principal, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get, path = "/services/", tag = "services",
    params(crate::openapi::TenantHeader),
    responses((status = 200, description = "Services of the caller's agency"))
)]
pub async fn list(State(state): State<ServerState>, auth: Scoped<ReadCatalog>) -> Result<Json<Vec<ServiceView>>, JsonApiError> {
    let list = state.catalog.list(&auth.principal).await?;
    info!(count = list.len(), tenant_id = %auth.principal.tenant_id(), "list services");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service id"), crate::openapi::TenantHeader),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(
    State(state): State<ServerState>,
    auth: Scoped<ReadCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceView>, JsonApiError> {
    Ok(Json(state.catalog.get(&auth.principal, id).await?))
}

#[utoipa::path(
    delete, path = "/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service id"), crate::openapi::TenantHeader),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    auth: Scoped<ManageCatalog>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.catalog.delete(&auth.principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
