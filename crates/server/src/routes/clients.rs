use axum::{
    extract::{Path, State},
    Json,
};
use service::clients::count_clients_for_service;
use tracing::info;
use uuid::Uuid;

use crate::auth::{ManageCatalog, RoleGuard, ServerState};
use crate::errors::JsonApiError;

/// Number of clients linked to a service. Not scoped to the caller's agency.
#[utoipa::path(
    get, path = "/clients/{service_id}/count", tag = "clients",
    params(("service_id" = Uuid, Path, description = "Service id")),
    responses((status = 200, description = "Client count", body = u64), (status = 403, description = "Forbidden"))
)]
pub async fn count(
    State(state): State<ServerState>,
    guard: RoleGuard<ManageCatalog>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<u64>, JsonApiError> {
    let n = count_clients_for_service(&state.db, service_id).await?;
    info!(service_id = %service_id, subject = %guard.subject, count = n, "client count");
    Ok(Json(n))
}
