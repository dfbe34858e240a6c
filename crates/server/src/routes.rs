use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth::ServerState;
use crate::openapi::ApiDoc;

pub mod clients;
pub mod files;
pub mod options;
pub mod services;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: catalog, options, files, clients, health and docs.
pub fn build_router(state: ServerState, cors: CorsLayer, max_upload_bytes: usize) -> Router {
    // multipart uploads get their own body cap instead of axum's 2 MiB default
    let files = Router::new()
        .route(
            "/options/supporting-files/:id",
            post(files::upload).get(files::list).delete(files::delete),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes));

    let api = Router::new()
        .route("/services", get(services::list).post(services::create))
        .route("/services/", get(services::list).post(services::create))
        .route("/services/:id", get(services::get).delete(services::delete))
        .route("/options/settings/:id", patch(options::update_settings))
        .route(
            "/options/checklists/:id",
            post(options::add_checklist_item)
                .get(options::list_checklist_items)
                .patch(options::update_checklist_item)
                .delete(options::delete_checklist_item),
        )
        .route(
            "/options/subtasks/:id",
            post(options::add_subtask)
                .get(options::list_subtasks)
                .patch(options::update_subtask)
                .delete(options::delete_subtask),
        )
        .route("/clients/:service_id/count", get(clients::count))
        .merge(files);

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and connection failures
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
