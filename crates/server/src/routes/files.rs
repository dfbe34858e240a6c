use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use models::supporting_file;
use service::attachments::Upload;
use uuid::Uuid;

use crate::auth::{RemoveFiles, Scoped, ServerState, ShareFiles};
use crate::errors::JsonApiError;

/// Multipart field carrying the file.
const FILE_FIELD: &str = "file";

fn multipart_error(e: MultipartError) -> JsonApiError {
    JsonApiError::new(e.status(), "Invalid Upload", Some(e.body_text()))
}

#[utoipa::path(
    post, path = "/options/supporting-files/{id}", tag = "files",
    request_body(content = crate::openapi::FileUploadDoc, content_type = "multipart/form-data"),
    params(("id" = Uuid, Path, description = "Service id"), crate::openapi::TenantHeader),
    responses(
        (status = 201, description = "Stored"),
        (status = 404, description = "Not Found"),
        (status = 413, description = "Payload Too Large"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn upload(
    State(state): State<ServerState>,
    auth: Scoped<ShareFiles>,
    Path(service_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<supporting_file::Model>), JsonApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some(Upload { file_name, content_type, bytes: bytes.to_vec() });
        break;
    }
    let upload = upload.ok_or_else(|| {
        JsonApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", Some(format!("multipart field '{FILE_FIELD}' required")))
    })?;

    let file = state.attachments.upload(&auth.principal, service_id, upload).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

#[utoipa::path(
    get, path = "/options/supporting-files/{id}", tag = "files",
    params(("id" = Uuid, Path, description = "Service id"), crate::openapi::TenantHeader),
    responses((status = 200, description = "File records"), (status = 404, description = "Not Found"))
)]
pub async fn list(
    State(state): State<ServerState>,
    auth: Scoped<ShareFiles>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Vec<supporting_file::Model>>, JsonApiError> {
    Ok(Json(state.attachments.list(&auth.principal, service_id).await?))
}

#[utoipa::path(
    delete, path = "/options/supporting-files/{id}", tag = "files",
    params(("id" = Uuid, Path, description = "File id"), crate::openapi::TenantHeader),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    auth: Scoped<RemoveFiles>,
    Path(file_id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.attachments.delete(&auth.principal, file_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
