//! OpenAPI document. Request bodies are described by documentation-only
//! structs mirroring the service-layer payloads.

use serde::Deserialize;
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Agency the request operates on.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Header)]
pub struct TenantHeader {
    #[serde(rename = "X-Agency-Id")]
    pub x_agency_id: Uuid,
}

/// Array of user ids, or a comma separated string of them.
#[derive(ToSchema)]
pub struct AssigneesDoc(pub Vec<Uuid>);

#[derive(ToSchema)]
pub struct NewChecklistItemDoc {
    pub item_text: String,
    pub is_required: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(ToSchema)]
pub struct ChecklistPatchDoc {
    pub item_text: Option<String>,
    pub is_required: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(ToSchema)]
pub struct NewSubtaskDoc {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<i32>,
    pub target_date: Option<i32>,
    #[schema(value_type = Option<AssigneesDoc>)]
    pub users: Option<Vec<Uuid>>,
    pub enable_workflow: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(ToSchema)]
pub struct SubtaskPatchDoc {
    pub title: Option<String>,
    /// `null` clears.
    pub description: Option<String>,
    pub due_date: Option<i32>,
    pub target_date: Option<i32>,
    #[schema(value_type = Option<AssigneesDoc>)]
    pub users: Option<Vec<Uuid>>,
    pub enable_workflow: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(ToSchema)]
pub struct NewServiceDoc {
    pub name: String,
    pub is_enabled: Option<bool>,
    pub is_checklist_completion_required: Option<bool>,
    pub is_recurring: Option<bool>,
    /// monthly, quarterly, half_yearly or yearly. Required when recurring.
    #[schema(example = "monthly")]
    pub auto_task_creation_frequency: Option<String>,
    pub target_date_creation_date: Option<i32>,
    pub assign_auto_tasks_to_users_of_respective_clients: Option<bool>,
    #[schema(value_type = Option<AssigneesDoc>)]
    pub assign_auto_tasks_to_users: Option<Vec<Uuid>>,
    pub billing_sac_code: Option<String>,
    pub billing_gst_percent: Option<f64>,
    pub billing_default_rate: Option<f64>,
    pub billing_default_billable: Option<bool>,
    pub create_document_collection_request_automatically: Option<bool>,
    pub document_request_default_message: Option<String>,
    pub checklists: Option<Vec<NewChecklistItemDoc>>,
    pub subtasks: Option<Vec<NewSubtaskDoc>>,
}

/// Every field optional; only present fields are applied.
#[derive(ToSchema)]
pub struct ServiceSettingsPatchDoc {
    pub name: Option<String>,
    pub is_enabled: Option<bool>,
    pub is_checklist_completion_required: Option<bool>,
    pub is_recurring: Option<bool>,
    #[schema(example = "quarterly")]
    pub auto_task_creation_frequency: Option<String>,
    pub target_date_creation_date: Option<i32>,
    pub assign_auto_tasks_to_users_of_respective_clients: Option<bool>,
    #[schema(value_type = Option<AssigneesDoc>)]
    pub assign_auto_tasks_to_users: Option<Vec<Uuid>>,
    pub billing_sac_code: Option<String>,
    pub billing_gst_percent: Option<f64>,
    pub billing_default_rate: Option<f64>,
    pub billing_default_billable: Option<bool>,
    pub create_document_collection_request_automatically: Option<bool>,
    pub document_request_default_message: Option<String>,
}

#[derive(ToSchema)]
pub struct FileUploadDoc {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::services::create,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::delete,
        crate::routes::options::update_settings,
        crate::routes::options::add_checklist_item,
        crate::routes::options::list_checklist_items,
        crate::routes::options::update_checklist_item,
        crate::routes::options::delete_checklist_item,
        crate::routes::options::add_subtask,
        crate::routes::options::list_subtasks,
        crate::routes::options::update_subtask,
        crate::routes::options::delete_subtask,
        crate::routes::files::upload,
        crate::routes::files::list,
        crate::routes::files::delete,
        crate::routes::clients::count,
    ),
    components(
        schemas(
            HealthResponse,
            AssigneesDoc,
            NewServiceDoc,
            ServiceSettingsPatchDoc,
            NewChecklistItemDoc,
            ChecklistPatchDoc,
            NewSubtaskDoc,
            SubtaskPatchDoc,
            FileUploadDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "services"),
        (name = "options"),
        (name = "files"),
        (name = "clients")
    )
)]
pub struct ApiDoc;
