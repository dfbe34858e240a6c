//! Best-effort audit trail for catalog mutations.

use sea_orm::ConnectionTrait;
use tracing::warn;

use crate::auth::Principal;

pub const SERVICE_CREATED: &str = "service.create";
pub const SERVICE_UPDATED: &str = "service.update";
pub const SERVICE_DELETED: &str = "service.delete";
pub const FILE_UPLOADED: &str = "file.upload";
pub const FILE_DELETED: &str = "file.delete";

/// Append an audit row. Failures are logged and swallowed.
pub async fn record<C: ConnectionTrait>(db: &C, principal: &Principal, action: &str, details: String) {
    if let Err(e) = models::audit_log::append(db, principal.subject(), action, &details).await {
        warn!(action, subject = %principal.subject(), error = %e, "audit_write_failed");
    }
}
