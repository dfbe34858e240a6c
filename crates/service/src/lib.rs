//! Business layer of the service catalog.
//! - Token verification and the access gate producing a tenant-scoped principal.
//! - The service aggregate (service, checklist items, subtasks, client links, files).
//! - Attachment storage behind a pluggable backend.
//!
//! Framework independent: the HTTP crate only maps requests onto these calls.

pub mod assignees;
pub mod attachments;
pub mod audit;
pub mod auth;
pub mod catalog;
pub mod clients;
pub mod errors;
pub mod options;
pub mod patch;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
