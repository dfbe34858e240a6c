//! Request-scoped authorization for handlers.
//!
//! Handlers declare the role set they need through a marker type:
//! `Scoped<ManageCatalog>` admits a token holder with a manage role and a
//! valid tenant header, and hands the handler an immutable [`Principal`].

use std::marker::PhantomData;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sea_orm::DatabaseConnection;
use service::attachments::{AttachmentService, StorageBackend};
use service::auth::{AccessGate, Principal, Role, RoleSet};
use service::catalog::CatalogService;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub gate: Arc<AccessGate>,
    pub catalog: Arc<CatalogService>,
    pub attachments: Arc<AttachmentService>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, gate: AccessGate, backend: Arc<dyn StorageBackend>) -> Self {
        let attachments = Arc::new(AttachmentService::new(db.clone(), backend));
        let catalog = Arc::new(CatalogService::new(db.clone(), Arc::clone(&attachments)));
        Self { db, gate: Arc::new(gate), catalog, attachments }
    }
}

pub trait RolePolicy: Send + Sync + 'static {
    const ROLES: RoleSet;
}

/// Create, update and delete services, checklist items and subtasks.
pub struct ManageCatalog;
/// Read service list and detail.
pub struct ReadCatalog;
/// Upload and list supporting files.
pub struct ShareFiles;
/// Delete supporting files.
pub struct RemoveFiles;

impl RolePolicy for ManageCatalog {
    const ROLES: RoleSet = RoleSet::MANAGE;
}
impl RolePolicy for ReadCatalog {
    const ROLES: RoleSet = RoleSet::READ;
}
impl RolePolicy for ShareFiles {
    const ROLES: RoleSet = RoleSet::SHARE_FILES;
}
impl RolePolicy for RemoveFiles {
    const ROLES: RoleSet = RoleSet::MANAGE;
}

fn authorization(parts: &Parts) -> Option<&str> {
    parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Authenticated, role-checked, tenant-scoped caller.
pub struct Scoped<P: RolePolicy> {
    pub principal: Principal,
    _policy: PhantomData<P>,
}

#[async_trait]
impl<P: RolePolicy> FromRequestParts<ServerState> for Scoped<P> {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let tenant = parts.headers.get(state.gate.tenant_header()).and_then(|v| v.to_str().ok());
        let principal = state.gate.admit(authorization(parts), tenant, P::ROLES)?;
        Ok(Self { principal, _policy: PhantomData })
    }
}

/// Token and role only; the tenant header is not consulted.
pub struct RoleGuard<P: RolePolicy> {
    pub subject: String,
    pub role: Role,
    _policy: PhantomData<P>,
}

#[async_trait]
impl<P: RolePolicy> FromRequestParts<ServerState> for RoleGuard<P> {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let identity = state.gate.authenticate(authorization(parts))?;
        let role = state.gate.authorize(&identity, P::ROLES)?;
        Ok(Self { subject: identity.subject, role, _policy: PhantomData })
    }
}
