//! Access gate: authentication, role check and tenant resolution.
//!
//! Decisions are taken in a fixed order so that callers can rely on the
//! resulting error: missing/bad credential, then role, then tenant header.

use uuid::Uuid;

use super::domain::{Identity, Principal, Role, RoleSet};
use super::errors::AccessError;
use super::token::TokenVerifier;

#[derive(Clone)]
pub struct AccessGate {
    verifier: TokenVerifier,
    tenant_header: String,
}

impl AccessGate {
    pub fn new(verifier: TokenVerifier, tenant_header: impl Into<String>) -> Self {
        Self { verifier, tenant_header: tenant_header.into() }
    }

    /// Header name carrying the tenant (agency) id.
    pub fn tenant_header(&self) -> &str { &self.tenant_header }

    /// Verify an `Authorization: Bearer <token>` header value.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AccessError> {
        let value = authorization.ok_or_else(|| AccessError::Unauthorized("missing bearer token".into()))?;
        let (scheme, token) = value
            .trim()
            .split_once(' ')
            .ok_or_else(|| AccessError::Unauthorized("malformed authorization header".into()))?;
        if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
            return Err(AccessError::Unauthorized("malformed authorization header".into()));
        }
        self.verifier.verify(token.trim())
    }

    /// Role check. Unknown roles never match.
    pub fn authorize(&self, identity: &Identity, allowed: RoleSet) -> Result<Role, AccessError> {
        match identity.role {
            Some(role) if allowed.contains(role) => Ok(role),
            _ => Err(AccessError::Forbidden),
        }
    }

    pub fn resolve_tenant(&self, header: Option<&str>) -> Result<Uuid, AccessError> {
        let raw = header
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AccessError::InvalidTenant(format!("{} header required", self.tenant_header)))?;
        Uuid::parse_str(raw).map_err(|_| AccessError::InvalidTenant(format!("{} is not a valid id", self.tenant_header)))
    }

    /// Full admission for tenant-scoped operations.
    pub fn admit(&self, authorization: Option<&str>, tenant: Option<&str>, allowed: RoleSet) -> Result<Principal, AccessError> {
        let identity = self.authenticate(authorization)?;
        let role = self.authorize(&identity, allowed)?;
        let tenant_id = self.resolve_tenant(tenant)?;
        Ok(Principal::new(identity.subject, role, tenant_id))
    }
}
