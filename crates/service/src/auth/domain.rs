use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Roles known to the catalog. Claims are mapped case-insensitively; anything
/// else maps to no role at all and therefore matches no role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    AgencyAdmin,
    CaAccountant,
    CaTeam,
    ClientAdmin,
    ClientUser,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::AgencyAdmin,
        Role::CaAccountant,
        Role::CaTeam,
        Role::ClientAdmin,
        Role::ClientUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::AgencyAdmin => "AGENCY_ADMIN",
            Role::CaAccountant => "CA_ACCOUNTANT",
            Role::CaTeam => "CA_TEAM",
            Role::ClientAdmin => "CLIENT_ADMIN",
            Role::ClientUser => "CLIENT_USER",
        }
    }

    pub fn from_claim(raw: &str) -> Option<Role> {
        let raw = raw.trim();
        Role::ALL.into_iter().find(|r| r.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of roles allowed to perform an operation.
#[derive(Debug, Clone, Copy)]
pub struct RoleSet(&'static [Role]);

impl RoleSet {
    /// Create/update/delete services, checklist items and subtasks; delete files; count clients.
    pub const MANAGE: RoleSet = RoleSet(&[Role::SuperAdmin, Role::AgencyAdmin, Role::CaAccountant]);
    /// Read service list/detail.
    pub const READ: RoleSet = RoleSet(&[
        Role::SuperAdmin,
        Role::AgencyAdmin,
        Role::CaAccountant,
        Role::ClientAdmin,
        Role::ClientUser,
    ]);
    /// Upload and list supporting files.
    pub const SHARE_FILES: RoleSet = RoleSet(&[Role::SuperAdmin, Role::AgencyAdmin, Role::CaAccountant, Role::CaTeam]);

    pub const fn new(roles: &'static [Role]) -> Self { Self(roles) }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn roles(&self) -> &'static [Role] { self.0 }
}

/// Verified caller identity, before any role or tenant decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    /// `None` when the role claim is not a known role.
    pub role: Option<Role>,
    pub raw_role: String,
}

/// Authenticated, role-checked, tenant-scoped caller for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    role: Role,
    tenant_id: Uuid,
}

impl Principal {
    pub fn new(subject: impl Into<String>, role: Role, tenant_id: Uuid) -> Self {
        Self { subject: subject.into(), role, tenant_id }
    }

    pub fn subject(&self) -> &str { &self.subject }
    pub fn role(&self) -> Role { self.role }
    pub fn tenant_id(&self) -> Uuid { self.tenant_id }
}
