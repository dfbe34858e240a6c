//! Auth module: bearer token verification and the access gate.
//!
//! Credentials are issued by an external login service; this crate only verifies
//! them and turns the claims into a typed, tenant-scoped [`domain::Principal`].

pub mod domain;
pub mod errors;
pub mod gate;
pub mod token;

pub use domain::{Identity, Principal, Role, RoleSet};
pub use errors::AccessError;
pub use gate::AccessGate;
pub use token::TokenVerifier;
