use thiserror::Error;

/// Failures of the authentication / authorization gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("invalid or missing credential: {0}")]
    Unauthorized(String),
    #[error("operation not permitted")]
    Forbidden,
    #[error("invalid tenant header: {0}")]
    InvalidTenant(String),
}

impl AccessError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AccessError::Unauthorized(_) => 1004,
            AccessError::Forbidden => 1005,
            AccessError::InvalidTenant(_) => 1006,
        }
    }
}
