//! Shared helpers used by every binary and library crate of the catalog backend:
//! logging initialisation, runtime directory checks and small response types.

pub mod env;
pub mod types;
pub mod utils;
