//! Column value types shared by several entities.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// List of user ids persisted as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct UserIds(pub Vec<Uuid>);

impl UserIds {
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn as_slice(&self) -> &[Uuid] { &self.0 }
}

impl From<Vec<Uuid>> for UserIds {
    fn from(ids: Vec<Uuid>) -> Self { Self(ids) }
}
