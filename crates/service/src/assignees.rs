//! Assignee lists arrive either as a JSON array or as a comma-delimited string.

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AssigneeInput {
    List(Vec<String>),
    Delimited(String),
}

impl Default for AssigneeInput {
    fn default() -> Self { AssigneeInput::List(Vec::new()) }
}

impl AssigneeInput {
    /// Parse every entry as a UUID. Blank entries are skipped; a single
    /// malformed entry rejects the whole list.
    pub fn parse(&self) -> Result<Vec<Uuid>, ServiceError> {
        let entries: Vec<&str> = match self {
            AssigneeInput::List(items) => items.iter().map(String::as_str).collect(),
            AssigneeInput::Delimited(raw) => raw.split(',').collect(),
        };
        entries
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Uuid::parse_str(s).map_err(|_| ServiceError::Validation(format!("invalid user id: {s}")))
            })
            .collect()
    }
}

impl From<Vec<Uuid>> for AssigneeInput {
    fn from(ids: Vec<Uuid>) -> Self {
        AssigneeInput::List(ids.into_iter().map(|id| id.to_string()).collect())
    }
}
