use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::service;
use crate::types::UserIds;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_subtasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<i32>,
    pub target_date: Option<i32>,
    #[sea_orm(column_type = "Json")]
    pub users: UserIds,
    pub enable_workflow: bool,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<String, ModelError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation("title required".into()));
    }
    if trimmed.chars().count() > 255 {
        return Err(ModelError::Validation("title longer than 255 characters".into()));
    }
    Ok(trimmed.to_string())
}

/// Due/target dates are day offsets within the task period.
pub fn validate_day(field: &str, day: Option<i32>) -> Result<(), ModelError> {
    match day {
        Some(d) if d < 0 => Err(ModelError::Validation(format!("{field} must be >= 0"))),
        _ => Ok(()),
    }
}
