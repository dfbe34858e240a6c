//! `services` entity: the root of the catalog aggregate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::types::UserIds;
use crate::{client_service, service_checklist, service_subtask, supporting_file};

pub const NAME_MAX_LEN: usize = 255;

/// How often recurring services spawn tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "half_yearly")]
    #[serde(alias = "half-yearly")]
    HalfYearly,
    #[sea_orm(string_value = "yearly")]
    #[serde(alias = "annually")]
    Yearly,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    pub is_enabled: bool,
    pub is_checklist_completion_required: bool,
    pub is_recurring: bool,
    pub auto_task_creation_frequency: Option<Frequency>,
    pub target_date_creation_date: Option<i32>,
    pub assign_auto_tasks_to_users_of_respective_clients: bool,
    #[sea_orm(column_type = "Json")]
    pub assign_auto_tasks_to_users: UserIds,
    pub billing_sac_code: Option<String>,
    pub billing_gst_percent: f64,
    pub billing_default_rate: f64,
    pub billing_default_billable: bool,
    pub create_document_collection_request_automatically: bool,
    pub document_request_default_message: Option<String>,
    pub created_by: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Checklists,
    Subtasks,
    SupportingFiles,
    Clients,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Checklists => Entity::has_many(service_checklist::Entity).into(),
            Relation::Subtasks => Entity::has_many(service_subtask::Entity).into(),
            Relation::SupportingFiles => Entity::has_many(supporting_file::Entity).into(),
            Relation::Clients => Entity::has_many(client_service::Entity).into(),
        }
    }
}

impl Related<service_checklist::Entity> for Entity {
    fn to() -> RelationDef { Relation::Checklists.def() }
}

impl Related<service_subtask::Entity> for Entity {
    fn to() -> RelationDef { Relation::Subtasks.def() }
}

impl Related<supporting_file::Entity> for Entity {
    fn to() -> RelationDef { Relation::SupportingFiles.def() }
}

impl Related<client_service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Clients.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trimmed, non-empty, bounded service name.
pub fn validate_name(name: &str) -> Result<String, ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(ModelError::Validation(format!("name longer than {NAME_MAX_LEN} characters")));
    }
    Ok(trimmed.to_string())
}

/// Day of the period on which the task target date is set.
pub fn validate_target_day(day: Option<i32>) -> Result<(), ModelError> {
    match day {
        Some(d) if !(0..=31).contains(&d) => {
            Err(ModelError::Validation("target_date_creation_date must be within 0..=31".into()))
        }
        _ => Ok(()),
    }
}

pub fn validate_gst_percent(p: f64) -> Result<(), ModelError> {
    if !p.is_finite() || !(0.0..=100.0).contains(&p) {
        return Err(ModelError::Validation("billing_gst_percent must be within 0..=100".into()));
    }
    Ok(())
}

pub fn validate_default_rate(r: f64) -> Result<(), ModelError> {
    if !r.is_finite() || r < 0.0 {
        return Err(ModelError::Validation("billing_default_rate must be >= 0".into()));
    }
    Ok(())
}

/// Frequency is present iff the service recurs. A frequency supplied for a
/// non-recurring service is dropped.
pub fn resolve_frequency(is_recurring: bool, frequency: Option<Frequency>) -> Result<Option<Frequency>, ModelError> {
    match (is_recurring, frequency) {
        (true, None) => Err(ModelError::Validation(
            "auto_task_creation_frequency is required for recurring services".into(),
        )),
        (true, Some(f)) => Ok(Some(f)),
        (false, _) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurring_requires_frequency() {
        assert!(resolve_frequency(true, None).is_err());
        assert_eq!(resolve_frequency(true, Some(Frequency::Monthly)).unwrap(), Some(Frequency::Monthly));
    }

    #[test]
    fn non_recurring_clears_frequency() {
        assert_eq!(resolve_frequency(false, Some(Frequency::Yearly)).unwrap(), None);
        assert_eq!(resolve_frequency(false, None).unwrap(), None);
    }

    #[test]
    fn frequency_accepts_aliases() {
        let f: Frequency = serde_json::from_str("\"annually\"").unwrap();
        assert_eq!(f, Frequency::Yearly);
        let f: Frequency = serde_json::from_str("\"half-yearly\"").unwrap();
        assert_eq!(f, Frequency::HalfYearly);
        assert_eq!(serde_json::to_string(&Frequency::HalfYearly).unwrap(), "\"half_yearly\"");
        assert!(serde_json::from_str::<Frequency>("\"weekly\"").is_err());
    }

    #[test]
    fn name_is_trimmed_and_required() {
        assert_eq!(validate_name("  Audit ").unwrap(), "Audit");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn billing_bounds() {
        assert!(validate_gst_percent(18.0).is_ok());
        assert!(validate_gst_percent(101.0).is_err());
        assert!(validate_gst_percent(f64::NAN).is_err());
        assert!(validate_default_rate(0.0).is_ok());
        assert!(validate_default_rate(-1.0).is_err());
        assert!(validate_target_day(Some(15)).is_ok());
        assert!(validate_target_day(Some(32)).is_err());
        assert!(validate_target_day(None).is_ok());
    }
}
