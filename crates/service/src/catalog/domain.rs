use models::service::{self, Frequency};
use models::service_checklist;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::assignees::AssigneeInput;
use crate::errors::ServiceError;
use crate::options::{NewChecklistItem, NewSubtask};
use crate::patch::{apply as apply_patch, double_option};

fn default_true() -> bool { true }

/// Create payload. Only `name` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_checklist_completion_required: bool,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub auto_task_creation_frequency: Option<Frequency>,
    #[serde(default)]
    pub target_date_creation_date: Option<i32>,
    #[serde(default)]
    pub assign_auto_tasks_to_users_of_respective_clients: bool,
    #[serde(default)]
    pub assign_auto_tasks_to_users: AssigneeInput,
    #[serde(default)]
    pub billing_sac_code: Option<String>,
    #[serde(default)]
    pub billing_gst_percent: f64,
    #[serde(default)]
    pub billing_default_rate: f64,
    #[serde(default = "default_true")]
    pub billing_default_billable: bool,
    #[serde(default)]
    pub create_document_collection_request_automatically: bool,
    #[serde(default)]
    pub document_request_default_message: Option<String>,
    #[serde(default)]
    pub checklists: Vec<NewChecklistItem>,
    #[serde(default)]
    pub subtasks: Vec<NewSubtask>,
}

impl NewService {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_enabled: true,
            is_checklist_completion_required: false,
            is_recurring: false,
            auto_task_creation_frequency: None,
            target_date_creation_date: None,
            assign_auto_tasks_to_users_of_respective_clients: false,
            assign_auto_tasks_to_users: AssigneeInput::default(),
            billing_sac_code: None,
            billing_gst_percent: 0.0,
            billing_default_rate: 0.0,
            billing_default_billable: true,
            create_document_collection_request_automatically: false,
            document_request_default_message: None,
            checklists: Vec::new(),
            subtasks: Vec::new(),
        }
    }
}

/// Settings PATCH body: absent fields keep their value, `null` clears nullable ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSettingsPatch {
    pub name: Option<String>,
    pub is_enabled: Option<bool>,
    pub is_checklist_completion_required: Option<bool>,
    pub is_recurring: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub auto_task_creation_frequency: Option<Option<Frequency>>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_date_creation_date: Option<Option<i32>>,
    pub assign_auto_tasks_to_users_of_respective_clients: Option<bool>,
    /// `null` clears the list.
    #[serde(default, deserialize_with = "double_option")]
    pub assign_auto_tasks_to_users: Option<Option<AssigneeInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub billing_sac_code: Option<Option<String>>,
    pub billing_gst_percent: Option<f64>,
    pub billing_default_rate: Option<f64>,
    pub billing_default_billable: Option<bool>,
    pub create_document_collection_request_automatically: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub document_request_default_message: Option<Option<String>>,
}

impl ServiceSettingsPatch {
    /// Merge into `target` and re-validate the merged record.
    pub fn apply_to(self, target: &mut service::Model) -> Result<(), ServiceError> {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(v) = self.is_enabled {
            target.is_enabled = v;
        }
        if let Some(v) = self.is_checklist_completion_required {
            target.is_checklist_completion_required = v;
        }
        if let Some(v) = self.is_recurring {
            target.is_recurring = v;
        }
        apply_patch(&mut target.auto_task_creation_frequency, self.auto_task_creation_frequency);
        apply_patch(&mut target.target_date_creation_date, self.target_date_creation_date);
        if let Some(v) = self.assign_auto_tasks_to_users_of_respective_clients {
            target.assign_auto_tasks_to_users_of_respective_clients = v;
        }
        if let Some(users) = self.assign_auto_tasks_to_users {
            target.assign_auto_tasks_to_users = users.map(|u| u.parse()).transpose()?.unwrap_or_default().into();
        }
        apply_patch(&mut target.billing_sac_code, self.billing_sac_code);
        if let Some(v) = self.billing_gst_percent {
            target.billing_gst_percent = v;
        }
        if let Some(v) = self.billing_default_rate {
            target.billing_default_rate = v;
        }
        if let Some(v) = self.billing_default_billable {
            target.billing_default_billable = v;
        }
        if let Some(v) = self.create_document_collection_request_automatically {
            target.create_document_collection_request_automatically = v;
        }
        apply_patch(&mut target.document_request_default_message, self.document_request_default_message);
        normalize(target)
    }
}

/// Field validation shared by create and update. Clears the frequency of
/// non-recurring services and trims optional text.
pub(crate) fn normalize(m: &mut service::Model) -> Result<(), ServiceError> {
    m.name = service::validate_name(&m.name)?;
    m.auto_task_creation_frequency = service::resolve_frequency(m.is_recurring, m.auto_task_creation_frequency)?;
    service::validate_target_day(m.target_date_creation_date)?;
    service::validate_gst_percent(m.billing_gst_percent)?;
    service::validate_default_rate(m.billing_default_rate)?;
    m.billing_sac_code = trimmed(m.billing_sac_code.take());
    m.document_request_default_message = trimmed(m.document_request_default_message.take());
    Ok(())
}

/// Every column marked `Set`, for inserts and whole-row updates.
pub(crate) fn active_model(m: service::Model) -> service::ActiveModel {
    service::ActiveModel {
        id: Set(m.id),
        agency_id: Set(m.agency_id),
        name: Set(m.name),
        is_enabled: Set(m.is_enabled),
        is_checklist_completion_required: Set(m.is_checklist_completion_required),
        is_recurring: Set(m.is_recurring),
        auto_task_creation_frequency: Set(m.auto_task_creation_frequency),
        target_date_creation_date: Set(m.target_date_creation_date),
        assign_auto_tasks_to_users_of_respective_clients: Set(m.assign_auto_tasks_to_users_of_respective_clients),
        assign_auto_tasks_to_users: Set(m.assign_auto_tasks_to_users),
        billing_sac_code: Set(m.billing_sac_code),
        billing_gst_percent: Set(m.billing_gst_percent),
        billing_default_rate: Set(m.billing_default_rate),
        billing_default_billable: Set(m.billing_default_billable),
        create_document_collection_request_automatically: Set(m.create_document_collection_request_automatically),
        document_request_default_message: Set(m.document_request_default_message),
        created_by: Set(m.created_by),
        created_at: Set(m.created_at),
    }
}

fn trimmed(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Read model: the service row with its checklist embedded.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    #[serde(flatten)]
    pub service: service::Model,
    pub checklists: Vec<service_checklist::Model>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::types::UserIds;
    use serde_json::json;
    use uuid::Uuid;

    fn existing() -> service::Model {
        service::Model {
            id: Uuid::new_v4(),
            agency_id: Uuid::new_v4(),
            name: "Audit".into(),
            is_enabled: true,
            is_checklist_completion_required: false,
            is_recurring: true,
            auto_task_creation_frequency: Some(Frequency::Monthly),
            target_date_creation_date: Some(7),
            assign_auto_tasks_to_users_of_respective_clients: false,
            assign_auto_tasks_to_users: UserIds(vec![Uuid::new_v4()]),
            billing_sac_code: Some("998222".into()),
            billing_gst_percent: 18.0,
            billing_default_rate: 1500.0,
            billing_default_billable: true,
            create_document_collection_request_automatically: false,
            document_request_default_message: None,
            created_by: "u1".into(),
            created_at: Utc::now().into(),
        }
    }

    fn patch(v: serde_json::Value) -> ServiceSettingsPatch { serde_json::from_value(v).unwrap() }

    #[test]
    fn only_present_fields_change() {
        let mut m = existing();
        let before = m.clone();
        patch(json!({"is_enabled": false})).apply_to(&mut m).unwrap();
        assert!(!m.is_enabled);
        assert_eq!(m.name, before.name);
        assert_eq!(m.auto_task_creation_frequency, before.auto_task_creation_frequency);
        assert_eq!(m.billing_sac_code, before.billing_sac_code);
        assert_eq!(m.assign_auto_tasks_to_users, before.assign_auto_tasks_to_users);
    }

    #[test]
    fn turning_recurrence_off_clears_frequency() {
        let mut m = existing();
        patch(json!({"is_recurring": false})).apply_to(&mut m).unwrap();
        assert!(!m.is_recurring);
        assert_eq!(m.auto_task_creation_frequency, None);
    }

    #[test]
    fn recurring_without_frequency_is_invalid() {
        let mut m = existing();
        let err = patch(json!({"auto_task_creation_frequency": null})).apply_to(&mut m).unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }

    #[test]
    fn null_clears_nullable_fields() {
        let mut m = existing();
        patch(json!({"billing_sac_code": null, "assign_auto_tasks_to_users": null, "target_date_creation_date": null}))
            .apply_to(&mut m)
            .unwrap();
        assert_eq!(m.billing_sac_code, None);
        assert!(m.assign_auto_tasks_to_users.is_empty());
        assert_eq!(m.target_date_creation_date, None);
    }

    #[test]
    fn assignees_accept_delimited_string() {
        let mut m = existing();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        patch(json!({"assign_auto_tasks_to_users": format!("{a}, {b}")})).apply_to(&mut m).unwrap();
        assert_eq!(m.assign_auto_tasks_to_users.as_slice(), &[a, b]);
        let err = patch(json!({"assign_auto_tasks_to_users": "nope"})).apply_to(&mut m).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn create_defaults() {
        let s: NewService = serde_json::from_value(json!({"name": "Audit"})).unwrap();
        assert!(s.is_enabled);
        assert!(s.billing_default_billable);
        assert!(!s.is_recurring);
        assert_eq!(s.billing_gst_percent, 0.0);
        assert!(s.checklists.is_empty());
        assert!(serde_json::from_value::<NewService>(json!({"is_enabled": true})).is_err());
    }
}
