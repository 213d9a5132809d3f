//! Form Drafts
//!
//! Payloads for create/update, built from form fields and validated before
//! they are sent.

use chrono::NaiveDate;
use serde::Serialize;

use crate::entity::{
    Client, Employee, Lead, Role, Task, CLIENT_STATUSES, DEPARTMENTS, LEAD_STATUSES,
    TASK_PRIORITIES, TASK_STATUSES,
};
use crate::error::{ApiError, ApiResult};
use crate::validate::{self, Validate};

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub role: Option<Role>,
    /// Only sent on create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Validate for EmployeeDraft {
    fn validate(&self) -> ApiResult<()> {
        validate::required("Name", &self.name)?;
        validate::email(&self.email)?;
        validate::optional_phone(self.phone.as_deref())?;
        if let Some(department) = non_blank(&self.department) {
            validate::one_of("Department", department, DEPARTMENTS)?;
        }
        if self.role.is_none() {
            return Err(ApiError::Validation("Role is required".to_string()));
        }
        Ok(())
    }
}

impl From<&Employee> for EmployeeDraft {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            department: employee.department.clone(),
            role: employee.role,
            password: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub assigned_to_id: Option<i64>,
}

impl Default for LeadDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: None,
            company: None,
            status: LEAD_STATUSES[0].to_string(),
            assigned_to_id: None,
        }
    }
}

impl Validate for LeadDraft {
    fn validate(&self) -> ApiResult<()> {
        validate::required("Name", &self.name)?;
        validate::email(&self.email)?;
        validate::optional_phone(self.phone.as_deref())?;
        validate::one_of("Status", &self.status, LEAD_STATUSES)
    }
}

impl From<&Lead> for LeadDraft {
    fn from(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            email: lead.email.clone().unwrap_or_default(),
            phone: lead.phone.clone(),
            company: lead.company.clone(),
            status: lead
                .status
                .clone()
                .unwrap_or_else(|| LEAD_STATUSES[0].to_string()),
            assigned_to_id: lead.assigned_to.as_ref().map(|u| u.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub lead_id: Option<i64>,
    pub assigned_to_id: Option<i64>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            status: TASK_STATUSES[0].to_string(),
            priority: TASK_PRIORITIES[1].to_string(),
            due_date: None,
            lead_id: None,
            assigned_to_id: None,
        }
    }
}

impl Validate for TaskDraft {
    fn validate(&self) -> ApiResult<()> {
        validate::required("Title", &self.title)?;
        validate::one_of("Status", &self.status, TASK_STATUSES)?;
        validate::one_of("Priority", &self.priority, TASK_PRIORITIES)?;
        if self.assigned_to_id.is_none() {
            return Err(ApiError::Validation("Assignee is required".to_string()));
        }
        Ok(())
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        let defaults = TaskDraft::default();
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.clone().unwrap_or(defaults.status),
            priority: task.priority.clone().unwrap_or(defaults.priority),
            due_date: task.due_date,
            lead_id: task.lead.as_ref().map(|l| l.id),
            assigned_to_id: task.assigned_to.as_ref().map(|u| u.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub assigned_to_id: Option<i64>,
}

impl Default for ClientDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: None,
            company: None,
            status: CLIENT_STATUSES[0].to_string(),
            assigned_to_id: None,
        }
    }
}

impl Validate for ClientDraft {
    fn validate(&self) -> ApiResult<()> {
        validate::required("Name", &self.name)?;
        validate::email(&self.email)?;
        validate::optional_phone(self.phone.as_deref())?;
        validate::one_of("Status", &self.status, CLIENT_STATUSES)
    }
}

impl From<&Client> for ClientDraft {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            email: client.email.clone().unwrap_or_default(),
            phone: client.phone.clone(),
            company: client.company.clone(),
            status: client
                .status
                .clone()
                .unwrap_or_else(|| CLIENT_STATUSES[0].to_string()),
            assigned_to_id: client.assigned_to.as_ref().map(|u| u.id),
        }
    }
}

// ========================
// Partial updates
// ========================

/// Status change on a lead, task or client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusPatch {
    pub status: String,
}

impl StatusPatch {
    pub fn checked(status: &str, allowed: &[&str]) -> ApiResult<Self> {
        validate::one_of("Status", status, allowed)?;
        Ok(Self {
            status: status.to_string(),
        })
    }
}

/// Reassign a lead or client to another employee
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPatch {
    pub assigned_to_id: i64,
}

/// Employee asks the manager to convert a lead into a client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub conversion_message: String,
}

impl Validate for ConversionRequest {
    fn validate(&self) -> ApiResult<()> {
        validate::required("Conversion message", &self.conversion_message)
    }
}

/// Manager decision on a pending conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReview {
    pub approved: bool,
    pub remark: Option<String>,
}

/// Login form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Validate for Credentials {
    fn validate(&self) -> ApiResult<()> {
        validate::email(&self.email)?;
        validate::required("Password", &self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lead_draft_requires_name_and_email() {
        let mut draft = LeadDraft::default();
        assert_eq!(
            draft.validate().unwrap_err().user_message(),
            "Name is required"
        );
        draft.name = "Acme".to_string();
        draft.email = "not-an-email".to_string();
        assert!(draft.validate().is_err());
        draft.email = "sales@acme.com".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_lead_draft_serializes_camel_case() {
        let draft = LeadDraft {
            name: "Acme".to_string(),
            email: "a@acme.com".to_string(),
            assigned_to_id: Some(3),
            ..LeadDraft::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["assignedToId"], json!(3));
        assert_eq!(value["status"], json!("NEW"));
    }

    #[test]
    fn test_employee_draft_rejects_unknown_department() {
        let draft = EmployeeDraft {
            name: "Ann".to_string(),
            email: "ann@corp.io".to_string(),
            department: Some("LEGAL".to_string()),
            role: Some(Role::Employee),
            ..EmployeeDraft::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_employee_password_only_sent_when_set() {
        let draft = EmployeeDraft::default();
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_task_draft_requires_assignee() {
        let draft = TaskDraft {
            title: "Call back".to_string(),
            ..TaskDraft::default()
        };
        assert_eq!(
            draft.validate().unwrap_err().user_message(),
            "Assignee is required"
        );
    }

    #[test]
    fn test_status_patch_is_checked() {
        assert!(StatusPatch::checked("COMPLETED", TASK_STATUSES).is_ok());
        assert!(StatusPatch::checked("DONE", TASK_STATUSES).is_err());
    }

    #[test]
    fn test_draft_prefills_from_record() {
        let client: Client = serde_json::from_value(json!({
            "id": 2, "name": "Wayne", "email": "b@wayne.com",
            "assignedTo": { "id": 8, "name": "Alfred" }
        }))
        .unwrap();
        let draft = ClientDraft::from(&client);
        assert_eq!(draft.assigned_to_id, Some(8));
        assert_eq!(draft.status, "ACTIVE");
    }
}
