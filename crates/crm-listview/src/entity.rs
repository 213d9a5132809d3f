//! CRM Entities
//!
//! Data structures matching the backend's JSON, plus the two traits the list
//! view needs from every record: identity and searchable attributes.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Core trait for every listable record
pub trait Record: Clone {
    /// The type of the record's unique identifier
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// Returns the record's unique identifier
    fn id(&self) -> Self::Id;
}

/// Attributes consulted by the predicate filter stage
pub trait Searchable {
    /// Value of the designated categorical field (status, department, ...)
    fn category(&self) -> Option<&str>;

    /// Fields the free-text search matches against; `None` never matches
    fn search_fields(&self) -> Vec<Option<&str>>;
}

/// Join a lookup reference against a loaded collection
pub fn lookup<'a, T: Record>(collection: &'a [T], id: &T::Id) -> Option<&'a T> {
    collection.iter().find(|record| &record.id() == id)
}

/// Backend timestamps arrive naive, with an offset, or with `Z`. A value
/// that fits none of those becomes `None` instead of failing the record.
mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(with_offset.naive_utc());
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)))
    }

    pub fn parse_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| raw.get(..10).and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()))
    }

    fn raw_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(raw)) => Some(raw),
            Some(other) => {
                log::debug!("ignoring non-string timestamp {}", other);
                None
            }
            None => None,
        })
    }

    pub fn lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        Ok(raw_string(deserializer)?.and_then(|raw| {
            let parsed = parse(&raw);
            if parsed.is_none() {
                log::debug!("ignoring unparseable timestamp {:?}", raw);
            }
            parsed
        }))
    }

    pub fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        Ok(raw_string(deserializer)?.as_deref().and_then(parse_date))
    }
}

// ========================
// Roles
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Employee => "EMPLOYEE",
        }
    }

    /// Path segment of the role-scoped endpoints
    pub fn api_prefix(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }

    /// Accepts `ADMIN`, `admin` and Spring-style `ROLE_ADMIN`
    pub fn parse(raw: &str) -> Option<Role> {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "ADMIN" => Some(Role::Admin),
            "MANAGER" => Some(Role::Manager),
            "EMPLOYEE" => Some(Role::Employee),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========================
// Lookup references
// ========================

/// Embedded user reference (assignee, assigner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Embedded lead reference on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

// ========================
// Employee
// ========================

pub const DEPARTMENTS: &[&str] = &["SALES", "MARKETING", "SUPPORT", "OPERATIONS", "FINANCE"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Record for Employee {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Employee {
    fn category(&self) -> Option<&str> {
        self.department.as_deref()
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            Some(self.email.as_str()),
            self.phone.as_deref(),
            self.department.as_deref(),
            self.role.map(Role::as_str),
        ]
    }
}

// ========================
// Lead
// ========================

pub const LEAD_STATUSES: &[&str] = &[
    "NEW",
    "CONTACTED",
    "QUALIFIED",
    "PROPOSAL",
    "NEGOTIATION",
    "CONVERTED",
    "LOST",
];

pub const CONVERSION_PENDING: &str = "PENDING";
pub const CONVERSION_APPROVED: &str = "APPROVED";
pub const CONVERSION_REJECTED: &str = "REJECTED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub conversion_status: Option<String>,
    #[serde(default)]
    pub conversion_message: Option<String>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Lead {
    /// A lead leaves the employee's personal list once a conversion
    /// request has been filed for manager review.
    pub fn is_manager_reviewed(&self) -> bool {
        self.conversion_status
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.assigned_to.as_ref().map(|u| u.name.as_str())
    }
}

impl Record for Lead {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Lead {
    fn category(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.email.as_deref(),
            self.phone.as_deref(),
            self.company.as_deref(),
            self.status.as_deref(),
            self.assignee_name(),
            self.conversion_message.as_deref(),
        ]
    }
}

// ========================
// Task
// ========================

pub const TASK_STATUSES: &[&str] = &["PENDING", "IN_PROGRESS", "COMPLETED"];
pub const TASK_PRIORITIES: &[&str] = &["LOW", "MEDIUM", "HIGH"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "timestamp::lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub lead: Option<LeadRef>,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub assigned_by: Option<UserRef>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Record for Task {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Task {
    fn category(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            self.description.as_deref(),
            self.status.as_deref(),
            self.priority.as_deref(),
            self.lead.as_ref().map(|l| l.name.as_str()),
            self.assigned_to.as_ref().map(|u| u.name.as_str()),
            self.assigned_by.as_ref().map(|u| u.name.as_str()),
        ]
    }
}

// ========================
// Client
// ========================

pub const CLIENT_STATUSES: &[&str] = &["ACTIVE", "INACTIVE"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Record for Client {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Client {
    fn category(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.email.as_deref(),
            self.phone.as_deref(),
            self.company.as_deref(),
            self.status.as_deref(),
            self.assigned_to.as_ref().map(|u| u.name.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamps_accept_offsets_and_drop_garbage() {
        let zulu: Client = serde_json::from_value(json!({
            "id": 1,
            "name": "Zulu",
            "createdAt": "2024-03-01T09:30:00Z",
            "updatedAt": "2024-03-01T11:30:00+02:00"
        }))
        .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 30, 0);
        assert_eq!(zulu.created_at, expected);
        assert_eq!(zulu.updated_at, expected);

        let garbage: Client = serde_json::from_value(json!({
            "id": 2,
            "name": "Garbage",
            "createdAt": "yesterday",
            "updatedAt": [2024, 3, 1]
        }))
        .unwrap();
        assert_eq!(garbage.created_at, None);
        assert_eq!(garbage.updated_at, None);
    }

    #[test]
    fn test_due_date_accepts_date_time() {
        let task: Task = serde_json::from_value(json!({
            "id": 3,
            "title": "Follow up",
            "dueDate": "2024-05-20T00:00:00"
        }))
        .unwrap();
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 20));
    }

    #[test]
    fn test_role_parse_accepts_spring_prefix() {
        assert_eq!(Role::parse("ROLE_MANAGER"), Some(Role::Manager));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("guest"), None);
    }

    #[test]
    fn test_lead_deserializes_with_missing_optionals() {
        let lead: Lead = serde_json::from_value(json!({
            "id": 7,
            "name": "Acme Corp",
            "assignedTo": { "id": 3, "name": "Priya" },
            "createdAt": "2024-03-01T09:30:00"
        }))
        .unwrap();
        assert_eq!(lead.id(), 7);
        assert_eq!(lead.assignee_name(), Some("Priya"));
        assert!(lead.email.is_none());
        assert!(lead.created_at.is_some());
        assert!(!lead.is_manager_reviewed());
    }

    #[test]
    fn test_manager_reviewed_requires_non_blank_status() {
        let mut lead: Lead = serde_json::from_value(json!({ "id": 1, "name": "x" })).unwrap();
        lead.conversion_status = Some("  ".to_string());
        assert!(!lead.is_manager_reviewed());
        lead.conversion_status = Some(CONVERSION_PENDING.to_string());
        assert!(lead.is_manager_reviewed());
    }

    #[test]
    fn test_lookup_by_id() {
        let clients: Vec<Client> = serde_json::from_value(json!([
            { "id": 1, "name": "One" },
            { "id": 2, "name": "Two" }
        ]))
        .unwrap();
        assert_eq!(lookup(&clients, &2).map(|c| c.name.as_str()), Some("Two"));
        assert!(lookup(&clients, &9).is_none());
    }
}
