//! Collaborator Boundary
//!
//! Each entity declares where it lives on the backend and how the backend's
//! inconsistent key names map onto the canonical ones. Normalization happens
//! here, before deserialization, and nowhere else.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::entity::{Client, Employee, Lead, Record, Role, Searchable, Task};
use crate::error::{ApiResult, GENERIC_REFERENTIAL};

/// A record type served by a role-scoped REST collection
pub trait Resource: Record<Id = i64> + Searchable + DeserializeOwned {
    /// Collection segment, e.g. `leads`
    const COLLECTION: &'static str;

    /// `(alias, canonical)` key pairs the backend is known to send
    const ALIASES: &'static [(&'static str, &'static str)] = &[];

    /// Wording used when a delete trips a foreign key
    const REFERENTIAL_MESSAGE: &'static str = GENERIC_REFERENTIAL;

    /// Human label for messages
    const LABEL: &'static str;

    fn collection_path(role: Role) -> String {
        format!("/api/{}/{}", role.api_prefix(), Self::COLLECTION)
    }

    fn item_path(role: Role, id: i64) -> String {
        format!("{}/{}", Self::collection_path(role), id)
    }
}

impl Resource for Employee {
    const COLLECTION: &'static str = "employees";
    const ALIASES: &'static [(&'static str, &'static str)] = &[
        ("fullName", "name"),
        ("phoneNumber", "phone"),
    ];
    const REFERENTIAL_MESSAGE: &'static str =
        "Cannot delete employee because leads, tasks or clients are still assigned to them";
    const LABEL: &'static str = "employee";
}

impl Resource for Lead {
    const COLLECTION: &'static str = "leads";
    const ALIASES: &'static [(&'static str, &'static str)] = &[
        ("conversion status", "conversionStatus"),
        ("conversion_status", "conversionStatus"),
        ("conversion message", "conversionMessage"),
        ("conversion_message", "conversionMessage"),
        ("assignedEmployee", "assignedTo"),
    ];
    const REFERENTIAL_MESSAGE: &'static str =
        "Cannot delete lead because it has associated tasks";
    const LABEL: &'static str = "lead";
}

impl Resource for Task {
    const COLLECTION: &'static str = "tasks";
    const ALIASES: &'static [(&'static str, &'static str)] = &[
        ("assignedEmployee", "assignedTo"),
        ("assignedManager", "assignedBy"),
        ("deadline", "dueDate"),
    ];
    const LABEL: &'static str = "task";
}

impl Resource for Client {
    const COLLECTION: &'static str = "clients";
    const ALIASES: &'static [(&'static str, &'static str)] = &[
        ("assignedEmployee", "assignedTo"),
        ("companyName", "company"),
    ];
    const REFERENTIAL_MESSAGE: &'static str =
        "Cannot delete client because it still has linked records";
    const LABEL: &'static str = "client";
}

/// Rename alias keys onto canonical keys; an existing canonical key wins.
pub fn normalize(value: Value, aliases: &[(&str, &str)]) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_object(map, aliases)),
        other => other,
    }
}

fn normalize_object(mut map: Map<String, Value>, aliases: &[(&str, &str)]) -> Map<String, Value> {
    for (alias, canonical) in aliases {
        if let Some(aliased) = map.remove(*alias) {
            let canonical_missing = map.get(*canonical).map(Value::is_null).unwrap_or(true);
            if canonical_missing {
                map.insert((*canonical).to_string(), aliased);
            }
        }
    }
    map
}

/// Normalize then deserialize one backend object
pub fn decode<T: Resource>(value: Value) -> ApiResult<T> {
    Ok(serde_json::from_value(normalize(value, T::ALIASES))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversion_status_alias_is_renamed() {
        let lead: Lead = decode(json!({
            "id": 4,
            "name": "Globex",
            "conversion status": "PENDING",
            "conversion message": "Signed the NDA"
        }))
        .unwrap();
        assert_eq!(lead.conversion_status.as_deref(), Some("PENDING"));
        assert_eq!(lead.conversion_message.as_deref(), Some("Signed the NDA"));
    }

    #[test]
    fn test_canonical_key_wins_over_alias() {
        let normalized = normalize(
            json!({ "conversionStatus": "APPROVED", "conversion status": "PENDING" }),
            Lead::ALIASES,
        );
        assert_eq!(normalized["conversionStatus"], "APPROVED");
        assert!(normalized.get("conversion status").is_none());
    }

    #[test]
    fn test_null_canonical_is_replaced_by_alias() {
        let normalized = normalize(
            json!({ "conversionStatus": null, "conversion_status": "REJECTED" }),
            Lead::ALIASES,
        );
        assert_eq!(normalized["conversionStatus"], "REJECTED");
    }

    #[test]
    fn test_role_scoped_paths() {
        assert_eq!(Lead::collection_path(Role::Manager), "/api/manager/leads");
        assert_eq!(Employee::item_path(Role::Admin, 12), "/api/admin/employees/12");
    }

    #[test]
    fn test_non_objects_pass_through() {
        assert_eq!(normalize(json!([1, 2]), Lead::ALIASES), json!([1, 2]));
    }
}
