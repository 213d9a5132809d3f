//! Predicate Filter Stage
//!
//! Categorical equality AND case-insensitive substring search. Pure and
//! stable: output keeps the input order.

use crate::entity::Searchable;

/// True when `record` passes both the categorical filter and the search term.
///
/// Empty `category` / `term` disable that half of the predicate.
pub fn matches<T: Searchable>(record: &T, category: &str, term: &str) -> bool {
    matches_category(record, category) && matches_term(record, &term.to_lowercase())
}

fn matches_category<T: Searchable>(record: &T, category: &str) -> bool {
    category.is_empty() || record.category() == Some(category)
}

/// `needle` is already lowercased
fn matches_term<T: Searchable>(record: &T, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Subset of `records` passing the predicate, in input order
pub fn filter_records<T: Searchable + Clone>(records: &[T], category: &str, term: &str) -> Vec<T> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| matches_category(*record, category) && matches_term(*record, &needle))
        .cloned()
        .collect()
}

/// Split a collection into (matching, rest) by an arbitrary predicate,
/// keeping order on both sides.
pub fn partition_by<T: Clone>(records: &[T], predicate: impl Fn(&T) -> bool) -> (Vec<T>, Vec<T>) {
    records.iter().cloned().partition(|record| predicate(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Employee, Lead};
    use serde_json::json;

    fn leads() -> Vec<Lead> {
        serde_json::from_value(json!([
            { "id": 1, "name": "Acme Corp", "email": "x@y.com", "status": "NEW" },
            { "id": 2, "name": "Other", "email": "bob@acme.com", "status": "CONTACTED" },
            { "id": 3, "name": "Initech", "status": "NEW",
              "assignedTo": { "id": 4, "name": "Milton" } },
            { "id": 4, "name": "Umbrella", "status": "LOST",
              "conversionStatus": "PENDING", "conversionMessage": "Ready to sign" }
        ]))
        .unwrap()
    }

    fn ids(leads: &[Lead]) -> Vec<i64> {
        leads.iter().map(|l| l.id).collect()
    }

    #[test]
    fn test_search_matches_any_listed_field() {
        let found = filter_records(&leads(), "", "acme");
        assert_eq!(ids(&found), vec![1, 2]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        assert_eq!(ids(&filter_records(&leads(), "", "MILTON")), vec![3]);
        assert_eq!(ids(&filter_records(&leads(), "", "ready TO")), vec![4]);
    }

    #[test]
    fn test_search_keeps_surrounding_spaces() {
        assert_eq!(ids(&filter_records(&leads(), "", "acme ")), vec![1]);
        assert_eq!(ids(&filter_records(&leads(), "", " corp")), vec![1]);
        assert!(filter_records(&leads(), "", " acme").is_empty());
    }

    #[test]
    fn test_category_is_exact_and_case_sensitive() {
        assert_eq!(ids(&filter_records(&leads(), "NEW", "")), vec![1, 3]);
        assert!(filter_records(&leads(), "new", "").is_empty());
    }

    #[test]
    fn test_category_and_search_are_anded() {
        assert_eq!(ids(&filter_records(&leads(), "NEW", "acme")), vec![1]);
        assert!(filter_records(&leads(), "LOST", "acme").is_empty());
    }

    #[test]
    fn test_empty_filters_keep_everything_in_order() {
        assert_eq!(ids(&filter_records(&leads(), "", "")), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_absent_fields_never_match() {
        let employees: Vec<Employee> = serde_json::from_value(json!([
            { "id": 1, "name": "Ann", "email": "ann@corp.io" }
        ]))
        .unwrap();
        assert!(filter_records(&employees, "SALES", "").is_empty());
        assert!(filter_records(&employees, "", "555").is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = filter_records(&leads(), "NEW", "i");
        let twice = filter_records(&once, "NEW", "i");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_commutes_with_partition() {
        let all = leads();
        let (reviewed, personal) = partition_by(&all, Lead::is_manager_reviewed);
        for (cat, term) in [("", "a"), ("NEW", ""), ("LOST", "um"), ("", "zzz")] {
            assert_eq!(
                filter_records(&all, cat, term).len(),
                filter_records(&reviewed, cat, term).len()
                    + filter_records(&personal, cat, term).len()
            );
        }
    }

    #[test]
    fn test_single_record_predicate() {
        let all = leads();
        assert!(matches(&all[0], "NEW", "ACME"));
        assert!(!matches(&all[0], "LOST", ""));
    }
}
