//! Remote Collection Loader
//!
//! Walks a paged endpoint from page 0 until the reported page count is
//! exhausted, then normalizes and deduplicates the merged content. Pages are
//! requested strictly one after another: the page count comes from the
//! previous response.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::backend::{ApiClient, ApiRequest, Backend};
use crate::entity::Record;
use crate::error::ApiResult;
use crate::resource::{decode, Resource};

/// Either a bare array or a Spring `Page` object
#[derive(Deserialize)]
#[serde(untagged)]
enum PageEnvelope {
    Bare(Vec<Value>),
    Paged(PagedBody),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedBody {
    #[serde(default)]
    content: Vec<Value>,
    #[serde(default)]
    total_pages: Option<u32>,
}

/// Fetch every page of `path` and return the collection, unique by id.
///
/// Errors are returned as-is; nothing is retried.
pub async fn load_all<T, B>(api: &ApiClient<B>, path: &str, page_size: u32) -> ApiResult<Vec<T>>
where
    T: Resource,
    B: Backend,
{
    let mut raw = Vec::new();
    let mut page: u32 = 0;

    loop {
        let request = ApiRequest::get(path)
            .query("page", page)
            .query("size", page_size);
        let envelope: PageEnvelope = serde_json::from_value(api.get_value(request).await?)?;

        match envelope {
            PageEnvelope::Bare(items) => {
                raw.extend(items);
                break;
            }
            PageEnvelope::Paged(body) => {
                raw.extend(body.content);
                page += 1;
                if page >= body.total_pages.unwrap_or(1) {
                    break;
                }
            }
        }
    }

    let records = raw
        .into_iter()
        .map(decode::<T>)
        .collect::<ApiResult<Vec<T>>>()?;
    let fetched = records.len();
    let records = dedup_by_id(records);
    log::debug!(
        "loaded {} {} record(s) from {} in {} page(s), {} duplicate(s) dropped",
        records.len(),
        T::LABEL,
        path,
        page.max(1),
        fetched - records.len()
    );
    Ok(records)
}

/// Keep the first occurrence of each id, preserving order
pub fn dedup_by_id<T: Record>(records: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RawResponse;
    use crate::entity::Lead;
    use crate::error::ApiError;
    use crate::testing::{lead_json, page, scripted_client};
    use serde_json::json;

    #[tokio::test]
    async fn test_walks_every_reported_page_in_order() {
        let api = scripted_client(vec![
            page(json!([lead_json(1, "a"), lead_json(2, "b")]), 0, 3),
            page(json!([lead_json(3, "c")]), 1, 3),
            page(json!([lead_json(4, "d")]), 2, 3),
        ]);

        let leads: Vec<Lead> = load_all(&api, "/api/manager/leads", 50).await.unwrap();

        let pages: Vec<String> = api
            .backend()
            .requests()
            .iter()
            .map(|r| r.query_value("page").unwrap_or_default().to_string())
            .collect();
        assert_eq!(pages, vec!["0", "1", "2"]);
        assert_eq!(leads.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_sends_requested_page_size() {
        let api = scripted_client(vec![page(json!([]), 0, 1)]);

        let _: Vec<Lead> = load_all(&api, "/api/manager/leads", 50).await.unwrap();

        assert_eq!(api.backend().requests()[0].query_value("size"), Some("50"));
    }

    #[tokio::test]
    async fn test_bare_array_is_a_single_page() {
        let api = scripted_client(vec![RawResponse::json(
            200,
            &json!([lead_json(1, "a"), lead_json(2, "b")]),
        )]);

        let leads: Vec<Lead> = load_all(&api, "/api/employee/leads", 50).await.unwrap();

        assert_eq!(leads.len(), 2);
        assert_eq!(api.backend().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_pages_are_deduplicated() {
        let api = scripted_client(vec![
            page(json!([lead_json(1, "first"), lead_json(2, "b")]), 0, 2),
            page(json!([lead_json(2, "b again"), lead_json(3, "c")]), 1, 2),
        ]);

        let leads: Vec<Lead> = load_all(&api, "/api/manager/leads", 2).await.unwrap();

        assert_eq!(leads.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(leads[1].name, "b");
    }

    #[tokio::test]
    async fn test_empty_collection_with_zero_pages() {
        let api = scripted_client(vec![page(json!([]), 0, 0)]);

        let leads: Vec<Lead> = load_all(&api, "/api/manager/leads", 50).await.unwrap();

        assert!(leads.is_empty());
        assert_eq!(api.backend().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_aliases_are_normalized_while_loading() {
        let api = scripted_client(vec![page(
            json!([{ "id": 9, "name": "x", "conversion status": "PENDING" }]),
            0,
            1,
        )]);

        let leads: Vec<Lead> = load_all(&api, "/api/employee/leads", 50).await.unwrap();

        assert!(leads[0].is_manager_reviewed());
    }

    #[tokio::test]
    async fn test_mixed_timestamp_formats_load_every_record() {
        let api = scripted_client(vec![page(
            json!([
                { "id": 1, "name": "naive", "createdAt": "2024-03-01T09:30:00" },
                { "id": 2, "name": "zulu", "createdAt": "2024-03-01T09:30:00Z" },
                { "id": 3, "name": "broken", "createdAt": "not a date" }
            ]),
            0,
            1,
        )]);

        let leads: Vec<Lead> = load_all(&api, "/api/manager/leads", 50).await.unwrap();

        assert_eq!(leads.len(), 3);
        assert_eq!(leads[0].created_at, leads[1].created_at);
        assert_eq!(leads[2].created_at, None);
    }

    #[tokio::test]
    async fn test_failure_mid_walk_surfaces_error() {
        let api = scripted_client(vec![
            page(json!([lead_json(1, "a")]), 0, 2),
            RawResponse::new(500, "database unavailable"),
        ]);

        let err = load_all::<Lead, _>(&api, "/api/manager/leads", 50).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Server { status: 500, detail: "database unavailable".to_string() }
        );
        assert_eq!(api.backend().requests().len(), 2);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let leads: Vec<Lead> = serde_json::from_value(json!([
            lead_json(5, "keep"),
            lead_json(5, "drop"),
            lead_json(6, "other"),
        ]))
        .unwrap();

        let unique = dedup_by_id(leads);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "keep");
    }
}
