//! Test doubles shared by the unit tests

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backend::{ApiClient, ApiRequest, Backend, RawResponse};
use crate::error::{ApiError, ApiResult};
use crate::session::{MemoryTokenStore, Session};

/// Replays canned responses in order and records every request
pub struct ScriptedBackend {
    responses: RefCell<VecDeque<ApiResult<RawResponse>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<RawResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(responses: Vec<ApiResult<RawResponse>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Backend for ScriptedBackend {
    async fn send(&self, request: ApiRequest) -> ApiResult<RawResponse> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response left".to_string())))
    }
}

pub fn scripted_client(responses: Vec<RawResponse>) -> ApiClient<ScriptedBackend> {
    ApiClient::new(
        ScriptedBackend::new(responses),
        Session::new(MemoryTokenStore::with_token("test-token")),
    )
}

/// A Spring-style page envelope
pub fn page(content: Value, number: u32, total_pages: u32) -> RawResponse {
    let total_elements = content.as_array().map(|a| a.len()).unwrap_or(0);
    RawResponse::json(
        200,
        &json!({
            "content": content,
            "number": number,
            "totalPages": total_pages,
            "totalElements": total_elements,
        }),
    )
}

pub fn lead_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name })
}
