//! Backend Collaborator
//!
//! The REST API is opaque to this crate. `Backend` moves one request over the
//! wire; `ApiClient` adds the session credential and turns status codes into
//! `ApiError`s.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One outgoing request, relative to the backend base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of a query parameter, if set
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body as received; the body may be JSON or plain text
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport to the REST backend
///
/// The browser is single-threaded, so futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait Backend {
    async fn send(&self, request: ApiRequest) -> ApiResult<RawResponse>;
}

/// `reqwest`-based transport; uses `fetch` on wasm32
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn send(&self, request: ApiRequest) -> ApiResult<RawResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let builder = self.client.request(request.method.into(), &url);
        let builder = if request.query.is_empty() {
            builder
        } else {
            builder.query(&request.query)
        };
        let builder = match &request.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };
        // Cookie-session endpoints need the browser to send credentials
        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

/// Session-aware client over any transport
pub struct ApiClient<B> {
    backend: B,
    session: Session,
}

impl<B: Backend> ApiClient<B> {
    pub fn new(backend: B, session: Session) -> Self {
        Self { backend, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Send a request and return the body of a 2xx response.
    ///
    /// A 401 clears the stored credential before the error is returned.
    /// A 403 leaves the credential alone.
    pub async fn execute(&self, request: ApiRequest, referential: Option<&str>) -> ApiResult<String> {
        let request = ApiRequest {
            bearer: self.session.bearer(),
            ..request
        };
        let method = request.method;
        let path = request.path.clone();

        let response = self.backend.send(request).await.map_err(|e| {
            log::warn!("{:?} {} failed: {}", method, path, e);
            e
        })?;

        if response.is_success() {
            log::debug!("{:?} {} -> {}", method, path, response.status);
            return Ok(response.body);
        }

        let err = ApiError::from_status(response.status, &response.body, referential);
        log::warn!("{:?} {} -> {}: {}", method, path, response.status, err);
        if err.requires_login() {
            self.session.clear();
        }
        Err(err)
    }

    pub async fn get_value(&self, request: ApiRequest) -> ApiResult<Value> {
        let body = self.execute(request, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let value = self.get_value(ApiRequest::get(path)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST/PUT/PATCH a JSON body; the response may be JSON, text or empty.
    pub async fn send_json<P: Serialize>(
        &self,
        method: Method,
        path: &str,
        payload: &P,
    ) -> ApiResult<Option<Value>> {
        let request = ApiRequest::new(method, path).body(serde_json::to_value(payload)?);
        let body = self.execute(request, None).await?;
        Ok(serde_json::from_str(&body).ok())
    }

    /// DELETE; a foreign key failure is reported with `referential`
    pub async fn delete(&self, path: &str, referential: &str) -> ApiResult<()> {
        self.execute(ApiRequest::new(Method::Delete, path), Some(referential))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_REFERENTIAL;
    use crate::session::MemoryTokenStore;
    use crate::testing::ScriptedBackend;
    use serde_json::json;

    fn client(backend: ScriptedBackend, token: Option<&str>) -> ApiClient<ScriptedBackend> {
        let store = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        ApiClient::new(backend, Session::new(store))
    }

    #[tokio::test]
    async fn test_bearer_is_attached() {
        let backend = ScriptedBackend::new(vec![RawResponse::json(200, &json!([]))]);
        let api = client(backend, Some("tok"));

        api.get_value(ApiRequest::get("/api/admin/employees")).await.unwrap();

        let sent = api.backend().requests();
        assert_eq!(sent[0].bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_credential() {
        let backend = ScriptedBackend::new(vec![RawResponse::new(401, "")]);
        let api = client(backend, Some("tok"));

        let err = api.get_value(ApiRequest::get("/api/manager/leads")).await.unwrap_err();

        assert_eq!(err, ApiError::Authentication);
        assert!(!api.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_forbidden_keeps_credential() {
        let backend = ScriptedBackend::new(vec![RawResponse::new(403, "Access denied")]);
        let api = client(backend, Some("tok"));

        let err = api.get_value(ApiRequest::get("/api/admin/employees")).await.unwrap_err();

        assert_eq!(err, ApiError::Authorization("Access denied".to_string()));
        assert!(api.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_plain_text_success_body_is_not_an_error() {
        let backend = ScriptedBackend::new(vec![RawResponse::new(200, "Lead updated")]);
        let api = client(backend, None);

        let result = api
            .send_json(Method::Put, "/api/manager/leads/1", &json!({}))
            .await
            .unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_missing_token_sends_no_bearer() {
        let backend = ScriptedBackend::new(vec![RawResponse::new(204, "")]);
        let api = client(backend, None);

        api.delete("/api/manager/tasks/3", GENERIC_REFERENTIAL).await.unwrap();

        let sent = api.backend().requests();
        assert_eq!(sent[0].bearer, None);
        assert_eq!(sent[0].method, Method::Delete);
    }
}
