//! Login / Logout
//!
//! Only the client side of the exchange: post credentials, keep the token,
//! learn the role. The backend decides everything else.

use serde::Deserialize;

use crate::backend::{ApiClient, Backend, Method};
use crate::draft::Credentials;
use crate::entity::Role;
use crate::error::{ApiError, ApiResult};
use crate::validate::Validate;

/// Who is logged in
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserBody {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, alias = "userId")]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    role: String,
}

impl UserBody {
    fn into_user(self) -> ApiResult<CurrentUser> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| ApiError::Decode(format!("unknown role {}", self.role)))?;
        Ok(CurrentUser {
            id: self.id,
            name: self.name.unwrap_or_default(),
            email: self.email,
            role,
        })
    }
}

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const ME_PATH: &str = "/api/auth/me";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Post credentials; on success the token (if any) is stored in the session.
///
/// Cookie-session backends may omit the token; the browser then carries the
/// session cookie instead.
pub async fn login<B: Backend>(api: &ApiClient<B>, credentials: &Credentials) -> ApiResult<CurrentUser> {
    credentials.validate()?;
    let value = api
        .send_json(Method::Post, LOGIN_PATH, credentials)
        .await?
        .ok_or_else(|| ApiError::Decode("login response was not JSON".to_string()))?;
    let body: UserBody = serde_json::from_value(value)?;
    if let Some(token) = body.token.as_deref() {
        api.session().set_token(token);
    }
    let user = body.into_user()?;
    log::info!("logged in as {} ({})", user.name, user.role);
    Ok(user)
}

/// Resolve the logged-in user from the stored credential
pub async fn current_user<B: Backend>(api: &ApiClient<B>) -> ApiResult<CurrentUser> {
    let body: UserBody = api.get_json(ME_PATH).await?;
    body.into_user()
}

/// Tell the backend, then forget the credential regardless of the outcome
pub async fn logout<B: Backend>(api: &ApiClient<B>) {
    if let Err(e) = api
        .send_json(Method::Post, LOGOUT_PATH, &serde_json::json!({}))
        .await
    {
        log::debug!("logout request failed: {}", e);
    }
    api.session().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RawResponse;
    use crate::session::{MemoryTokenStore, Session};
    use crate::testing::ScriptedBackend;
    use serde_json::json;

    fn anonymous(responses: Vec<RawResponse>) -> ApiClient<ScriptedBackend> {
        ApiClient::new(ScriptedBackend::new(responses), Session::new(MemoryTokenStore::new()))
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "mgr@corp.io".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_stores_token_and_parses_role() {
        let api = anonymous(vec![RawResponse::json(
            200,
            &json!({ "token": "jwt", "role": "ROLE_MANAGER", "name": "Meera", "id": 2 }),
        )]);

        let user = login(&api, &credentials()).await.unwrap();

        assert_eq!(user.role, Role::Manager);
        assert_eq!(api.session().bearer().as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_cookie_login_without_token() {
        let api = anonymous(vec![RawResponse::json(200, &json!({ "role": "EMPLOYEE" }))]);

        let user = login(&api, &credentials()).await.unwrap();

        assert_eq!(user.role, Role::Employee);
        assert!(!api.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_bad_credentials_are_reported() {
        let api = anonymous(vec![RawResponse::new(401, "Bad credentials")]);

        let err = login(&api, &credentials()).await.unwrap_err();

        assert_eq!(err, ApiError::Authentication);
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let api = ApiClient::new(
            ScriptedBackend::new(vec![RawResponse::new(500, "")]),
            Session::new(MemoryTokenStore::with_token("jwt")),
        );

        logout(&api).await;

        assert!(!api.session().is_authenticated());
    }
}
