//! Error types for the list view core
//!
//! Every failure ends the triggering operation and lands in the view's single
//! error slot, so `Display` is the user-facing message.

use serde::Deserialize;
use thiserror::Error;

/// Fallback when the backend gives no usable detail.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Fallback referential message for resources without a specific one.
pub const GENERIC_REFERENTIAL: &str =
    "Cannot delete this record because other records still reference it";

/// Substrings the backend uses when a delete trips a foreign key.
const REFERENTIAL_MARKERS: &[&str] = &[
    "violates foreign key constraint",
    "foreign key constraint fails",
    "DataIntegrityViolationException",
    "ConstraintViolationException",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Client-side pre-flight check failed; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// 401: the credential is gone or expired.
    #[error("Your session has expired. Please log in again.")]
    Authentication,

    /// 403: valid credential, insufficient privilege.
    #[error("{0}")]
    Authorization(String),

    /// Foreign key violation translated into a domain message.
    #[error("{0}")]
    Referential(String),

    /// Any other non-2xx status.
    #[error("{detail}")]
    Server { status: u16, detail: String },

    /// Transport failure before a status was received.
    #[error("Network error: {0}")]
    Network(String),

    /// Response arrived but did not have the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Map a non-2xx status and its body onto the error taxonomy.
    ///
    /// `referential` is the resource's wording for a delete that trips a
    /// foreign key; only deletes pass it; every other request keeps the
    /// backend's own detail.
    pub fn from_status(status: u16, body: &str, referential: Option<&str>) -> Self {
        match (status, referential) {
            (401, _) => ApiError::Authentication,
            (403, _) => ApiError::Authorization(
                extract_detail(body)
                    .unwrap_or_else(|| "You do not have permission to perform this action".to_string()),
            ),
            (_, Some(message)) if is_referential(body) => ApiError::Referential(message.to_string()),
            _ => ApiError::Server {
                status,
                detail: extract_detail(body).unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
        }
    }

    /// True when the caller must send the user back to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Authentication)
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Backend detail text: `{message}` / `{error}` JSON, else the plain body.
pub fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(trimmed) {
        if let Some(msg) = parsed.message.or(parsed.error).filter(|m| !m.trim().is_empty()) {
            return Some(msg);
        }
    }
    if trimmed.starts_with('{') {
        // JSON without a usable message field is noise to a user
        return None;
    }
    Some(trimmed.to_string())
}

fn is_referential(body: &str) -> bool {
    REFERENTIAL_MARKERS.iter().any(|marker| body.contains(marker))
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_authentication() {
        let err = ApiError::from_status(401, "whatever", None);
        assert_eq!(err, ApiError::Authentication);
        assert!(err.requires_login());
    }

    #[test]
    fn test_forbidden_keeps_backend_message() {
        let err = ApiError::from_status(403, r#"{"message":"Managers only"}"#, None);
        assert_eq!(err, ApiError::Authorization("Managers only".to_string()));
        assert!(!err.requires_login());
    }

    #[test]
    fn test_forbidden_without_body_has_default_text() {
        let err = ApiError::from_status(403, "", None);
        assert!(err.user_message().contains("permission"));
    }

    #[test]
    fn test_foreign_key_body_is_translated() {
        let body = "ERROR: update or delete on table \"leads\" violates foreign key constraint \"fk_task_lead\"";
        let err = ApiError::from_status(500, body, Some("Cannot delete lead because it has associated tasks"));
        assert_eq!(
            err.user_message(),
            "Cannot delete lead because it has associated tasks"
        );
    }

    #[test]
    fn test_foreign_key_body_without_delete_wording_keeps_detail() {
        let body = "insert or update on table \"lead\" violates foreign key constraint \"fk_assignee\"";
        let err = ApiError::from_status(500, body, None);
        assert_eq!(err, ApiError::Server { status: 500, detail: body.to_string() });
    }

    #[test]
    fn test_plain_text_body_is_surfaced_verbatim() {
        let err = ApiError::from_status(400, "Email already exists", None);
        assert_eq!(
            err,
            ApiError::Server { status: 400, detail: "Email already exists".to_string() }
        );
    }

    #[test]
    fn test_empty_body_falls_back_to_generic() {
        let err = ApiError::from_status(502, "  ", None);
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_extract_detail_prefers_message_then_error() {
        assert_eq!(extract_detail(r#"{"error":"bad"}"#), Some("bad".to_string()));
        assert_eq!(
            extract_detail(r#"{"message":"first","error":"second"}"#),
            Some("first".to_string())
        );
        assert_eq!(extract_detail(r#"{"status":500}"#), None);
    }
}
