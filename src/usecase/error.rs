use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally; the request was never sent.
    #[error("{0}")]
    Validation(String),

    #[error("unauthorized: {}", .message.as_deref().unwrap_or("credentials rejected"))]
    Unauthorized { message: Option<String> },

    #[error("request failed with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pulls the `message` field out of a JSON error body.
pub fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

impl ApiError {
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = server_message(body);
        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Status { status, message }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Message to show the user: the server's own message when it sent one,
    /// the local validation message, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Validation(message)
            | ApiError::Unauthorized {
                message: Some(message),
            }
            | ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Serialization(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Serialization(e.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        ApiError::Validation(message)
    }
}

/// Failure of a session operation, carrying the message to display.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SessionError {
    pub message: String,
    #[source]
    pub source: ApiError,
}

impl SessionError {
    pub fn new(source: ApiError, fallback: &str) -> Self {
        Self {
            message: source.user_message(fallback),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(r#"{"message": "Invalid e-mail or password"}"#).as_deref(),
            Some("Invalid e-mail or password")
        );
        assert_eq!(server_message(r#"{"message": "   "}"#), None);
        assert_eq!(server_message(r#"{"error": "nope"}"#), None);
        assert_eq!(server_message("<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn test_from_response_classifies_401() {
        let error = ApiError::from_response(StatusCode::UNAUTHORIZED, r#"{"message": "Token expired"}"#);

        assert!(error.is_unauthorized());
        assert_eq!(error.user_message("fallback"), "Token expired");
    }

    #[test]
    fn test_user_message_falls_back() {
        let error = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(error.user_message("Request failed"), "Request failed");

        let error = ApiError::Network("connection refused".to_string());
        assert_eq!(error.user_message("Request failed"), "Request failed");
    }

    #[test]
    fn test_validation_errors_use_field_message() {
        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 6, message = "too short"))]
            secret: String,
        }

        let errors = Form {
            secret: "abc".to_string(),
        }
        .validate()
        .unwrap_err();

        let error = ApiError::from(errors);
        assert!(matches!(&error, ApiError::Validation(m) if m == "too short"));
    }

    #[test]
    fn test_session_error_displays_message() {
        let error = SessionError::new(ApiError::Network("timeout".to_string()), "Login failed");

        assert_eq!(error.to_string(), "Login failed");
        assert!(std::error::Error::source(&error).is_some());
    }
}
