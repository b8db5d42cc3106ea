use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::request::ApiRequest;
use crate::domain::user::UserProfile;
use crate::usecase::error::ApiError;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const ME_PATH: &str = "/auth/me";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const CHANGE_PASSWORD_PATH: &str = "/auth/change-password";

#[derive(Debug, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    /// The server matches e-mails trimmed and lower-cased.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

#[derive(Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct UserEnvelope {
    pub user: UserProfile,
}

#[derive(Debug, Serialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Credential exchange: a 401 here means wrong e-mail or password, so it never
/// goes through token refresh.
pub fn login(request: &LoginRequest) -> Result<ApiRequest, ApiError> {
    request.validate()?;
    Ok(ApiRequest::post(LOGIN_PATH).with_json(request)?.without_refresh())
}

pub fn me() -> ApiRequest {
    ApiRequest::get(ME_PATH)
}

pub fn logout() -> ApiRequest {
    ApiRequest::post(LOGOUT_PATH)
}

pub fn change_password(request: &ChangePasswordRequest) -> Result<ApiRequest, ApiError> {
    request.validate()?;
    Ok(ApiRequest::post(CHANGE_PASSWORD_PATH).with_json(request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::RefreshPolicy;

    #[test]
    fn test_login_request_normalizes_email() {
        let request = LoginRequest::new("  Avukat@LawDesk.TEST ", "secret");

        assert_eq!(request.email, "avukat@lawdesk.test");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_login_request_rejects_bad_email() {
        let result = login(&LoginRequest::new("not-an-email", "secret"));

        assert!(matches!(result, Err(ApiError::Validation(m)) if m.contains("e-mail")));
    }

    #[test]
    fn test_login_request_rejects_empty_password() {
        let result = login(&LoginRequest::new("a@lawdesk.test", ""));

        assert!(matches!(result, Err(ApiError::Validation(m)) if m == "Password is required"));
    }

    #[test]
    fn test_login_skips_refresh() {
        let request = login(&LoginRequest::new("a@lawdesk.test", "secret")).unwrap();

        assert_eq!(request.path(), LOGIN_PATH);
        assert_eq!(request.refresh_policy(), RefreshPolicy::Skip);
        assert_eq!(request.body().unwrap()["email"], "a@lawdesk.test");
    }

    #[test]
    fn test_change_password_validation() {
        let short = ChangePasswordRequest {
            current_password: "old-secret".to_string(),
            new_password: "abc".to_string(),
        };
        assert!(change_password(&short).is_err());

        let missing_current = ChangePasswordRequest {
            current_password: String::new(),
            new_password: "new-secret".to_string(),
        };
        assert!(change_password(&missing_current).is_err());

        let valid = ChangePasswordRequest {
            current_password: "old-secret".to_string(),
            new_password: "new-secret".to_string(),
        };
        let request = change_password(&valid).unwrap();
        assert_eq!(request.body().unwrap()["current_password"], "old-secret");
        assert_eq!(request.refresh_policy(), RefreshPolicy::Refresh);
    }

    #[test]
    fn test_login_response_deserialization() {
        let json = r#"{
            "message": "ok",
            "access_token": "a",
            "refresh_token": "r",
            "user": {"id": 1, "email": "a@b.c", "name": "A", "surname": "B", "role": "admin", "is_active": true}
        }"#;

        let response: LoginResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.access_token, "a");
        assert_eq!(response.refresh_token, "r");
        assert!(response.user.is_admin());
    }
}
