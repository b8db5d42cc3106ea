use serde::Serialize;
use validator::Validate;

use crate::domain::request::ApiRequest;
use crate::usecase::error::ApiError;

/// Partial update of a user; only the fields that are set are sent.
#[derive(Debug, Default, Clone, Serialize, Validate)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "Name must be 1 to 50 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "Surname must be 1 to 50 characters"))]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

pub fn user_path(id: i64) -> String {
    format!("/users/{}", id)
}

pub fn update(id: i64, patch: &ProfileUpdate) -> Result<ApiRequest, ApiError> {
    patch.validate()?;
    if patch.is_empty() {
        return Err(ApiError::Validation("Nothing to update".to_string()));
    }
    Ok(ApiRequest::put(user_path(id)).with_json(patch)?)
}
