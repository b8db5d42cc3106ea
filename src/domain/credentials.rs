use std::fmt;

use serde::{Deserialize, Serialize};

/// Access/refresh token pair as persisted between runs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl CredentialPair {
    pub fn new(access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }

    /// Replaces the access token, keeping the refresh token.
    pub fn with_access_token(self, access_token: String) -> Self {
        Self {
            access_token,
            ..self
        }
    }
}

// Tokens never reach the logs.
impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_access_token_keeps_refresh_token() {
        let pair = CredentialPair::new("old".to_string(), Some("refresh".to_string()));

        let updated = pair.with_access_token("new".to_string());

        assert_eq!(updated.access_token, "new");
        assert_eq!(updated.refresh_token.as_deref(), Some("refresh"));
    }

    #[test]
    fn test_debug_output_redacts_tokens() {
        let pair = CredentialPair::new("secret-access".to_string(), Some("secret-refresh".to_string()));

        let output = format!("{:?}", pair);

        assert!(!output.contains("secret-access"));
        assert!(!output.contains("secret-refresh"));
    }

    #[test]
    fn test_missing_refresh_token_is_not_serialized() {
        let pair = CredentialPair::new("access".to_string(), None);

        let json = serde_json::to_string(&pair).unwrap();

        assert_eq!(json, r#"{"access_token":"access"}"#);
    }
}
