use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::delivery::http::v1::auth::{REFRESH_PATH, RefreshResponse};
use crate::domain::request::{ApiRequest, Attempt, RefreshPolicy};
use crate::usecase::contracts::{CredentialStore, LoginRedirect};
use crate::usecase::error::ApiError;

/// Status and body of a delivered HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_response(self.status, &self.body))
        }
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let response = self.error_for_status()?;
        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Outcome of handling a 401 on the initial attempt.
enum Recovery {
    RetryWith(String),
    GiveUp,
}

/// Sends API requests with the stored access token and runs the one-shot
/// refresh-and-retry protocol when the server answers 401.
pub struct ApiClient<S, R>
where
    S: CredentialStore,
    R: LoginRedirect,
{
    http: Client,
    base_url: String,
    credentials: Arc<S>,
    redirect: R,
    refresh_gate: Mutex<()>,
}

impl<S, R> ApiClient<S, R>
where
    S: CredentialStore,
    R: LoginRedirect,
{
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        credentials: Arc<S>,
        redirect: R,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build http client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::info!(%base_url, timeout_secs = timeout.as_secs(), "api client created");

        Ok(Self {
            http,
            base_url,
            credentials,
            redirect,
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<S> {
        &self.credentials
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends `request`. Any delivered response is returned, including a final
    /// 401; network failures and a failed refresh are errors.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut token = self.access_token().await?;
        let mut attempt = Attempt::Initial;

        loop {
            let response = self.dispatch(request, token.as_deref(), attempt).await?;

            if response.status() != StatusCode::UNAUTHORIZED
                || request.refresh_policy() == RefreshPolicy::Skip
            {
                return Ok(response);
            }

            let Some(next) = attempt.next() else {
                tracing::warn!(path = %request.path(), "request rejected again after token refresh");
                return Ok(response);
            };
            attempt = next;

            let recovery = self.recover(token.as_deref()).await?;
            match recovery {
                Recovery::RetryWith(fresh) => token = Some(fresh),
                Recovery::GiveUp => return Ok(response),
            }
        }
    }

    /// `send` followed by status check and JSON decoding.
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.json()
    }

    async fn access_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.credentials.load().await?.map(|pair| pair.access_token))
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        attempt: Attempt,
    ) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .http
            .request(request.method().clone(), self.url(request.path()));

        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(
            method = %request.method(),
            path = %request.path(),
            ?attempt,
            authenticated = token.is_some(),
            "dispatching request"
        );

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, path = %request.path(), "request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, path = %request.path(), "response received");

        Ok(ApiResponse::new(status, body))
    }

    /// Refreshes the access token after a 401. Only one refresh runs at a time;
    /// requests that waited behind it reuse its result.
    async fn recover(&self, rejected_token: Option<&str>) -> Result<Recovery, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let stored = self.credentials.load().await?;
        match (&stored, rejected_token) {
            (Some(pair), rejected) if Some(pair.access_token.as_str()) != rejected => {
                tracing::debug!("access token already refreshed by a concurrent request");
                return Ok(Recovery::RetryWith(pair.access_token.clone()));
            }
            (None, Some(_)) => {
                tracing::debug!("credentials already revoked by a concurrent request");
                return Ok(Recovery::GiveUp);
            }
            _ => {}
        }

        let Some(refresh_token) = stored.and_then(|pair| pair.refresh_token) else {
            tracing::warn!("no refresh token available, ending session");
            self.revoke().await;
            return Ok(Recovery::GiveUp);
        };

        match self.refresh_access_token(&refresh_token).await {
            Ok(access_token) => match self.credentials.save_access_token(&access_token).await {
                Ok(true) => {
                    tracing::info!("access token refreshed");
                    Ok(Recovery::RetryWith(access_token))
                }
                Ok(false) => {
                    // Logged out while the refresh was in flight.
                    tracing::info!("credentials cleared during refresh, discarding new access token");
                    Ok(Recovery::GiveUp)
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to persist refreshed access token");
                    self.revoke().await;
                    Err(e.into())
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, ending session");
                self.revoke().await;
                Err(e)
            }
        }
    }

    /// Authenticated with the refresh token, never through `send`.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.url(REFRESH_PATH))
            .bearer_auth(refresh_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let refreshed: RefreshResponse = ApiResponse::new(status, body).json()?;

        if refreshed.access_token.is_empty() {
            return Err(ApiError::Serialization(
                "refresh response carried an empty access token".to_string(),
            ));
        }
        Ok(refreshed.access_token)
    }

    async fn revoke(&self) {
        if let Err(e) = self.credentials.clear().await {
            tracing::error!(error = %e, "failed to clear stored credentials");
        }
        self.redirect.redirect_to_login();
    }
}
