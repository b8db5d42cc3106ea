use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::delivery::http::v1::auth::{self, ChangePasswordRequest, LoginRequest, LoginResponse, UserEnvelope};
use crate::delivery::http::v1::users::{self, ProfileUpdate};
use crate::domain::credentials::CredentialPair;
use crate::domain::session::{Session, SessionPhase};
use crate::domain::user::UserProfile;
use crate::usecase::contracts::{CredentialStore, LoginRedirect};
use crate::usecase::error::{ApiError, SessionError};
use crate::usecase::pipeline::ApiClient;

pub const LOGIN_FAILED: &str = "Login failed";
pub const PASSWORD_CHANGE_FAILED: &str = "Password could not be changed";
pub const PROFILE_UPDATE_FAILED: &str = "Profile could not be updated";
pub const IDENTITY_CHECK_FAILED: &str = "Session could not be verified";

/// Wraps the application's redirect so that an irrecoverable authorization
/// failure in the pipeline also resets the session.
pub struct SessionRevoker<R> {
    state: Arc<watch::Sender<Session>>,
    redirect: R,
}

impl<R: LoginRedirect> LoginRedirect for SessionRevoker<R> {
    fn redirect_to_login(&self) {
        self.state.send_replace(Session::anonymous());
        self.redirect.redirect_to_login();
    }
}

/// Single source of truth for who is signed in.
pub struct SessionStore<S, R>
where
    S: CredentialStore,
    R: LoginRedirect,
{
    client: ApiClient<S, SessionRevoker<R>>,
    credentials: Arc<S>,
    state: Arc<watch::Sender<Session>>,
}

impl<S, R> SessionStore<S, R>
where
    S: CredentialStore,
    R: LoginRedirect,
{
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        credentials: S,
        redirect: R,
    ) -> Result<Self, ApiError> {
        let credentials = Arc::new(credentials);
        let state = Arc::new(watch::Sender::new(Session::loading()));
        let revoker = SessionRevoker {
            state: state.clone(),
            redirect,
        };
        let client = ApiClient::new(base_url, timeout, credentials.clone(), revoker)?;

        Ok(Self {
            client,
            credentials,
            state,
        })
    }

    /// Pipeline for other consumers of the API.
    pub fn client(&self) -> &ApiClient<S, SessionRevoker<R>> {
        &self.client
    }

    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    fn current_user_id(&self) -> Option<i64> {
        self.state.borrow().user.as_ref().map(|u| u.id)
    }

    /// Resolves the startup loading state. Only checks identity with the
    /// server when a token was persisted.
    #[tracing::instrument(skip(self))]
    pub async fn initialize(&self) -> SessionPhase {
        self.state.send_modify(|s| s.loading = true);

        let stored = match self.credentials.load().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "stored credentials unreadable, starting anonymous");
                self.discard_credentials().await;
                None
            }
        };

        if stored.is_none() {
            tracing::debug!("no stored credentials");
            self.state.send_replace(Session::anonymous());
            return SessionPhase::Anonymous;
        }

        match self.identity_check().await {
            Ok(user) => {
                tracing::info!(user_id = user.id, role = %user.role, "session restored");
                SessionPhase::Authenticated
            }
            Err(e) => {
                tracing::warn!(error = %e, "identity check failed, starting anonymous");
                SessionPhase::Anonymous
            }
        }
    }

    /// Re-reads the signed-in user from the server.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_user(&self) -> Result<UserProfile, SessionError> {
        if self.current_user_id().is_none() {
            return Err(SessionError::new(
                ApiError::Validation("No user is signed in".to_string()),
                IDENTITY_CHECK_FAILED,
            ));
        }

        self.identity_check().await.map_err(|e| {
            tracing::warn!(error = %e, "identity check failed");
            SessionError::new(e, IDENTITY_CHECK_FAILED)
        })
    }

    async fn identity_check(&self) -> Result<UserProfile, ApiError> {
        match self.client.send_json::<UserEnvelope>(&auth::me()).await {
            Ok(envelope) => {
                self.state.send_replace(Session::authenticated(envelope.user.clone()));
                Ok(envelope.user)
            }
            Err(e) => {
                self.discard_credentials().await;
                self.state.send_replace(Session::anonymous());
                Err(e)
            }
        }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        self.state.send_modify(|s| s.error = None);

        match self.exchange_credentials(email, password).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, role = %user.role, "logged in");
                Ok(user)
            }
            Err(e) => {
                let error = SessionError::new(e, LOGIN_FAILED);
                tracing::warn!(error = %error.source, "login failed");
                let message = error.message.clone();
                self.state.send_modify(|s| s.error = Some(message));
                Err(error)
            }
        }
    }

    async fn exchange_credentials(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let request = auth::login(&LoginRequest::new(email, password))?;
        let response: LoginResponse = self.client.send_json(&request).await?;

        let pair = CredentialPair::new(response.access_token, Some(response.refresh_token));
        self.credentials.save(&pair).await?;
        self.state.send_replace(Session::authenticated(response.user.clone()));

        Ok(response.user)
    }

    /// Ends the session locally whatever the server says.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) {
        match self.client.send(&auth::logout()).await {
            Ok(response) if response.is_success() => tracing::debug!("server session closed"),
            Ok(response) => {
                tracing::warn!(status = %response.status(), "logout rejected by server, continuing")
            }
            Err(e) => tracing::warn!(error = %e, "logout request failed, continuing"),
        }

        self.discard_credentials().await;
        self.state.send_replace(Session::anonymous());
        tracing::info!("logged out");
    }

    #[tracing::instrument(skip_all)]
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<(), SessionError> {
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };

        self.submit_password_change(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "password change failed");
            SessionError::new(e, PASSWORD_CHANGE_FAILED)
        })?;

        tracing::info!("password changed");
        Ok(())
    }

    async fn submit_password_change(&self, request: &ChangePasswordRequest) -> Result<(), ApiError> {
        let request = auth::change_password(request)?;
        self.client.send(&request).await?.error_for_status()?;
        Ok(())
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update_profile(&self, patch: &ProfileUpdate) -> Result<UserProfile, SessionError> {
        let Some(user_id) = self.current_user_id() else {
            return Err(SessionError::new(
                ApiError::Validation("No user is signed in".to_string()),
                PROFILE_UPDATE_FAILED,
            ));
        };

        let updated = self.submit_profile_update(user_id, patch).await.map_err(|e| {
            tracing::warn!(user_id, error = %e, "profile update failed");
            SessionError::new(e, PROFILE_UPDATE_FAILED)
        })?;

        // A revocation while the request was in flight wins over the update.
        self.state.send_if_modified(|s| match &s.user {
            Some(current) if current.id == updated.id => {
                s.user = Some(updated.clone());
                true
            }
            _ => false,
        });

        tracing::info!(user_id, "profile updated");
        Ok(updated)
    }

    async fn submit_profile_update(&self, user_id: i64, patch: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let request = users::update(user_id, patch)?;
        let envelope: UserEnvelope = self.client.send_json(&request).await?;
        Ok(envelope.user)
    }

    async fn discard_credentials(&self) {
        if let Err(e) = self.credentials.clear().await {
            tracing::error!(error = %e, "failed to clear stored credentials");
        }
    }
}
