use std::sync::Arc;

use crate::{domain::credentials::CredentialPair, repository::errors::RepositoryError};

/// Durable home of the access/refresh token pair.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<Option<CredentialPair>, RepositoryError>;
    async fn save(&self, pair: &CredentialPair) -> Result<(), RepositoryError>;
    /// Stores a refreshed access token next to the existing refresh token.
    /// Returns `false` without storing anything when no pair is present.
    async fn save_access_token(&self, access_token: &str) -> Result<bool, RepositoryError>;
    async fn clear(&self) -> Result<(), RepositoryError>;
}

/// Global "send the user to the login screen" side effect.
#[cfg_attr(test, mockall::automock)]
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self);
}

impl<T: LoginRedirect + ?Sized> LoginRedirect for Arc<T> {
    fn redirect_to_login(&self) {
        (**self).redirect_to_login()
    }
}
