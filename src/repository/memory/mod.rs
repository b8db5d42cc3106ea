use tokio::sync::RwLock;

use crate::{
    domain::credentials::CredentialPair, repository::errors::RepositoryError,
    usecase::contracts::CredentialStore,
};

/// Credentials kept for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryCredentialStore {
    pair: RwLock<Option<CredentialPair>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(pair: CredentialPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<CredentialPair>, RepositoryError> {
        Ok(self.pair.read().await.clone())
    }

    async fn save(&self, pair: &CredentialPair) -> Result<(), RepositoryError> {
        *self.pair.write().await = Some(pair.clone());
        Ok(())
    }

    async fn save_access_token(&self, access_token: &str) -> Result<bool, RepositoryError> {
        let mut guard = self.pair.write().await;
        match guard.take() {
            Some(pair) => {
                *guard = Some(pair.with_access_token(access_token.to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        *self.pair.write().await = None;
        Ok(())
    }
}
