use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::{
    domain::credentials::CredentialPair, repository::errors::RepositoryError,
    usecase::contracts::CredentialStore,
};

/// Credentials persisted as a small JSON document so they survive restarts.
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Option<CredentialPair>, RepositoryError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepositoryError::StorageError(e.to_string())),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| RepositoryError::Corrupt(e.to_string()))
    }

    async fn write(&self, pair: &CredentialPair) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::StorageError(e.to_string()))?;
        }

        let json = serde_json::to_vec_pretty(pair)
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?;

        // Write a sibling temp file, then rename over the target.
        let tmp = self.path.with_extension("tmp");
        match tokio::fs::remove_file(&tmp).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(RepositoryError::StorageError(e.to_string())),
        }

        let mut file = private_file_options()
            .open(&tmp)
            .await
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?;
        file.write_all(&json)
            .await
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RepositoryError::StorageError(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), "credentials written");
        Ok(())
    }
}

/// New file only, readable by the owner from the moment it exists.
fn private_file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options
}

impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<CredentialPair>, RepositoryError> {
        self.read().await
    }

    async fn save(&self, pair: &CredentialPair) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.write(pair).await
    }

    async fn save_access_token(&self, access_token: &str) -> Result<bool, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let Some(pair) = self.read().await? else {
            return Ok(false);
        };
        self.write(&pair.with_access_token(access_token.to_string())).await?;
        Ok(true)
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "credentials removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::StorageError(e.to_string())),
        }
    }
}
