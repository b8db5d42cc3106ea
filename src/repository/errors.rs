use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Corrupt credential data: {0}")]
    Corrupt(String),
}
