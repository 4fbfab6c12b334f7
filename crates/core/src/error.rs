#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no patient with id '{0}'")]
    UnknownPatient(String),
    #[error("failed to create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("failed to read from the storage medium: {0}")]
    StorageRead(std::io::Error),
    #[error("failed to write to the storage medium: {0}")]
    StorageWrite(std::io::Error),
    #[error("failed to remove a storage key: {0}")]
    StorageRemove(std::io::Error),
    #[error("failed to serialize a collection: {0}")]
    Serialization(serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
