use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Failed to encode or decode stored entry: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Failed to open state store at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: sled::Error,
    },
}
