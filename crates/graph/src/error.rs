use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Entity already exists: {0}")]
    DuplicateEntity(String),

    #[error("Unsupported snapshot version {version} in {path}")]
    SnapshotVersion { path: PathBuf, version: u32 },

    #[error("Snapshot I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
