use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The requested source key is unset or empty.
    #[error("{key} not found in environment")]
    MissingSource { key: String },

    /// The blob stored under `key` assigns a name or value that the
    /// environment cannot hold.
    #[error("blob in {key} assigns {name:?} a value containing a NUL byte")]
    InvalidAssignment { key: String, name: String },

    #[error("failed to load env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("no env files found at {}", .path.display())]
    EnvFileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
