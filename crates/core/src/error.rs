//! Error types for depgraph-core

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::lock::MAX_LOCK_VERSION;

/// Errors that can occur in core operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read manifest '{path}': {source}")]
    ManifestRead { path: PathBuf, source: io::Error },

    #[error("failed to parse manifest '{path}': {source}")]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to read lock file: {0}")]
    LockRead(#[source] io::Error),

    #[error("failed to parse lock file: {0}")]
    LockParse(#[source] toml::de::Error),

    #[error("unsupported lock file version {0}, expected {MAX_LOCK_VERSION} or lower")]
    UnsupportedLockVersion(u32),

    #[error("failed to parse settings '{path}': {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to read settings '{path}': {source}")]
    SettingsRead { path: PathBuf, source: io::Error },

    #[error("failed to serialize SBOM: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report '{path}': {source}")]
    ReportWrite { path: PathBuf, source: io::Error },
}
