//! Lock file analysis
//!
//! The lock file (`Cargo.lock`) is the source of truth for resolved
//! dependency versions: the SBOM enumerates what the lock pinned, it never
//! re-resolves. Checksums recorded in the lock are carried into the SBOM
//! verbatim.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{CoreError, Result};

/// Lock file name.
pub const LOCK_FILENAME: &str = "Cargo.lock";

/// Highest supported lock file format version.
pub const MAX_LOCK_VERSION: u32 = 4;

/// A parsed lock file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockFile {
    /// Lock file format version; older lock files omit the key.
    #[serde(default = "default_lock_version")]
    pub version: u32,

    /// Locked packages, in lock file order.
    #[serde(default, rename = "package")]
    pub packages: Vec<LockedPackage>,
}

/// A locked package entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,

    /// Registry or git source; absent for workspace and path packages.
    #[serde(default)]
    pub source: Option<String>,

    /// SHA-256 checksum of the package archive, when the source records one.
    #[serde(default)]
    pub checksum: Option<String>,

    /// Dependency entries, each `name` or `name version` (and optionally a
    /// source in parentheses) per the lock format.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_lock_version() -> u32 {
    3
}

impl LockFile {
    /// Load a lock file from the given path.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    /// Returns `Ok(Some(lock))` if the file exists and was parsed successfully.
    /// Returns `Err` if the file exists but couldn't be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::LockRead(e)),
        };

        let lock: LockFile = toml::from_str(&content).map_err(CoreError::LockParse)?;

        if lock.version > MAX_LOCK_VERSION {
            return Err(CoreError::UnsupportedLockVersion(lock.version));
        }

        debug!("loaded lock file: {} package(s)", lock.packages.len());

        Ok(Some(lock))
    }

    /// All locked packages with the given name.
    ///
    /// More than one entry means multiple major versions are locked.
    pub fn candidates<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a LockedPackage> {
        self.packages.iter().filter(move |p| p.name == name)
    }

    /// The single locked package with the given name, if unambiguous.
    pub fn find(&self, name: &str) -> Option<&LockedPackage> {
        let mut it = self.candidates(name);
        let first = it.next()?;
        if it.next().is_some() { None } else { Some(first) }
    }
}

impl LockedPackage {
    /// Unique key within a lock file.
    pub fn key(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Whether this package came from a registry or git source.
    ///
    /// Workspace members and path dependencies carry no source.
    pub fn is_registry(&self) -> bool {
        self.source.is_some()
    }
}
