//! SBOM generation settings
//!
//! Settings live in an optional `sbom.toml` next to the project manifest.
//! Every field has a default, so projects without a settings file still get
//! a full report: all non test/debug configurations, serial number on,
//! reports under `target/sbom/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

/// Settings file name.
pub const SETTINGS_FILENAME: &str = "sbom.toml";

/// Settings controlling SBOM generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root component name; defaults to the manifest package name.
    pub component_name: Option<String>,

    /// Root component group (e.g. an organization identifier).
    pub component_group: Option<String>,

    /// Root component version; defaults to the manifest package version.
    pub component_version: Option<String>,

    /// Exact configuration names to include. Empty means all.
    pub include_configs: Vec<String>,

    /// Case-insensitive substring patterns; configurations whose name
    /// contains one are excluded. Applied after `include_configs`.
    pub skip_configs: Vec<String>,

    /// Emit a `urn:uuid` serial number in the document.
    pub include_serial_number: bool,

    /// Directory for the default report paths.
    pub output_dir: PathBuf,

    /// Explicit JSON report path, overriding `output_dir`.
    pub json_output: Option<PathBuf>,

    /// Explicit XML report path, overriding `output_dir`.
    pub xml_output: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            component_name: None,
            component_group: None,
            component_version: None,
            include_configs: Vec::new(),
            skip_configs: vec!["test".to_string(), "debug".to_string(), "dev".to_string()],
            include_serial_number: true,
            output_dir: PathBuf::from("target/sbom"),
            json_output: None,
            xml_output: None,
        }
    }
}

impl Settings {
    /// Load settings from the given path.
    ///
    /// Returns `Ok(None)` if the file doesn't exist; callers fall back to
    /// [`Settings::default`].
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CoreError::SettingsRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let settings = toml::from_str(&content).map_err(|source| CoreError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(settings))
    }

    /// Whether a configuration passes both the include list and the skip
    /// patterns.
    pub fn admits(&self, configuration: &str) -> bool {
        if !self.include_configs.is_empty()
            && !self.include_configs.iter().any(|c| c == configuration)
        {
            return false;
        }

        let lower = configuration.to_lowercase();
        !self
            .skip_configs
            .iter()
            .any(|pattern| lower.contains(&pattern.to_lowercase()))
    }

    /// Path of the JSON report.
    pub fn json_path(&self) -> PathBuf {
        self.json_output
            .clone()
            .unwrap_or_else(|| self.output_dir.join("bom.json"))
    }

    /// Path of the XML report.
    pub fn xml_path(&self) -> PathBuf {
        self.xml_output
            .clone()
            .unwrap_or_else(|| self.output_dir.join("bom.xml"))
    }
}
