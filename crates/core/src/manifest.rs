//! Project manifest analysis
//!
//! Reads a Cargo manifest and flattens its dependency tables into named
//! configurations. Configurations are the unit the SBOM generator includes
//! or skips: `dependencies`, `dev-dependencies`, `build-dependencies`, and
//! the per-target variants spelled `target.<spec>.<table>`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{CoreError, Result};

/// Manifest file name.
pub const MANIFEST_FILENAME: &str = "Cargo.toml";

/// Package identity carried into the SBOM root component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMeta {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    /// SPDX license expression as declared, if any
    pub license: Option<String>,
}

/// A dependency as declared in the manifest, before lock resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    /// Package name in the registry (the `package` key for renamed deps)
    pub name: String,
    /// Version requirement string; `"*"` when the declaration carries none
    pub req: String,
    pub optional: bool,
}

/// A named set of declared dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub name: String,
    pub dependencies: Vec<DeclaredDependency>,
}

/// A parsed project manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub package: PackageMeta,
    pub configurations: Vec<Configuration>,
}

impl Manifest {
    /// Load a manifest from the given path
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CoreError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse manifest content; `path` is used in error messages only
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content).map_err(|source| CoreError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut configurations = Vec::new();
        push_configuration(&mut configurations, "dependencies", &raw.dependencies);
        push_configuration(&mut configurations, "dev-dependencies", &raw.dev_dependencies);
        push_configuration(&mut configurations, "build-dependencies", &raw.build_dependencies);

        for (spec, tables) in &raw.target {
            push_configuration(
                &mut configurations,
                &format!("target.{spec}.dependencies"),
                &tables.dependencies,
            );
            push_configuration(
                &mut configurations,
                &format!("target.{spec}.dev-dependencies"),
                &tables.dev_dependencies,
            );
            push_configuration(
                &mut configurations,
                &format!("target.{spec}.build-dependencies"),
                &tables.build_dependencies,
            );
        }

        debug!(
            "parsed manifest for '{}': {} configuration(s)",
            raw.package.name,
            configurations.len()
        );

        Ok(Self {
            package: PackageMeta {
                name: raw.package.name,
                version: raw.package.version,
                description: raw.package.description,
                license: raw.package.license,
            },
            configurations,
        })
    }

    /// Look up a configuration by name
    pub fn configuration(&self, name: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.name == name)
    }
}

fn push_configuration(
    configurations: &mut Vec<Configuration>,
    name: &str,
    table: &BTreeMap<String, RawDependency>,
) {
    if table.is_empty() {
        return;
    }

    let dependencies = table
        .iter()
        .map(|(alias, dep)| DeclaredDependency {
            name: dep.package_name().unwrap_or(alias).to_string(),
            req: dep.version_req().unwrap_or("*").to_string(),
            optional: dep.is_optional(),
        })
        .collect();

    configurations.push(Configuration {
        name: name.to_string(),
        dependencies,
    });
}

fn default_version() -> String {
    "0.0.0".to_string()
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    package: RawPackage,
    #[serde(default)]
    dependencies: BTreeMap<String, RawDependency>,
    #[serde(default, rename = "dev-dependencies")]
    dev_dependencies: BTreeMap<String, RawDependency>,
    #[serde(default, rename = "build-dependencies")]
    build_dependencies: BTreeMap<String, RawDependency>,
    #[serde(default)]
    target: BTreeMap<String, RawTarget>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    license: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    #[serde(default)]
    dependencies: BTreeMap<String, RawDependency>,
    #[serde(default, rename = "dev-dependencies")]
    dev_dependencies: BTreeMap<String, RawDependency>,
    #[serde(default, rename = "build-dependencies")]
    build_dependencies: BTreeMap<String, RawDependency>,
}

/// A dependency declaration: either a bare version string or a table
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDependency {
    Version(String),
    Detailed {
        #[serde(default)]
        version: Option<String>,
        /// Registry package name when the dependency is renamed
        #[serde(default)]
        package: Option<String>,
        #[serde(default)]
        optional: bool,
    },
}

impl RawDependency {
    fn package_name(&self) -> Option<&str> {
        match self {
            RawDependency::Version(_) => None,
            RawDependency::Detailed { package, .. } => package.as_deref(),
        }
    }

    fn version_req(&self) -> Option<&str> {
        match self {
            RawDependency::Version(req) => Some(req),
            RawDependency::Detailed { version, .. } => version.as_deref(),
        }
    }

    fn is_optional(&self) -> bool {
        match self {
            RawDependency::Version(_) => false,
            RawDependency::Detailed { optional, .. } => *optional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[package]
name = "sample-app"
version = "1.0.0"
description = "A sample application"
license = "MIT"

[dependencies]
serde = { version = "1.0", features = ["derive"] }
local-helper = { path = "../helper" }

[dev-dependencies]
tempfile = "3.10"

[target.'cfg(target_os = "android")'.dependencies]
jni = "0.21"
"#;

    #[test]
    fn test_parse_package_meta() {
        let manifest = Manifest::parse(SAMPLE, Path::new(MANIFEST_FILENAME)).unwrap();

        assert_eq!(manifest.package.name, "sample-app");
        assert_eq!(manifest.package.version, "1.0.0");
        assert_eq!(manifest.package.license.as_deref(), Some("MIT"));
    }

    #[test]
    fn test_parse_configurations() {
        let manifest = Manifest::parse(SAMPLE, Path::new(MANIFEST_FILENAME)).unwrap();

        let names: Vec<&str> = manifest.configurations.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "dependencies",
                "dev-dependencies",
                r#"target.cfg(target_os = "android").dependencies"#,
            ]
        );

        let main = manifest.configuration("dependencies").unwrap();
        assert_eq!(main.dependencies.len(), 2);
        assert_eq!(main.dependencies[0].name, "local-helper");
        assert_eq!(main.dependencies[0].req, "*");
        assert_eq!(main.dependencies[1].name, "serde");
        assert_eq!(main.dependencies[1].req, "1.0");
    }

    #[test]
    fn test_renamed_dependency_uses_package_name() {
        let content = r#"
[package]
name = "sample"
version = "0.1.0"

[dependencies]
alias = { package = "real-name", version = "2.0", optional = true }
"#;
        let manifest = Manifest::parse(content, Path::new(MANIFEST_FILENAME)).unwrap();
        let dep = &manifest.configuration("dependencies").unwrap().dependencies[0];

        assert_eq!(dep.name, "real-name");
        assert_eq!(dep.req, "2.0");
        assert!(dep.optional);
    }

    #[test]
    fn test_empty_tables_produce_no_configuration() {
        let content = r#"
[package]
name = "sample"
version = "0.1.0"

[dependencies]
"#;
        let manifest = Manifest::parse(content, Path::new(MANIFEST_FILENAME)).unwrap();
        assert!(manifest.configurations.is_empty());
    }

    #[test]
    fn test_load_missing_manifest_fails() {
        let err = Manifest::load(Path::new("/nonexistent/Cargo.toml")).unwrap_err();
        assert!(matches!(err, CoreError::ManifestRead { .. }));
    }
}
