//! CycloneDX document assembly
//!
//! Builds a CycloneDX 1.5 bill of materials from a manifest, a lock file,
//! and generation settings. Two modes mirror the two report flavors:
//! [`BomMode::Direct`] lists only the resolved direct dependencies of the
//! admitted configurations, [`BomMode::Aggregate`] lists their full
//! transitive closure through the lock graph.
//!
//! License text is never emitted; the root component carries at most the
//! SPDX expression declared in the manifest.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::graph::{DependencyGraph, ResolvedPackage};
use crate::lock::{LockFile, LockedPackage};
use crate::manifest::Manifest;
use crate::settings::Settings;

/// Document format identifier.
pub const BOM_FORMAT: &str = "CycloneDX";

/// CycloneDX schema version the document targets.
pub const SPEC_VERSION: &str = "1.5";

/// Which dependency set a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomMode {
    /// Resolved direct dependencies only.
    Direct,
    /// Transitive closure of the direct dependencies.
    Aggregate,
}

/// A CycloneDX bill of materials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bom {
    pub bom_format: &'static str,
    pub spec_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub version: u32,
    pub metadata: Metadata,
    pub components: Vec<Component>,
    pub dependencies: Vec<Dependency>,
}

/// Document metadata: generation time, generating tool, root component.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub timestamp: String,
    pub tools: Vec<Tool>,
    pub component: Component,
}

/// The tool that produced the document.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub name: String,
    pub version: String,
}

impl Default for Tool {
    fn default() -> Self {
        Self {
            name: "depgraph".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// CycloneDX component classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Application,
    Library,
}

/// A component entry.
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(rename = "bom-ref")]
    pub bom_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub hashes: Vec<Hash>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub licenses: Vec<License>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
}

/// A checksum carried from the lock file.
#[derive(Debug, Clone, Serialize)]
pub struct Hash {
    pub alg: String,
    pub content: String,
}

/// A license reference; expression only, never text.
#[derive(Debug, Clone, Serialize)]
pub struct License {
    pub expression: String,
}

/// An edge set in the document's dependency section.
#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    #[serde(rename = "ref")]
    pub dependency_ref: String,
    #[serde(rename = "dependsOn")]
    pub depends_on: Vec<String>,
}

/// Package URL for a cargo package.
fn purl(name: &str, version: &str) -> String {
    format!("pkg:cargo/{name}@{version}")
}

impl Component {
    fn from_locked(package: &LockedPackage) -> Self {
        let reference = purl(&package.name, &package.version);
        Self {
            component_type: ComponentType::Library,
            bom_ref: reference.clone(),
            group: None,
            name: package.name.clone(),
            version: package.version.clone(),
            description: None,
            hashes: package
                .checksum
                .iter()
                .map(|checksum| Hash {
                    alg: "SHA-256".to_string(),
                    content: checksum.clone(),
                })
                .collect(),
            licenses: Vec::new(),
            purl: Some(reference),
        }
    }
}

/// Assemble a bill of materials.
pub fn assemble(settings: &Settings, manifest: &Manifest, lock: &LockFile, mode: BomMode) -> Bom {
    let graph = DependencyGraph::build(lock);
    let direct = graph.resolve_direct(manifest, settings);
    let direct_keys: Vec<String> = direct.iter().map(|r| r.package.key()).collect();

    let included: Vec<&LockedPackage> = match mode {
        BomMode::Direct => direct.iter().map(|r| &r.package).collect(),
        BomMode::Aggregate => graph
            .closure(direct_keys.iter().cloned())
            .iter()
            .filter_map(|key| graph.get(key))
            .collect(),
    };

    let root = root_component(settings, manifest, mode);
    let dependencies = dependency_section(&root.bom_ref, &direct, &included, &graph);
    let components: Vec<Component> = included.iter().map(|p| Component::from_locked(p)).collect();

    Bom {
        bom_format: BOM_FORMAT,
        spec_version: SPEC_VERSION,
        serial_number: settings
            .include_serial_number
            .then(|| format!("urn:uuid:{}", Uuid::new_v4())),
        version: 1,
        metadata: Metadata {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            tools: vec![Tool::default()],
            component: root,
        },
        components,
        dependencies,
    }
}

fn root_component(settings: &Settings, manifest: &Manifest, mode: BomMode) -> Component {
    let name = match (&settings.component_name, mode) {
        (Some(name), _) => name.clone(),
        (None, BomMode::Direct) => manifest.package.name.clone(),
        (None, BomMode::Aggregate) => format!("{}-aggregate", manifest.package.name),
    };
    let version = settings
        .component_version
        .clone()
        .unwrap_or_else(|| manifest.package.version.clone());
    let reference = purl(&name, &version);

    Component {
        component_type: ComponentType::Application,
        bom_ref: reference.clone(),
        group: settings.component_group.clone(),
        name,
        version,
        description: manifest.package.description.clone(),
        hashes: Vec::new(),
        licenses: manifest
            .package
            .license
            .iter()
            .map(|expression| License {
                expression: expression.clone(),
            })
            .collect(),
        purl: Some(reference),
    }
}

/// Build the dependency section: the root's direct edges, then one entry
/// per included component with its edges restricted to the included set.
fn dependency_section(
    root_ref: &str,
    direct: &[ResolvedPackage],
    included: &[&LockedPackage],
    graph: &DependencyGraph,
) -> Vec<Dependency> {
    let included_refs: BTreeMap<String, String> = included
        .iter()
        .map(|p| (p.key(), purl(&p.name, &p.version)))
        .collect();

    let mut section = vec![Dependency {
        dependency_ref: root_ref.to_string(),
        depends_on: direct
            .iter()
            .map(|r| purl(&r.package.name, &r.package.version))
            .collect(),
    }];

    for package in included {
        let depends_on = graph
            .dependencies_of(&package.key())
            .iter()
            .filter_map(|key| included_refs.get(key).cloned())
            .collect();

        section.push(Dependency {
            dependency_ref: included_refs[&package.key()].clone(),
            depends_on,
        });
    }

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn sample_manifest() -> Manifest {
        Manifest::parse(
            r#"
[package]
name = "dependency-graph"
version = "1.0.0"
description = "Cross-platform dependency demo"
license = "MIT"

[dependencies]
serde = "1.0"

[dev-dependencies]
tempfile = "3.10"
"#,
            Path::new("Cargo.toml"),
        )
        .unwrap()
    }

    fn sample_lock() -> LockFile {
        toml::from_str(
            r#"
version = 4

[[package]]
name = "dependency-graph"
version = "1.0.0"
dependencies = ["serde", "tempfile"]

[[package]]
name = "serde"
version = "1.0.210"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "c8e3592472072e6e22e0a54d5904d9febf8508f65fb8552499a1abc7d1078c3a"
dependencies = ["serde_derive"]

[[package]]
name = "serde_derive"
version = "1.0.210"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "243902eda00fad750862fc144cea25caca5e20d615af0a81bee94ca738f1df1f"

[[package]]
name = "tempfile"
version = "3.10.1"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "85b77fafb263dd9d05cbeac119526425676db3784113aa9295c88498cbf8bff1"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_direct_bom_lists_direct_dependencies_only() {
        let bom = assemble(
            &Settings::default(),
            &sample_manifest(),
            &sample_lock(),
            BomMode::Direct,
        );

        let names: Vec<&str> = bom.components.iter().map(|c| c.name.as_str()).collect();
        // dev-dependencies are skipped by default, transitive deps are not listed
        assert_eq!(names, vec!["serde"]);
        assert_eq!(
            bom.components[0].purl.as_deref(),
            Some("pkg:cargo/serde@1.0.210")
        );
        assert_eq!(bom.components[0].hashes[0].alg, "SHA-256");
    }

    #[test]
    fn test_aggregate_bom_includes_transitive_closure() {
        let bom = assemble(
            &Settings::default(),
            &sample_manifest(),
            &sample_lock(),
            BomMode::Aggregate,
        );

        let names: Vec<&str> = bom.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["serde", "serde_derive"]);
        assert_eq!(bom.metadata.component.name, "dependency-graph-aggregate");
    }

    #[test]
    fn test_root_component_metadata() {
        let settings = Settings {
            component_group: Some("com.example.dependency_graph".to_string()),
            ..Settings::default()
        };
        let bom = assemble(&settings, &sample_manifest(), &sample_lock(), BomMode::Direct);
        let root = &bom.metadata.component;

        assert_eq!(root.component_type, ComponentType::Application);
        assert_eq!(root.name, "dependency-graph");
        assert_eq!(root.group.as_deref(), Some("com.example.dependency_graph"));
        assert_eq!(root.licenses[0].expression, "MIT");
        assert!(root.hashes.is_empty());
    }

    #[test]
    fn test_serial_number_toggle() {
        let manifest = sample_manifest();
        let lock = sample_lock();

        let with_serial = assemble(&Settings::default(), &manifest, &lock, BomMode::Direct);
        assert!(with_serial.serial_number.unwrap().starts_with("urn:uuid:"));

        let settings = Settings {
            include_serial_number: false,
            ..Settings::default()
        };
        let without = assemble(&settings, &manifest, &lock, BomMode::Direct);
        assert!(without.serial_number.is_none());
    }

    #[test]
    fn test_dependency_section_is_closed_over_refs() {
        let bom = assemble(
            &Settings::default(),
            &sample_manifest(),
            &sample_lock(),
            BomMode::Aggregate,
        );

        let refs: Vec<&str> = bom
            .components
            .iter()
            .map(|c| c.bom_ref.as_str())
            .chain([bom.metadata.component.bom_ref.as_str()])
            .collect();

        assert_eq!(bom.dependencies[0].dependency_ref, bom.metadata.component.bom_ref);
        assert_eq!(bom.dependencies[0].depends_on, vec!["pkg:cargo/serde@1.0.210"]);

        for entry in &bom.dependencies {
            assert!(refs.contains(&entry.dependency_ref.as_str()));
            for target in &entry.depends_on {
                assert!(refs.contains(&target.as_str()));
            }
        }
    }

    #[test]
    fn test_configured_name_overrides_aggregate_suffix() {
        let settings = Settings {
            component_name: Some("custom-bom".to_string()),
            ..Settings::default()
        };
        let bom = assemble(&settings, &sample_manifest(), &sample_lock(), BomMode::Aggregate);

        assert_eq!(bom.metadata.component.name, "custom-bom");
    }
}
