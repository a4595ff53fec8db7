//! depgraph-core: Core logic for depgraph
//!
//! This crate provides manifest and lock file analysis, dependency graph
//! construction, and CycloneDX SBOM assembly, plus the platform greeting.

mod bom;
mod error;
mod graph;
mod greeting;
mod lock;
mod manifest;
mod render;
mod settings;

pub use bom::{
    Bom, BomMode, Component, ComponentType, Dependency, Hash, License, Metadata, Tool, assemble,
};
pub use error::CoreError;
pub use graph::{DependencyGraph, ResolvedPackage};
pub use greeting::Greeting;
pub use lock::{LOCK_FILENAME, LockFile, LockedPackage, MAX_LOCK_VERSION};
pub use manifest::{Configuration, DeclaredDependency, MANIFEST_FILENAME, Manifest, PackageMeta};
pub use render::{render_json, render_xml, write_reports};
pub use settings::{SETTINGS_FILENAME, Settings};

// Re-export Platform from depgraph-platform
pub use depgraph_platform::Platform;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
