//! Dependency graph over locked packages
//!
//! This module builds a directed graph from lock file entries and resolves
//! manifest declarations against it:
//! - Direct resolution matches each declared dependency of an admitted
//!   configuration to a locked package
//! - Transitive closure walks the graph breadth-first for aggregate SBOMs
//!
//! Lock dependency entries name their target as `name` or `name version`;
//! the bare form is only used when a single version of the package is
//! locked, so both forms resolve unambiguously.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use semver::{Version, VersionReq};
use tracing::{debug, warn};

use crate::lock::{LockFile, LockedPackage};
use crate::manifest::{DeclaredDependency, Manifest};
use crate::settings::Settings;

/// A locked package admitted into an SBOM, with the configurations that
/// declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub package: LockedPackage,
    pub configurations: Vec<String>,
}

/// Directed dependency graph keyed by `name@version`.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// All packages in the lock file.
    nodes: BTreeMap<String, LockedPackage>,

    /// Edges: package key -> keys of its dependencies.
    edges: BTreeMap<String, Vec<String>>,

    /// Package name -> keys of the locked versions of that name.
    by_name: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph from a lock file.
    pub fn build(lock: &LockFile) -> Self {
        let mut graph = Self::default();

        for package in &lock.packages {
            let key = package.key();
            graph
                .by_name
                .entry(package.name.clone())
                .or_default()
                .push(key.clone());
            graph.nodes.insert(key, package.clone());
        }

        for package in &lock.packages {
            let mut deps = Vec::new();
            for entry in &package.dependencies {
                match graph.resolve_entry(entry) {
                    Some(key) => deps.push(key),
                    None => warn!(
                        "lock entry '{}' of '{}' does not match any locked package",
                        entry,
                        package.key()
                    ),
                }
            }
            graph.edges.insert(package.key(), deps);
        }

        graph
    }

    /// Resolve a lock dependency entry (`name` or `name version`) to a key.
    fn resolve_entry(&self, entry: &str) -> Option<String> {
        let mut parts = entry.split_whitespace();
        let name = parts.next()?;

        if let Some(version) = parts.next() {
            let key = format!("{name}@{version}");
            return self.nodes.contains_key(&key).then_some(key);
        }

        match self.by_name.get(name).map(Vec::as_slice) {
            Some([key]) => Some(key.clone()),
            _ => None,
        }
    }

    /// The package behind a key.
    pub fn get(&self, key: &str) -> Option<&LockedPackage> {
        self.nodes.get(key)
    }

    /// Direct dependency keys of a package.
    pub fn dependencies_of(&self, key: &str) -> &[String] {
        self.edges.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve the direct dependencies of every admitted configuration.
    ///
    /// Declarations that don't match a locked package are logged and
    /// skipped; the lock legitimately omits optional dependencies whose
    /// features were never enabled.
    pub fn resolve_direct(&self, manifest: &Manifest, settings: &Settings) -> Vec<ResolvedPackage> {
        let mut resolved: BTreeMap<String, ResolvedPackage> = BTreeMap::new();

        for configuration in &manifest.configurations {
            if !settings.admits(&configuration.name) {
                debug!("skipping configuration '{}'", configuration.name);
                continue;
            }

            for dep in &configuration.dependencies {
                let Some(key) = self.resolve_declaration(dep) else {
                    if dep.optional {
                        debug!("optional dependency '{}' not locked, skipping", dep.name);
                    } else {
                        warn!(
                            "dependency '{}' ({}) not found in lock file, skipping",
                            dep.name, dep.req
                        );
                    }
                    continue;
                };

                let package = self.nodes[&key].clone();
                resolved
                    .entry(key)
                    .or_insert_with(|| ResolvedPackage {
                        package,
                        configurations: Vec::new(),
                    })
                    .configurations
                    .push(configuration.name.clone());
            }
        }

        resolved.into_values().collect()
    }

    /// Match a manifest declaration to a locked package key.
    ///
    /// A single locked version wins outright; multiple locked versions are
    /// disambiguated by the declared requirement.
    fn resolve_declaration(&self, dep: &DeclaredDependency) -> Option<String> {
        let keys = self.by_name.get(&dep.name)?;
        if let [key] = keys.as_slice() {
            return Some(key.clone());
        }

        let req = VersionReq::parse(&dep.req).ok()?;
        keys.iter()
            .filter(|key| {
                let package = &self.nodes[*key];
                Version::parse(&package.version)
                    .map(|v| req.matches(&v))
                    .unwrap_or(false)
            })
            .max_by_key(|key| Version::parse(&self.nodes[*key].version).ok())
            .cloned()
    }

    /// Breadth-first transitive closure, including the roots themselves.
    pub fn closure(&self, roots: impl IntoIterator<Item = String>) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();

        for root in roots {
            if seen.insert(root.clone()) {
                queue.push_back(root);
            }
        }

        while let Some(key) = queue.pop_front() {
            for dep in self.dependencies_of(&key) {
                if seen.insert(dep.clone()) {
                    queue.push_back(dep.clone());
                }
            }
        }

        seen
    }
}
