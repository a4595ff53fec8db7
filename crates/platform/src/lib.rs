//! Platform detection for depgraph
//!
//! This crate identifies the build target the binary was compiled for:
//! - OS and architecture, resolved at compile time per target
//! - Human-readable platform names for display
//! - Host information (hostname, user) for diagnostics

mod platform;

pub use platform::{Arch, Os, Platform, PlatformInfo};
