//! Build-target and architecture detection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system of the build target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Android,
    Ios,
    Linux,
    MacOs,
    Windows,
}

impl Os {
    /// Detect the operating system at compile time
    #[cfg(target_os = "android")]
    pub const fn current() -> Self {
        Os::Android
    }

    #[cfg(target_os = "ios")]
    pub const fn current() -> Self {
        Os::Ios
    }

    #[cfg(target_os = "linux")]
    pub const fn current() -> Self {
        Os::Linux
    }

    #[cfg(target_os = "macos")]
    pub const fn current() -> Self {
        Os::MacOs
    }

    #[cfg(target_os = "windows")]
    pub const fn current() -> Self {
        Os::Windows
    }

    /// Returns the OS identifier as used in platform triples
    pub const fn as_str(&self) -> &'static str {
        match self {
            Os::Android => "android",
            Os::Ios => "ios",
            Os::Linux => "linux",
            Os::MacOs => "darwin",
            Os::Windows => "windows",
        }
    }

    /// Returns the display name of the OS (e.g. "Android", "iOS")
    pub const fn name(&self) -> &'static str {
        match self {
            Os::Android => "Android",
            Os::Ios => "iOS",
            Os::Linux => "Linux",
            Os::MacOs => "macOS",
            Os::Windows => "Windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CPU architecture of the build target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86_64,
    Aarch64,
    Arm,
}

impl Arch {
    /// Detect the architecture at compile time
    #[cfg(target_arch = "x86_64")]
    pub const fn current() -> Self {
        Arch::X86_64
    }

    #[cfg(target_arch = "aarch64")]
    pub const fn current() -> Self {
        Arch::Aarch64
    }

    #[cfg(target_arch = "arm")]
    pub const fn current() -> Self {
        Arch::Arm
    }

    /// Returns the architecture name as used in platform triples
    pub const fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::Arm => "arm",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Combined platform identifier (e.g., "aarch64-android")
///
/// Resolved once per build target; every binary carries exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub arch: Arch,
    pub os: Os,
}

impl Platform {
    /// Create a new platform identifier
    pub const fn new(arch: Arch, os: Os) -> Self {
        Self { arch, os }
    }

    /// Detect the current platform at compile time
    pub const fn current() -> Self {
        Self {
            arch: Arch::current(),
            os: Os::current(),
        }
    }

    /// Returns the display name of the platform (e.g. "Android", "iOS")
    pub const fn name(&self) -> &'static str {
        self.os.name()
    }

    /// Returns the platform triple string (e.g., "aarch64-darwin")
    pub fn triple(&self) -> String {
        format!("{}-{}", self.arch, self.os)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}

/// Platform information including host details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub os: Os,
    pub arch: Arch,
    pub hostname: String,
    pub username: String,
}

impl PlatformInfo {
    /// Gather current platform and host information
    pub fn current() -> Self {
        let platform = Platform::current();
        Self {
            platform,
            os: platform.os,
            arch: platform.arch,
            hostname: whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string()),
            username: whoami::username(),
        }
    }
}
