//! Platform greeting

use depgraph_platform::Platform;

/// Greets the build target by name.
///
/// The platform is captured once at construction, so repeated calls to
/// [`greet`](Greeting::greet) return identical strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Greeting {
    platform: Platform,
}

impl Greeting {
    /// Create a greeting for the current build target
    pub const fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }

    /// Create a greeting for a specific platform
    pub const fn with_platform(platform: Platform) -> Self {
        Self { platform }
    }

    /// The platform this greeting was created for
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the greeting string, e.g. "Hello, Android!"
    pub fn greet(&self) -> String {
        format!("Hello, {}!", self.platform.name())
    }
}

impl Default for Greeting {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depgraph_platform::{Arch, Os};

    #[test]
    fn test_greet_android() {
        let greeting = Greeting::with_platform(Platform::new(Arch::Aarch64, Os::Android));
        assert_eq!(greeting.greet(), "Hello, Android!");
    }

    #[test]
    fn test_greet_ios() {
        let greeting = Greeting::with_platform(Platform::new(Arch::Aarch64, Os::Ios));
        assert_eq!(greeting.greet(), "Hello, iOS!");
    }

    #[test]
    fn test_greet_matches_platform_name() {
        for os in [Os::Android, Os::Ios, Os::Linux, Os::MacOs, Os::Windows] {
            let platform = Platform::new(Arch::X86_64, os);
            let greeting = Greeting::with_platform(platform);
            assert_eq!(greeting.greet(), format!("Hello, {}!", platform.name()));
        }
    }

    #[test]
    fn test_greet_is_idempotent() {
        let greeting = Greeting::new();
        assert_eq!(greeting.greet(), greeting.greet());
    }
}
