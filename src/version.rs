//! Version and build introspection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// One-line build description, e.g. `dataproc 2.1.0 (linux-x86_64, release)`
pub fn build_info() -> String {
    BuildInfo::current().to_string()
}

/// Where and how this library was built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub package: String,
    pub version: String,
    pub target_os: String,
    pub target_arch: String,
    /// `"debug"` or `"release"`
    pub profile: String,
    /// Whether the stream worker pool runs partitions on separate threads
    pub parallel: bool,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            package: env!("CARGO_PKG_NAME").to_string(),
            version: version().to_string(),
            target_os: std::env::consts::OS.to_string(),
            target_arch: std::env::consts::ARCH.to_string(),
            profile: if cfg!(debug_assertions) { "debug" } else { "release" }.to_string(),
            parallel: dataproc_core::WorkerPool::new(2)
                .map(|pool| pool.strategy() == dataproc_core::ExecutionStrategy::Parallel)
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}-{}, {})",
            self.package, self.version, self.target_os, self.target_arch, self.profile
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
        assert!(!version().is_empty());
    }

    #[test]
    fn test_build_info_format() {
        let info = build_info();
        assert!(info.starts_with(&format!("dataproc {} (", version())));
        assert!(info.contains(std::env::consts::ARCH));
        assert!(info.ends_with("debug)") || info.ends_with("release)"));
    }

    #[test]
    fn test_parallel_enabled() {
        assert!(BuildInfo::current().parallel);
    }
}
