//! Build information health check

use crate::build_info;
use crate::health::check::{CheckResult, SystemCheck};

/// Checks that build metadata was embedded
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates build metadata (rustc, target, timestamp, git)")
    }

    fn check(&self) -> CheckResult {
        let details: Vec<String> = build_info::detailed_info()
            .lines()
            .map(|line| format!("  {line}"))
            .collect();

        if build_info::RUSTC_SEMVER.is_empty() || build_info::CARGO_TARGET_TRIPLE.is_empty() {
            return CheckResult::fail("Compiler metadata missing").with_detail_lines(&details);
        }

        // Builds from a source tarball have no git metadata
        let result = if build_info::GIT_SHA.is_none() {
            CheckResult::warn("Build metadata accessible, git info missing")
        } else {
            CheckResult::pass(format!("Build {}", build_info::version_string()))
        };
        result.with_detail_lines(&details)
    }
}
