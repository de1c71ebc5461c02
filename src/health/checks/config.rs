//! Configuration system health check

use crate::config::AppConfig;
use crate::health::check::{CheckResult, SystemCheck};

/// Checks that every profile loads and passes validation
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    /// Creates a config check for the shipped profiles
    pub fn new() -> Self {
        Self {
            profiles: vec!["debug", "release"],
        }
    }

    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Loads each profile from files and environment, then validates it")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let mut failures = 0;

        for profile in &self.profiles {
            let outcome = AppConfig::load(profile)
                .map_err(|e| e.to_string())
                .and_then(|config| config.validate().map(|()| config).map_err(|e| e.to_string()));

            match outcome {
                Ok(config) => details.push(format!(
                    "  ✓ Profile '{profile}': scroll {} per line, log filter '{}'",
                    config.input.scroll_units_per_line, config.logging.filter
                )),
                Err(e) => {
                    details.push(format!("  ✗ Profile '{profile}': {e}"));
                    failures += 1;
                }
            }
        }

        let from_env = AppConfig::load_from_env();
        match &from_env {
            Ok(config) => details.push(format!("  ✓ Environment profile '{}'", config.profile)),
            Err(e) => details.push(format!("  ⚠ Environment config: {e}")),
        }

        let result = if failures > 0 {
            CheckResult::fail(format!("{failures} of {} profiles invalid", self.profiles.len()))
        } else if from_env.is_err() {
            CheckResult::warn("Profiles valid, environment config did not load")
        } else {
            CheckResult::pass(format!("{} profiles validated", self.profiles.len()))
        };
        result.with_detail_lines(&details)
    }
}
