//! Terminal rendering of health check reports

use std::fmt::Write as _;

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::check::CheckStatus;
use super::runner::HealthCheckReport;

/// Formats a health check report as a table followed by a summary
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Check", "Status", "Duration", "Message"]);

    for (name, result) in &report.results {
        builder.push_record([
            name.clone(),
            result.status.as_colored_str(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{table}\n{}", format_summary(report))
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "\n{}", "Summary".bold().underline());
    let _ = writeln!(out, "  Total checks: {}", report.total);
    let _ = writeln!(out, "  {} Passed: {}", "✓".green(), report.passed);
    if report.warned > 0 {
        let _ = writeln!(out, "  {} Warned: {}", "⚠".yellow(), report.warned);
    }
    if report.failed > 0 {
        let _ = writeln!(out, "  {} Failed: {}", "✗".red(), report.failed);
    }

    let overall = match report.overall() {
        CheckStatus::Pass => "Overall: HEALTHY".green().bold(),
        CheckStatus::Warn => "Overall: HEALTHY (with warnings)".yellow().bold(),
        CheckStatus::Fail => "Overall: UNHEALTHY".red().bold(),
    };
    let _ = writeln!(out, "\n  {overall}");
    out
}

/// Prints a health check report, then the details of every check that has them
pub fn print_report(report: &HealthCheckReport) {
    println!("{}", format_report(report));

    for (name, details) in report
        .results
        .iter()
        .filter_map(|(name, r)| r.details.as_ref().map(|d| (name, d)))
    {
        println!("\n{} Details:\n{details}", name.bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{CheckResult, HealthCheckRunner, SystemCheck};

    struct Named;

    impl SystemCheck for Named {
        fn name(&self) -> &'static str {
            "Keyboard edges"
        }

        fn check(&self) -> CheckResult {
            CheckResult::pass("3 scenarios")
        }
    }

    #[test]
    fn test_report_lists_checks_and_summary() {
        colored::control::set_override(false);
        let report = HealthCheckRunner::new().add_check(Named).run();
        let text = format_report(&report);
        assert!(text.contains("Keyboard edges"));
        assert!(text.contains("3 scenarios"));
        assert!(text.contains("Total checks: 1"));
        assert!(text.contains("Overall: HEALTHY"));
    }
}
