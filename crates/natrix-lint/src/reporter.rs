//! Report Generation
//!
//! Renders a [`LintReport`] in one of three formats:
//! - Human-readable lines for the terminal
//! - JSON for tooling
//! - GitHub Actions workflow commands for CI annotations

use crate::linter::LintReport;
use crate::{NatrixError, Result, Severity};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

/// Output format of `natrix lint`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Ci,
}

impl FromStr for OutputFormat {
    type Err = NatrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ci" | "github" => Ok(Self::Ci),
            other => Err(NatrixError::Config(format!("unknown output format '{other}'"))),
        }
    }
}

/// Report generator
pub struct Reporter;

impl Reporter {
    pub fn render(report: &LintReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Human => Ok(Self::to_human_readable(report)),
            OutputFormat::Json => Self::to_json(report),
            OutputFormat::Ci => Ok(Self::to_ci_annotations(report)),
        }
    }

    /// Generate JSON report
    pub fn to_json(report: &LintReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// One `<file>:<line>:<col> <CODE> <message>` line per issue, then a summary
    pub fn to_human_readable(report: &LintReport) -> String {
        let mut output = String::new();
        for issue in &report.issues {
            let _ = writeln!(output, "{issue}");
        }

        if report.has_issues() {
            let _ = writeln!(
                output,
                "\nFound {} issue(s) in {} file(s) checked ({} error, {} warning, {} style)",
                report.issues.len(),
                report.files_checked,
                report.count(Severity::Error),
                report.count(Severity::Warning),
                report.count(Severity::Style),
            );
        } else {
            let _ = writeln!(
                output,
                "All checks passed ({} file(s) checked)",
                report.files_checked
            );
        }
        output
    }

    /// GitHub Actions `::error` / `::warning` workflow commands
    pub fn to_ci_annotations(report: &LintReport) -> String {
        let mut output = String::new();
        for issue in &report.issues {
            let level = match issue.severity {
                Severity::Error => "error",
                Severity::Warning | Severity::Style => "warning",
            };
            let _ = writeln!(
                output,
                "::{level} file={},line={},col={},title={}::{}",
                issue.file.display(),
                issue.line,
                issue.column,
                issue.code,
                escape_data(&issue.message)
            );
        }
        output
    }
}

/// Escape a workflow command message
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
