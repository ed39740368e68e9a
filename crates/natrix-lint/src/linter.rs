//! Linter
//!
//! Runs the pipeline for a set of paths: scan for `.vy` files, parse each
//! with its imports, analyse effects, apply the enabled rules and collect the
//! results into a [`LintReport`].

use crate::analysis::Analyzer;
use crate::config::NatrixConfig;
use crate::resolver::{ModuleLoader, SourceUnit};
use crate::rules::{RuleContext, RuleRegistry, SyntaxViolation};
use crate::violation_trait::Violation;
use crate::{NatrixError, Result, Severity, scan};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub code: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn from_violation(violation: &dyn Violation) -> Self {
        Self {
            file: violation.file().clone(),
            line: violation.line(),
            column: violation.column(),
            code: violation.id().to_string(),
            severity: violation.severity(),
            message: violation.message(),
            suggestion: violation.suggestion(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {} {}",
            self.file.display(),
            self.line,
            self.column,
            self.code,
            self.message
        )
    }
}

/// Outcome of a lint run
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    pub timestamp: DateTime<Utc>,
    pub files_checked: usize,
    /// Sorted by file, line and code
    pub issues: Vec<Issue>,
}

impl LintReport {
    fn new(files_checked: usize, mut issues: Vec<Issue>) -> Self {
        issues.sort_by(|a, b| {
            (&a.file, a.line, &a.code, a.column).cmp(&(&b.file, b.line, &b.code, b.column))
        });
        Self {
            timestamp: Utc::now(),
            files_checked,
            issues,
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Issues reported under `code`
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

/// Lints Vyper sources with the configured rules
pub struct Linter {
    config: NatrixConfig,
    registry: RuleRegistry,
}

impl Linter {
    pub fn new(config: NatrixConfig) -> Self {
        let registry = RuleRegistry::with_disabled(&config.disabled_rules);
        Self { config, registry }
    }

    /// Lint files and directories
    ///
    /// Without paths, the configured `files` are used, falling back to the
    /// current directory.
    pub fn lint_paths(&self, paths: &[PathBuf]) -> Result<LintReport> {
        let roots = match (paths.is_empty(), self.config.files.is_empty()) {
            (false, _) => paths.to_vec(),
            (true, false) => self.config.files.clone(),
            (true, true) => vec![PathBuf::from(".")],
        };
        if let Some(missing) = roots.iter().find(|p| !p.exists()) {
            return Err(NatrixError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("path does not exist: {}", missing.display()),
            )));
        }

        let exclude = scan::build_exclude_set(&self.config.exclude)?;
        let files = scan::collect_source_files(&roots, &exclude);

        let mut loader = ModuleLoader::new(self.config.extra_paths.clone());
        let mut analyzer = Analyzer::new();
        let mut issues = Vec::new();
        for file in &files {
            let loaded = loader.load(file);
            issues.extend(self.check_loaded(file, loaded, &mut analyzer)?);
        }

        let report = LintReport::new(files.len(), issues);
        info!(
            files = report.files_checked,
            issues = report.issues.len(),
            "Lint finished"
        );
        Ok(report)
    }

    /// Lint a single file
    pub fn lint_file(&self, path: &Path) -> Result<LintReport> {
        self.lint_paths(&[path.to_path_buf()])
    }

    /// Lint source text attributed to `path`; imports resolve relative to `path`
    pub fn lint_source(&self, path: &Path, source: &str) -> Result<LintReport> {
        let mut loader = ModuleLoader::new(self.config.extra_paths.clone());
        let loaded = loader.load_source(path, source);
        let issues = self.check_loaded(path, loaded, &mut Analyzer::new())?;
        Ok(LintReport::new(1, issues))
    }

    fn check_loaded(
        &self,
        file: &Path,
        loaded: Result<Arc<SourceUnit>>,
        analyzer: &mut Analyzer,
    ) -> Result<Vec<Issue>> {
        match loaded {
            Ok(unit) => Ok(self.check_unit(file, &unit, analyzer)),
            Err(NatrixError::Parse {
                file,
                line,
                column,
                message,
            }) => {
                debug!(file = %file.display(), %message, "Parse failure");
                let violation = SyntaxViolation::ParseFailure {
                    message,
                    file,
                    line,
                    column,
                };
                Ok(vec![Issue::from_violation(&violation)])
            }
            Err(NatrixError::Io(err)) => {
                warn!(file = %file.display(), error = %err, "Unreadable source file");
                let violation = SyntaxViolation::ParseFailure {
                    message: format!("could not read source: {err}"),
                    file: file.to_path_buf(),
                    line: 1,
                    column: 1,
                };
                Ok(vec![Issue::from_violation(&violation)])
            }
            Err(err) => Err(err),
        }
    }

    fn check_unit(&self, file: &Path, unit: &SourceUnit, analyzer: &mut Analyzer) -> Vec<Issue> {
        let analysis = analyzer.analyze(unit);
        let ctx = RuleContext::new(file, unit, &analysis);
        let issues: Vec<Issue> = self
            .registry
            .check(&ctx)
            .iter()
            .map(|v| Issue::from_violation(&**v))
            .collect();
        debug!(
            file = %file.display(),
            functions = unit.module.functions.len(),
            issues = issues.len(),
            "File checked"
        );
        issues
    }
}
