//! Subcommand handlers

use crate::cli::{CodegenCommand, LintArgs};
use anyhow::{Context, Result};
use natrix_lint::codegen::{generate_call_graph, generate_exports};
use natrix_lint::{Linter, NatrixConfig, Reporter, RuleRegistry};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

/// Lint and print the report; exit code 1 when anything was reported
pub fn lint(args: LintArgs, mut config: NatrixConfig) -> Result<ExitCode> {
    let known = RuleRegistry::standard();
    for code in &args.disable {
        if !known.is_enabled(code) {
            warn!(code = %code, "Unknown rule code passed to --disable");
        }
    }
    config.disabled_rules.extend(args.disable);
    config.extra_paths.extend(args.extra_paths);

    let linter = Linter::new(config);
    let report = linter
        .lint_paths(&args.paths)
        .context("Failed to lint contracts")?;
    let output = Reporter::render(&report, args.format.into())?;
    print!("{output}");

    Ok(if report.has_issues() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

pub fn codegen(command: CodegenCommand, config: &NatrixConfig) -> Result<ExitCode> {
    let output = match command {
        CodegenCommand::Exports {
            file,
            display_modules,
            extra_paths,
        } => {
            let search = search_paths(config, extra_paths);
            generate_exports(&file, &search, display_modules)
                .with_context(|| format!("Failed to generate exports for {}", file.display()))?
        }
        CodegenCommand::CallGraph {
            file,
            function,
            extra_paths,
        } => {
            let search = search_paths(config, extra_paths);
            generate_call_graph(&file, &search, function.as_deref())
                .with_context(|| format!("Failed to generate call graph for {}", file.display()))?
        }
    };
    println!("{output}");
    Ok(ExitCode::SUCCESS)
}

/// Print the registered rules
pub fn rules() -> ExitCode {
    for rule in RuleRegistry::standard().rules() {
        println!(
            "{:<6}{:<22}{:<8}{}",
            rule.code(),
            rule.name(),
            rule.severity().to_string().to_lowercase(),
            rule.description()
        );
    }
    ExitCode::SUCCESS
}

fn search_paths(config: &NatrixConfig, extra: Vec<PathBuf>) -> Vec<PathBuf> {
    config.extra_paths.iter().cloned().chain(extra).collect()
}
