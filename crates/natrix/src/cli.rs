//! Command line interface definition

use clap::{Parser, Subcommand, ValueEnum};
use natrix_lint::OutputFormat;
use std::path::PathBuf;

/// Command line interface for Natrix
#[derive(Parser, Debug)]
#[command(name = "natrix")]
#[command(about = "Natrix - mutability linter and code generator for Vyper contracts")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (defaults to natrix.toml / pyproject.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lint Vyper contracts
    Lint(LintArgs),

    /// Generate code from a contract
    #[command(subcommand)]
    Codegen(CodegenCommand),

    /// List available rules
    Rules,
}

#[derive(clap::Args, Debug)]
pub struct LintArgs {
    /// Files or directories to lint
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,

    /// Rule codes to disable (e.g. NTX5)
    #[arg(short, long, value_delimiter = ',')]
    pub disable: Vec<String>,

    /// Additional directories to search for imports
    #[arg(short = 'p', long = "extra-path")]
    pub extra_paths: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum CodegenCommand {
    /// Print an explicit `exports:` declaration
    Exports {
        file: PathBuf,

        /// Annotate names that come from imported modules
        #[arg(long)]
        display_modules: bool,

        #[arg(short = 'p', long = "extra-path")]
        extra_paths: Vec<PathBuf>,
    },

    /// Print a Mermaid call graph
    CallGraph {
        file: PathBuf,

        /// Only draw what this function reaches
        #[arg(short, long)]
        function: Option<String>,

        #[arg(short = 'p', long = "extra-path")]
        extra_paths: Vec<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Human,
    Json,
    Ci,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Human => Self::Human,
            FormatArg::Json => Self::Json,
            FormatArg::Ci => Self::Ci,
        }
    }
}
