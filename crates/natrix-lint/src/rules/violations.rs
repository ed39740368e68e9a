//! Issues reported by the lint rules

use crate::violation_trait::ViolationCategory;
use std::path::PathBuf;

define_violations! {
    ViolationCategory::Mutability,
    pub enum MutabilityViolation {
        #[violation(
            id = "NTX4",
            severity = Style,
            message = "Function '{function}' reads contract state but is not marked as 'view'.",
            suggestion = "Add the @view decorator to '{function}'"
        )]
        ImplicitView {
            function: String,
            file: PathBuf,
            line: usize,
            column: usize,
        },

        #[violation(
            id = "NTX5",
            severity = Style,
            message = "Function '{function}' does not access state but is not marked as 'pure'.",
            suggestion = "Add the @pure decorator to '{function}'"
        )]
        ImplicitPure {
            function: String,
            file: PathBuf,
            line: usize,
            column: usize,
        },

        #[violation(
            id = "NTX6",
            severity = Error,
            message = "Function '{function}' is marked as '{declared}' but modifies state ('{variable}' at line {access_line}).",
            suggestion = "Remove the state modification or drop the @{declared} decorator"
        )]
        StateWrite {
            function: String,
            declared: String,
            variable: String,
            access_line: usize,
            file: PathBuf,
            line: usize,
            column: usize,
        },

        #[violation(
            id = "NTX6",
            severity = Error,
            message = "Function '{function}' is marked as '{declared}' but makes an external call that may modify state (line {call_line}).",
            suggestion = "Use staticcall for read-only calls or drop the @{declared} decorator"
        )]
        ExternalCall {
            function: String,
            declared: String,
            call_line: usize,
            file: PathBuf,
            line: usize,
            column: usize,
        },

        #[violation(
            id = "NTX6",
            severity = Error,
            message = "Function '{function}' is marked as 'pure' but reads state ('{variable}' at line {access_line}).",
            suggestion = "Mark '{function}' as @view instead"
        )]
        StateRead {
            function: String,
            variable: String,
            access_line: usize,
            file: PathBuf,
            line: usize,
            column: usize,
        },

        #[violation(
            id = "NTX6",
            severity = Error,
            message = "Function '{function}' is marked as 'pure' but calls '{target}', which is not pure.",
            suggestion = "Mark '{function}' as @view instead"
        )]
        ImpureStaticCall {
            function: String,
            target: String,
            file: PathBuf,
            line: usize,
            column: usize,
        },
    }
}

define_violations! {
    ViolationCategory::Syntax,
    pub enum SyntaxViolation {
        #[violation(
            id = "NTX0",
            severity = Error,
            message = "Could not parse file: {message}"
        )]
        ParseFailure {
            message: String,
            file: PathBuf,
            line: usize,
            column: usize,
        },
    }
}
