//! Integration test suite for natrix-lint
//!
//! Run with: `cargo test -p natrix-lint --test integration`

#[path = "unit/test_utils.rs"]
mod test_utils;

#[path = "integration/codegen_test.rs"]
mod codegen;

#[path = "integration/fixtures_test.rs"]
mod fixtures;

#[path = "integration/lint_paths_test.rs"]
mod lint_paths;
