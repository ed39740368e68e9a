//! Implicit view/pure inference on staticcall and extcall fixtures

use crate::test_utils::{fixture, issues_for, lint_file};

#[test]
fn test_extcall_is_never_implicitly_view() {
    let report = lint_file(&fixture("staticcall_view.vy"));
    assert!(issues_for(&report, "transfer").is_empty());
}

#[test]
fn test_staticcall_to_view_requires_view() {
    let report = lint_file(&fixture("staticcall_view.vy"));
    assert_eq!(
        issues_for(&report, "get_supply"),
        vec![("NTX4".to_string(), 19)]
    );
    assert_eq!(report.issues.len(), 1);
}

#[test]
fn test_single_pure_staticcall_requires_pure() {
    let report = lint_file(&fixture("staticcall_pure.vy"));
    assert_eq!(
        issues_for(&report, "get_value_pure"),
        vec![("NTX5".to_string(), 8)]
    );
}

#[test]
fn test_multiple_pure_staticcalls_require_pure() {
    let report = lint_file(&fixture("staticcall_pure.vy"));
    assert_eq!(
        issues_for(&report, "get_values_pure"),
        vec![("NTX5".to_string(), 14)]
    );
    assert_eq!(report.issues.len(), 2);
}

#[test]
fn test_view_function_calling_view_is_accepted() {
    let report = lint_file(&fixture("staticcall_view_decorated.vy"));
    assert!(issues_for(&report, "get_value_view").is_empty());
}

#[test]
fn test_view_function_calling_view_and_pure_is_accepted() {
    let report = lint_file(&fixture("staticcall_view_decorated.vy"));
    assert!(issues_for(&report, "get_value_view_and_pure").is_empty());
    assert!(!report.has_issues());
}
