//! Exports and call graph generation on a contract with an imported module

use crate::test_utils::fixture;
use natrix_lint::codegen::{generate_call_graph, generate_exports};

#[test]
fn test_exports_include_module_interface() {
    let output = generate_exports(&fixture("oracle/price_oracle.vy"), &[], false).unwrap();
    assert_eq!(
        output,
        "# NOTE: Always double-check the generated exports
exports: (
    price_oracle.last_price,
    price_oracle.owner,
    price_oracle.price_v0,
    price_oracle.renounce_ownership,
    price_oracle.transfer_ownership,
    price_oracle.update_price
)"
    );
}

#[test]
fn test_exports_with_module_comments() {
    let output = generate_exports(&fixture("oracle/price_oracle.vy"), &[], true).unwrap();

    assert!(output.contains("exports: ("));
    assert!(output.contains("owner,  # ownable"));
    assert!(output.contains("transfer_ownership,  # ownable"));
    assert!(output.contains("renounce_ownership,  # ownable"));
    assert!(output.contains("price_oracle.price_v0,\n"));
    assert!(output.contains("price_oracle.update_price\n)"));
}

#[test]
fn test_call_graph_includes_module_calls() {
    let output = generate_call_graph(&fixture("oracle/price_oracle.vy"), &[], None).unwrap();
    let body: Vec<&str> = output.lines().skip(6).collect();
    assert!(output.contains("\"rankSpacing\": 210"));
    assert_eq!(
        body,
        vec![
            "flowchart TD",
            "    N0[\"__init__\"]",
            "    N1[\"_scaled\"]",
            "    N2[\"ownable.__init__\"]",
            "    N3[\"ownable._check_owner\"]",
            "    N4[\"price_v0\"]",
            "    N5[\"update_price\"]",
            "    N0 --> N2",
            "    N5 --> N3",
        ]
    );
}

#[test]
fn test_call_graph_for_one_function() {
    let output = generate_call_graph(
        &fixture("oracle/price_oracle.vy"),
        &[],
        Some("update_price"),
    )
    .unwrap();
    assert!(output.ends_with(
        "    N0[\"ownable._check_owner\"]\n    N1[\"update_price\"]\n    N1 --> N0"
    ));
}

#[test]
fn test_parse_error_is_reported() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = crate::test_utils::write_contract(&temp, "bad.vy", "def f(:\n    pass\n");
    let err = generate_exports(&path, &[], false).unwrap_err();
    assert!(matches!(err, natrix_lint::NatrixError::Parse { line: 1, .. }));
}
