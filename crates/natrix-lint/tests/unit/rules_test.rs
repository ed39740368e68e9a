//! Tests for the NTX4 / NTX5 / NTX6 rules

use crate::test_utils::{issues_for, lint_source};
use natrix_lint::{Linter, NatrixConfig, Severity};
use std::path::Path;

#[test]
fn test_implicit_view_for_storage_read() {
    let report = lint_source(
        r"
balances: HashMap[address, uint256]

@external
def balance_of(owner: address) -> uint256:
    return self.balances[owner]
",
    );
    assert_eq!(issues_for(&report, "balance_of"), vec![("NTX4".to_string(), 4)]);
    assert_eq!(report.issues[0].severity, Severity::Style);
}

#[test]
fn test_environment_read_is_a_read() {
    let report = lint_source(
        r"
@external
def now() -> uint256:
    return block.timestamp
",
    );
    assert_eq!(issues_for(&report, "now"), vec![("NTX4".to_string(), 2)]);
}

#[test]
fn test_constants_are_not_state() {
    let report = lint_source(
        r"
FEE: constant(uint256) = 30

@external
def fee() -> uint256:
    return FEE
",
    );
    assert_eq!(issues_for(&report, "fee"), vec![("NTX5".to_string(), 4)]);
}

#[test]
fn test_writes_suppress_inference() {
    let report = lint_source(
        r"
counter: uint256

event Bumped:
    value: uint256

@external
def bump():
    self.counter += 1

@external
def announce(value: uint256):
    log Bumped(value)
",
    );
    assert!(!report.has_issues());
}

#[test]
fn test_constructor_and_annotated_functions_are_skipped() {
    let report = lint_source(
        r"
owner: address

@deploy
def __init__():
    pass

@external
@view
def get_owner() -> address:
    return self.owner

@external
@pure
def add(a: uint256, b: uint256) -> uint256:
    return a + b
",
    );
    assert!(!report.has_issues());
}

#[test]
fn test_view_without_reads_is_implicitly_pure() {
    let report = lint_source(
        r"
@external
@view
def add(a: uint256, b: uint256) -> uint256:
    return a + b
",
    );
    assert_eq!(issues_for(&report, "add"), vec![("NTX5".to_string(), 2)]);
}

#[test]
fn test_effects_through_internal_calls() {
    let report = lint_source(
        r"
total: uint256

@internal
def _read() -> uint256:
    return self.total

@external
def outer() -> uint256:
    return self._read()
",
    );
    assert_eq!(issues_for(&report, "outer"), vec![("NTX4".to_string(), 8)]);
    assert_eq!(issues_for(&report, "_read"), vec![("NTX4".to_string(), 4)]);
}

#[test]
fn test_recursive_calls_terminate() {
    let report = lint_source(
        r"
@internal
def ping(n: uint256) -> uint256:
    if n == 0:
        return 0
    return self.pong(n - 1)

@internal
def pong(n: uint256) -> uint256:
    return self.ping(n)
",
    );
    let codes: Vec<&str> = report.issues.iter().map(|i| i.code.as_str()).collect();
    assert_eq!(codes, vec!["NTX5", "NTX5"]);
}

#[test]
fn test_view_that_writes_is_an_error() {
    let report = lint_source(
        r"
total: uint256

@external
@view
def reset():
    self.total = 0
",
    );
    let issue = &report.issues[0];
    assert_eq!(issue.code, "NTX6");
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(
        issue.message,
        "Function 'reset' is marked as 'view' but modifies state ('total' at line 7)."
    );
}

#[test]
fn test_view_with_extcall_is_an_error() {
    let report = lint_source(
        r"
interface IVault:
    def sync(): nonpayable

@external
@view
def sync_vault(vault: IVault):
    extcall vault.sync()
",
    );
    assert_eq!(issues_for(&report, "sync_vault"), vec![("NTX6".to_string(), 5)]);
}

#[test]
fn test_pure_that_reads_is_an_error() {
    let report = lint_source(
        r"
@external
@pure
def sender() -> address:
    return msg.sender
",
    );
    assert_eq!(
        report.issues[0].message,
        "Function 'sender' is marked as 'pure' but reads state ('msg.sender' at line 5)."
    );
}

#[test]
fn test_pure_calling_view_is_an_error() {
    let report = lint_source(
        r"
interface IOracle:
    def price() -> uint256: view

@external
@pure
def quote(oracle: IOracle) -> uint256:
    return staticcall oracle.price()
",
    );
    assert_eq!(
        report.issues[0].message,
        "Function 'quote' is marked as 'pure' but calls 'IOracle.price', which is not pure."
    );
}

#[test]
fn test_interface_files_are_not_checked() {
    let report = Linter::new(NatrixConfig::default())
        .lint_source(
            Path::new("/nonexistent/IVault.vyi"),
            "@external\n@view\ndef total() -> uint256:\n    ...\n\n@external\ndef deposit(amount: uint256):\n    ...\n",
        )
        .unwrap();
    assert!(!report.has_issues());
}

#[test]
fn test_extcall_without_state_access_is_not_inferred() {
    let report = lint_source(
        r"
interface IToken:
    def transfer(to: address, amount: uint256) -> bool: nonpayable

@external
def pay(t: IToken, to: address, amount: uint256):
    extcall t.transfer(to, amount)

@external
def tip(to: address):
    send(to, 1)
",
    );
    assert!(issues_for(&report, "pay").is_empty());
    assert!(issues_for(&report, "tip").is_empty());
    assert!(!report.has_issues());
}

#[test]
fn test_payable_and_nonreentrant_are_not_inferred() {
    let report = lint_source(
        r"
total: uint256

@external
@payable
def deposit_fee() -> uint256:
    return 42

@external
@nonreentrant
def locked_total() -> uint256:
    return self.total

@external
def plain_total() -> uint256:
    return self.total
",
    );
    assert!(issues_for(&report, "deposit_fee").is_empty());
    assert!(issues_for(&report, "locked_total").is_empty());
    assert_eq!(issues_for(&report, "plain_total"), vec![("NTX4".to_string(), 14)]);
}
