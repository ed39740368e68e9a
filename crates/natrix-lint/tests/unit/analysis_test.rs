//! Tests for effect analysis through the public API

use crate::test_utils::write_contract;
use natrix_lint::Analyzer;
use natrix_lint::analysis::AccessKind;
use natrix_lint::ast::Mutability;
use natrix_lint::resolver::ModuleLoader;
use tempfile::TempDir;

#[test]
fn test_imported_module_state_is_tracked() {
    let temp = TempDir::new().unwrap();
    write_contract(
        &temp,
        "ownable.vy",
        "owner: public(address)\n\n@internal\ndef _check_owner():\n    assert msg.sender == self.owner\n",
    );
    let main = write_contract(
        &temp,
        "main.vy",
        "from . import ownable\n\nuses: ownable\n\n@external\ndef read_owner() -> address:\n    return ownable.owner\n\n@external\ndef guarded():\n    ownable._check_owner()\n",
    );

    let mut loader = ModuleLoader::new(Vec::new());
    let unit = loader.load(&main).unwrap();
    let analysis = Analyzer::new().analyze(&unit);

    let read_owner = analysis.effects("read_owner").unwrap();
    assert_eq!(read_owner.accesses.len(), 1);
    assert_eq!(read_owner.accesses[0].variable, "ownable.owner");
    assert_eq!(read_owner.accesses[0].kind, AccessKind::Read);

    let guarded = analysis.effects("guarded").unwrap();
    let variables: Vec<&str> = guarded
        .accesses
        .iter()
        .map(|a| a.variable.as_str())
        .collect();
    assert_eq!(variables, vec!["msg.sender", "owner"]);
}

#[test]
fn test_interface_file_mutability_is_used() {
    let temp = TempDir::new().unwrap();
    write_contract(
        &temp,
        "interfaces/IPool.vyi",
        "@external\n@view\ndef get_dy(i: int128, j: int128, dx: uint256) -> uint256:\n    ...\n\n@external\n@pure\ndef fee_denominator() -> uint256:\n    ...\n",
    );
    let main = write_contract(
        &temp,
        "router.vy",
        "from interfaces import IPool\n\n@external\ndef quote(pool: IPool, dx: uint256) -> uint256:\n    return staticcall pool.get_dy(0, 1, dx) // staticcall pool.fee_denominator()\n",
    );

    let mut loader = ModuleLoader::new(Vec::new());
    let unit = loader.load(&main).unwrap();
    let analysis = Analyzer::new().analyze(&unit);

    let quote = analysis.effects("quote").unwrap();
    let resolved: Vec<Option<Mutability>> =
        quote.staticcalls.iter().map(|s| s.mutability).collect();
    assert_eq!(resolved, vec![Some(Mutability::View), Some(Mutability::Pure)]);
    assert!(quote.reads_state());
    assert!(!quote.only_pure_staticcalls());
}

#[test]
fn test_unknown_interface_is_unresolved() {
    let temp = TempDir::new().unwrap();
    let main = write_contract(
        &temp,
        "main.vy",
        "@external\ndef probe(target: address) -> uint256:\n    return staticcall IUnknown(target).value()\n",
    );

    let mut loader = ModuleLoader::new(Vec::new());
    let unit = loader.load(&main).unwrap();
    let analysis = Analyzer::new().analyze(&unit);

    let probe = analysis.effects("probe").unwrap();
    assert_eq!(probe.staticcalls[0].mutability, None);
    assert!(probe.reads_state());
}
