//! Interfaces shipped with the compiler under `ethereum.ercs`

use crate::ast::{InterfaceDef, InterfaceFunction, Mutability, Span};

use Mutability::{Nonpayable, Payable, View};

const IERC20: &[(&str, Mutability)] = &[
    ("totalSupply", View),
    ("balanceOf", View),
    ("allowance", View),
    ("transfer", Nonpayable),
    ("transferFrom", Nonpayable),
    ("approve", Nonpayable),
];

const IERC20_DETAILED: &[(&str, Mutability)] =
    &[("name", View), ("symbol", View), ("decimals", View)];

const IERC165: &[(&str, Mutability)] = &[("supportsInterface", View)];

const IERC721: &[(&str, Mutability)] = &[
    ("supportsInterface", View),
    ("balanceOf", View),
    ("ownerOf", View),
    ("getApproved", View),
    ("isApprovedForAll", View),
    ("transferFrom", Payable),
    ("safeTransferFrom", Payable),
    ("approve", Payable),
    ("setApprovalForAll", Nonpayable),
];

const IERC4626: &[(&str, Mutability)] = &[
    ("asset", View),
    ("totalAssets", View),
    ("convertToShares", View),
    ("convertToAssets", View),
    ("maxDeposit", View),
    ("previewDeposit", View),
    ("maxMint", View),
    ("previewMint", View),
    ("maxWithdraw", View),
    ("previewWithdraw", View),
    ("maxRedeem", View),
    ("previewRedeem", View),
    ("deposit", Nonpayable),
    ("mint", Nonpayable),
    ("withdraw", Nonpayable),
    ("redeem", Nonpayable),
];

/// Dotted prefix under which the built-in interfaces are imported
pub const ERCS_PACKAGE: &str = "ethereum.ercs";

/// Look up a built-in interface by its import path (`ethereum.ercs.IERC20`)
pub fn builtin_interface(import_path: &str) -> Option<InterfaceDef> {
    let name = import_path.strip_prefix(ERCS_PACKAGE)?.strip_prefix('.')?;
    let functions = match name {
        "IERC20" => IERC20,
        "IERC20Detailed" => IERC20_DETAILED,
        "IERC165" => IERC165,
        "IERC721" => IERC721,
        "IERC4626" => IERC4626,
        _ => return None,
    };
    Some(InterfaceDef {
        name: name.to_string(),
        functions: functions
            .iter()
            .map(|(name, mutability)| InterfaceFunction {
                name: (*name).to_string(),
                mutability: *mutability,
            })
            .collect(),
        span: Span::default(),
    })
}
