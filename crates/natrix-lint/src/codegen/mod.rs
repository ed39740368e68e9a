//! Code Generation
//!
//! - [`generate_exports`]: an explicit `exports:` declaration covering a
//!   contract's external surface
//! - [`generate_call_graph`]: a Mermaid flowchart of internal and module calls

pub mod call_graph;
pub mod exports;

pub use call_graph::generate_call_graph;
pub use exports::generate_exports;

use crate::Result;
use crate::resolver::{ModuleLoader, SourceUnit};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn load_unit(path: &Path, extra_paths: &[PathBuf]) -> Result<Arc<SourceUnit>> {
    ModuleLoader::new(extra_paths.to_vec()).load(path)
}
