//! Mermaid call graph generation

use super::load_unit;
use crate::analysis::Analyzer;
use crate::{NatrixError, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

const BASE_RANK_SPACING: usize = 150;
const RANK_SPACING_PER_NODE: usize = 10;
const MAX_RANK_SPACING: usize = 800;
const NODE_SPACING: usize = 100;

type CallGraph = Vec<(String, Vec<String>)>;

/// Generate a Mermaid flowchart of the calls made by the contract at `path`
///
/// With `target`, only the functions reachable from it are drawn.
pub fn generate_call_graph(
    path: &Path,
    extra_paths: &[PathBuf],
    target: Option<&str>,
) -> Result<String> {
    let unit = load_unit(path, extra_paths)?;
    let analysis = Analyzer::new().analyze(&unit);
    let full: CallGraph = analysis
        .call_graph()
        .iter()
        .map(|(name, sites)| (name.clone(), sites.iter().map(|s| s.label()).collect()))
        .collect();

    let graph = match target {
        Some(function) => {
            if !full.iter().any(|(name, _)| name == function) {
                return Err(NatrixError::UnknownFunction {
                    file: path.to_path_buf(),
                    function: function.to_string(),
                });
            }
            reachable(&full, function)
        }
        None => full,
    };
    Ok(render(&graph))
}

/// Sub-graph reachable from `root`, in depth-first preorder
fn reachable(full: &CallGraph, root: &str) -> CallGraph {
    let index: HashMap<&str, &Vec<String>> =
        full.iter().map(|(name, calls)| (name.as_str(), calls)).collect();
    let mut visited = HashSet::new();
    let mut graph = Vec::new();
    visit(root, &index, &mut visited, &mut graph);
    graph
}

fn visit<'a>(
    function: &'a str,
    index: &HashMap<&'a str, &'a Vec<String>>,
    visited: &mut HashSet<&'a str>,
    graph: &mut CallGraph,
) {
    let Some(calls) = index.get(function).copied() else {
        return;
    };
    if !visited.insert(function) {
        return;
    }
    graph.push((function.to_string(), calls.clone()));
    for callee in calls {
        visit(callee, index, visited, graph);
    }
}

fn render(graph: &CallGraph) -> String {
    let nodes: BTreeSet<&str> = graph
        .iter()
        .flat_map(|(name, calls)| std::iter::once(name).chain(calls))
        .map(String::as_str)
        .collect();
    let rank_spacing =
        (BASE_RANK_SPACING + nodes.len() * RANK_SPACING_PER_NODE).min(MAX_RANK_SPACING);

    let mut lines = vec![
        "%%{init: {".to_string(),
        "  \"flowchart\": {".to_string(),
        format!("    \"nodeSpacing\": {NODE_SPACING},"),
        format!("    \"rankSpacing\": {rank_spacing}"),
        "  }".to_string(),
        "}}%%".to_string(),
        "flowchart TD".to_string(),
    ];

    let ids: HashMap<&str, String> = nodes
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, format!("N{i}")))
        .collect();
    for name in &nodes {
        lines.push(format!("    {}[\"{name}\"]", ids[name]));
    }
    for (name, calls) in graph {
        for callee in calls {
            lines.push(format!(
                "    {} --> {}",
                ids[name.as_str()],
                ids[callee.as_str()]
            ));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONTRACT: &str = r"
@internal
def _b():
    pass

@internal
def _a():
    self._b()

@external
def run():
    self._a()
    self._b()
    self._a()

@external
def other():
    pass
";

    fn contract() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("flow.vy");
        fs::write(&path, CONTRACT).unwrap();
        (temp, path)
    }

    #[test]
    fn test_full_graph() {
        let (_temp, path) = contract();
        let output = generate_call_graph(&path, &[], None).unwrap();
        let expected = [
            "%%{init: {",
            "  \"flowchart\": {",
            "    \"nodeSpacing\": 100,",
            "    \"rankSpacing\": 190",
            "  }",
            "}}%%",
            "flowchart TD",
            "    N0[\"_a\"]",
            "    N1[\"_b\"]",
            "    N2[\"other\"]",
            "    N3[\"run\"]",
            "    N0 --> N1",
            "    N3 --> N0",
            "    N3 --> N1",
        ]
        .join("\n");
        assert_eq!(output, expected);
    }

    #[test]
    fn test_target_restricts_graph() {
        let (_temp, path) = contract();
        let output = generate_call_graph(&path, &[], Some("_a")).unwrap();
        assert!(output.contains("    \"rankSpacing\": 170"));
        assert!(output.ends_with("    N0[\"_a\"]\n    N1[\"_b\"]\n    N0 --> N1"));
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let (_temp, path) = contract();
        let result = generate_call_graph(&path, &[], Some("missing"));
        assert!(matches!(result, Err(NatrixError::UnknownFunction { .. })));
    }
}
