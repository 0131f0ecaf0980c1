use anyhow::Result;
use log2::info;
use petgraph::dot::{Config, Dot};
use petgraph::graphmap::DiGraphMap;
use std::path::Path;

use crate::crawler::TerminalRecord;

const ARTICLE_PREFIX: &str = "/wiki/";

/// Graphviz-friendly node name: article prefix and every non-letter removed
pub fn node_name(link: &str) -> String {
    link.replace(ARTICLE_PREFIX, "")
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect()
}

/// Node names of every winning path, in path order
pub fn win_node_names(records: &[TerminalRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .filter(|record| record.is_win())
        .map(|record| record.path().iter().map(|link| node_name(link)).collect())
        .collect()
}

/// One edge per consecutive pair; repeated edges collapse into one
pub fn build_win_graph(paths: &[Vec<String>]) -> DiGraphMap<&str, &str> {
    let mut graph = DiGraphMap::new();
    for nodes in paths {
        for pair in nodes.windows(2) {
            graph.add_edge(pair[0].as_str(), pair[1].as_str(), "");
        }
    }
    graph
}

/// Renders the winning paths as a DOT digraph, e.g. `dot -Tpng graph.dot -o graph.png`
pub fn render_dot(records: &[TerminalRecord]) -> String {
    let paths = win_node_names(records);
    let graph = build_win_graph(&paths);
    format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
}

pub fn write_dot_file(records: &[TerminalRecord], path: &Path) -> Result<()> {
    std::fs::write(path, render_dot(records))?;
    info!("Graph written to {:?}", path);
    Ok(())
}
