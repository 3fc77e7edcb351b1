//! PERT rewrite: `task: duration` and `a --> b` lines to a Mermaid flowchart.

use std::fmt::Write as _;

use indexmap::IndexMap;

use super::NormalizeError;

const ARROW: &str = "-->";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PertNode {
    pub label: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PertEdge {
    pub from: String,
    pub to: String,
}

/// Tasks and dependencies read from `task: duration` and `a --> b` lines.
///
/// Nodes are keyed by the task text with all whitespace removed. A repeated
/// id keeps its first position but takes the label and duration of the last
/// line that declared it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PertGraph {
    pub nodes: IndexMap<String, PertNode>,
    pub edges: Vec<PertEdge>,
}

impl PertGraph {
    pub fn parse(text: &str) -> Self {
        let mut graph = Self::default();

        for line in text.lines() {
            if let Some((task, duration)) = line.split_once(':') {
                let task = task.trim();
                graph.nodes.insert(
                    node_id(task),
                    PertNode {
                        label: task.to_string(),
                        duration: duration.trim().to_string(),
                    },
                );
            } else if line.contains(ARROW) {
                // a chained `a --> b --> c` only contributes its first hop
                let mut hops = line.trim().split(ARROW);
                if let (Some(from), Some(to)) = (hops.next(), hops.next()) {
                    graph.edges.push(PertEdge {
                        from: node_id(from),
                        to: node_id(to),
                    });
                }
            }
        }

        graph
    }

    /// Emit a left-to-right flowchart: node declarations, plain edges, then
    /// edges labelled with the target's duration in days.
    pub fn render(&self) -> Result<String, NormalizeError> {
        let mut out = String::from("graph LR\n");

        for (id, node) in &self.nodes {
            let _ = writeln!(out, "    {id}[{}]", node.label);
        }

        for edge in &self.edges {
            let _ = writeln!(out, "    {} --> {}", edge.from, edge.to);
        }

        for edge in &self.edges {
            let target = self
                .nodes
                .get(&edge.to)
                .ok_or_else(|| NormalizeError::DanglingEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                })?;
            let _ = writeln!(
                out,
                "    {} -- {}d --> {}",
                edge.from, target.duration, edge.to
            );
        }

        Ok(out)
    }
}

/// Rewrite informal PERT notation into Mermaid graph syntax.
pub fn rewrite_pert(text: &str) -> Result<String, NormalizeError> {
    PertGraph::parse(text).render()
}

fn node_id(task: &str) -> String {
    task.split_whitespace().collect()
}
