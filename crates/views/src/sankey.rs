use std::cmp::Ordering;

use dataset::MergedTable;

use crate::selection::Destination;

/// Default number of source countries in the diagram.
pub const TOP_N: usize = 10;

/// Stable node identifier. Chart layers that address nodes positionally
/// go through `SankeyGraph::position_of` instead of hand-wired indices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyNode {
    pub id: NodeId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
}

/// Two-level flow graph: the top sources feeding one destination node.
/// Node order is contractual: sources in descending value order, the
/// destination appended last.
#[derive(Debug, Clone, PartialEq)]
pub struct SankeyGraph {
    year: i32,
    nodes: Vec<SankeyNode>,
    edges: Vec<SankeyEdge>,
    destination: NodeId,
}

impl SankeyGraph {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn nodes(&self) -> &[SankeyNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SankeyEdge] {
        &self.edges
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    /// Position of a node in the label list.
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.label.as_str()).collect()
    }
}

/// Selects the `n` non-destination countries with the largest value in
/// the selected year; ties keep the merged table's stable row order.
/// Fewer than `n` eligible countries yields a smaller graph, never an
/// error. Returns None when `year` is not a column.
pub fn derive_sankey(
    merged: &MergedTable,
    destination: &Destination,
    year: i32,
    n: usize,
) -> Option<SankeyGraph> {
    let col = merged.year_index(year)?;

    let mut candidates: Vec<(&str, f64)> = merged
        .rows()
        .iter()
        .filter(|row| row.entity != destination.entity())
        .map(|row| (row.entity.as_str(), row.values[col]))
        .collect();
    // Stable sort: equal values keep their first-encountered order.
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    candidates.truncate(n);

    let mut nodes: Vec<SankeyNode> = candidates
        .iter()
        .enumerate()
        .map(|(i, (label, _))| SankeyNode {
            id: NodeId(i as u32),
            label: label.to_string(),
        })
        .collect();
    let destination_id = NodeId(nodes.len() as u32);
    nodes.push(SankeyNode {
        id: destination_id,
        label: destination.entity().to_string(),
    });

    let edges = candidates
        .iter()
        .enumerate()
        .map(|(i, (_, value))| SankeyEdge {
            source: NodeId(i as u32),
            target: destination_id,
            value: *value,
        })
        .collect();

    Some(SankeyGraph {
        year,
        nodes,
        edges,
        destination: destination_id,
    })
}
