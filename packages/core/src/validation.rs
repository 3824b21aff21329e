use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::types::{EdgeType, GraphData};

/// Structural problems [`check_graph`] can find in a graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    #[error("node id {0:?} is used more than once")]
    DuplicateId(String),

    #[error("edge {index} ({from} -> {to}) points at a node that does not exist")]
    DanglingEdge { index: usize, from: String, to: String },

    #[error("node {0:?} has no containment parent")]
    MissingParent(String),

    #[error("node {0:?} has {1} containment parents; expected exactly one")]
    MultipleParents(String, usize),

    #[error("root node {0:?} must not have a containment parent")]
    ContainedRoot(String),

    #[error("{0} edge on node {1:?} points at itself")]
    SelfLoop(EdgeType, String),

    #[error("node {0:?} has more than one {1} sequence edge")]
    BranchingSequence(String, &'static str),
}

/// Check a graph against the structural guarantees every build makes.
///
/// Returns `Ok(())` if the graph is well-formed, or the first
/// [`InvariantError`] found. Checks run in this order: id uniqueness,
/// dangling edges, containment, self-loops, sequence chains.
pub fn check_graph(graph: &GraphData) -> Result<(), InvariantError> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(InvariantError::DuplicateId(node.id.clone()));
        }
    }

    for (index, edge) in graph.edges.iter().enumerate() {
        if !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()) {
            return Err(InvariantError::DanglingEdge {
                index,
                from: edge.source.clone(),
                to: edge.target.clone(),
            });
        }
    }

    let mut parents: HashMap<&str, usize> = HashMap::new();
    for edge in graph.edges_of_type(EdgeType::Default) {
        *parents.entry(edge.target.as_str()).or_default() += 1;
    }
    for (i, node) in graph.nodes.iter().enumerate() {
        let count = parents.get(node.id.as_str()).copied().unwrap_or(0);
        let is_root = i == 0;
        match count {
            0 if is_root => {}
            _ if is_root => return Err(InvariantError::ContainedRoot(node.id.clone())),
            1 => {}
            0 => return Err(InvariantError::MissingParent(node.id.clone())),
            n => return Err(InvariantError::MultipleParents(node.id.clone(), n)),
        }
    }

    for edge in &graph.edges {
        let checked = matches!(edge.edge_type, EdgeType::Reference | EdgeType::Amendment);
        if checked && edge.source == edge.target {
            return Err(InvariantError::SelfLoop(edge.edge_type, edge.source.clone()));
        }
    }

    let mut out_degree: HashSet<&str> = HashSet::new();
    let mut in_degree: HashSet<&str> = HashSet::new();
    for edge in graph.edges_of_type(EdgeType::Sequence) {
        if !out_degree.insert(edge.source.as_str()) {
            return Err(InvariantError::BranchingSequence(edge.source.clone(), "outgoing"));
        }
        if !in_degree.insert(edge.target.as_str()) {
            return Err(InvariantError::BranchingSequence(edge.target.clone(), "incoming"));
        }
    }

    Ok(())
}

// --- tests -------------------------------------------------------------------
