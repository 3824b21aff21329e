//! Structural traversal: turns a parsed document into nodes and containment
//! edges, recording lookup indices on the way.
//!
//! Two walks share one [`BuildContext`]:
//!
//! - [`domain`] knows the order schema (`products`, `lines`, `fulfillments`,
//!   ...) and produces one labelled node per business entity.
//! - [`generic`] knows nothing about field names and classifies objects with
//!   a [`ClassificationRules`](crate::rules::ClassificationRules) table. The
//!   domain walk hands it any top-level region it does not recognise.
//!
//! Creation is pre-order, depth-first, in document field order, and that
//! order alone decides node ids.

pub(crate) mod domain;
pub(crate) mod generic;

use std::collections::HashSet;

use serde_json::Value;

use crate::index::Indices;
use crate::json::{SequenceNumber, ValueExt};
use crate::types::{Edge, EdgeType, GraphData, Node, NodeType};

/// Mutable state for exactly one build. Nothing here outlives the call,
/// so concurrent builds cannot observe each other's ids or indices.
#[derive(Debug, Default)]
pub(crate) struct BuildContext {
    next_id: usize,
    nodes: Vec<Node>,
    containment: Vec<Edge>,
    sequence: Vec<Edge>,
    expanded: HashSet<String>,
    pub(crate) indices: Indices,
}

/// What the traversal phase hands to reference resolution.
#[derive(Debug)]
pub(crate) struct Traversal {
    pub(crate) graph: GraphData,
    pub(crate) indices: Indices,
    /// Nodes whose nested objects and arrays all became nodes themselves.
    pub(crate) expanded: HashSet<String>,
}

impl BuildContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Create a node, link it to `parent`, and index its sequence number and
    /// business ids. Returns the new node's id.
    pub(crate) fn add_node(
        &mut self,
        parent: Option<&str>,
        depth: usize,
        node_type: NodeType,
        label: String,
        data: &Value,
    ) -> String {
        let id = format!("n{}", self.next_id);
        self.next_id += 1;

        self.indices.record(&node_type, data, &id);

        let status = data
            .object_field("status")
            .or_else(|| data.object_field("milestone"))
            .cloned();

        self.nodes.push(Node {
            id: id.clone(),
            label,
            node_type,
            depth,
            data: data.clone(),
            status,
        });

        if let Some(parent) = parent {
            self.containment
                .push(Edge::new(parent, id.as_str(), EdgeType::Default));
        }

        id
    }

    /// Chain siblings in ascending order of `field`.
    ///
    /// Only applies when there are at least two siblings and every one of
    /// them carries a numeric `field`. Ties keep their document order.
    pub(crate) fn link_sequence<'a>(
        &mut self,
        siblings: impl IntoIterator<Item = (&'a str, &'a Value)>,
        field: &str,
    ) {
        let mut ordered: Vec<(SequenceNumber, &str)> = Vec::new();
        for (id, data) in siblings {
            match data.seq_field(field) {
                Some(seq) => ordered.push((seq, id)),
                None => return,
            }
        }
        if ordered.len() < 2 {
            return;
        }

        // `sort_by_key` is stable.
        ordered.sort_by_key(|(seq, _)| *seq);
        for pair in ordered.windows(2) {
            self.sequence
                .push(Edge::new(pair[0].1, pair[1].1, EdgeType::Sequence));
        }
    }

    /// Mark `id` as having every nested object and array materialised as
    /// a node of its own.
    pub(crate) fn mark_expanded(&mut self, id: &str) {
        self.expanded.insert(id.to_string());
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Close the traversal phase: containment edges first, then sequence
    /// edges. Reference resolution appends after this.
    pub(crate) fn finish(self) -> Traversal {
        let mut edges = self.containment;
        edges.extend(self.sequence);
        Traversal {
            graph: GraphData {
                nodes: self.nodes,
                edges,
            },
            indices: self.indices,
            expanded: self.expanded,
        }
    }
}

// --- tests -------------------------------------------------------------------
