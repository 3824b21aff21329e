//! Reference resolution: the pass after traversal that turns sequence
//! numbers and business ids embedded in node data into `reference` and
//! `amendment` edges.
//!
//! It runs once every node exists, because documents freely point forward
//! (a line names an address that appears later in the file). It only reads
//! the indices and only appends edges. Anything that does not resolve is
//! skipped without error.

use std::collections::HashSet;

use serde_json::Value;
use tracing::trace;

use crate::index::{EntityKind, Indices};
use crate::json::{as_sequence, ValueExt};
use crate::traverse::domain::MATERIALISED_KEYS;
use crate::types::{Edge, EdgeType, Node, NodeType};

/// Fields holding a sequence number that points at another entity.
const REFERENCE_FIELDS: &[(&str, EntityKind)] = &[
    ("accountSequence", EntityKind::Account),
    ("addressSequence", EntityKind::Address),
    ("serviceAddressSequence", EntityKind::Address),
    ("billingAddressSequence", EntityKind::Address),
    ("shippingAddressSequence", EntityKind::Address),
    ("fulfillmentSequence", EntityKind::Fulfillment),
    ("lineSequence", EntityKind::Line),
    ("serviceSequence", EntityKind::Service),
    ("promotionSequence", EntityKind::Promotion),
];

/// Compute every cross-reference edge for `nodes`, in node order.
///
/// `expanded` names the nodes whose nested objects and arrays are nodes of
/// their own. Those never scan for price adjustments: each adjustment there
/// is a node and resolves through its own `promotionSequence`.
pub(crate) fn resolve(
    nodes: &[Node],
    indices: &Indices,
    expanded: &HashSet<String>,
) -> Vec<Edge> {
    let mut out = EdgeSink::default();

    for node in nodes {
        let scan_prices = !expanded.contains(&node.id);
        for record in records(node) {
            sequence_fields(node, record, indices, &mut out);
            if scan_prices {
                price_adjustments(node, record, indices, &mut out);
            }
            amendments(record, indices, &mut out);
        }

        match node.node_type {
            NodeType::Line => item_sequences(node, indices, &mut out),
            NodeType::Fulfillment => product_sequences(node, indices, &mut out),
            _ => {}
        }
    }

    out.edges
}

/// The objects a node's data contributes: the object itself, or each object
/// element of a list-valued entity (price totals, event logs). Generic
/// `array` containers contribute nothing; their elements are nodes already.
fn records(node: &Node) -> Vec<&Value> {
    match &node.data {
        Value::Object(_) => vec![&node.data],
        Value::Array(elements) if node.node_type != NodeType::Array => {
            elements.iter().filter(|e| e.is_object()).collect()
        }
        _ => Vec::new(),
    }
}

fn sequence_fields(node: &Node, record: &Value, indices: &Indices, out: &mut EdgeSink) {
    for (field, kind) in REFERENCE_FIELDS {
        let Some(seq) = record.seq_field(field) else {
            continue;
        };
        match indices.sequence(*kind, seq) {
            Some(target) => out.push(&node.id, target, EdgeType::Reference),
            None => trace!(node = %node.id, field, seq, "unresolved sequence reference"),
        }
    }
}

/// `prices[].adjustments[].promotionSequence`, wherever a `prices` list sits
/// inside the record short of a child node. Price-typed nodes hold a bare
/// list of prices.
fn price_adjustments(node: &Node, record: &Value, indices: &Indices, out: &mut EdgeSink) {
    let mut promotions = Vec::new();
    if node.node_type == NodeType::Price {
        adjustment_promotions(record, &mut promotions);
    }
    collect_price_promotions(record, &mut promotions);

    for seq in promotions {
        match indices.sequence(EntityKind::Promotion, seq) {
            Some(target) => out.push(&node.id, target, EdgeType::Reference),
            None => trace!(node = %node.id, seq, "unresolved promotion adjustment"),
        }
    }
}

fn collect_price_promotions(v: &Value, acc: &mut Vec<i64>) {
    match v {
        Value::Object(fields) => {
            for price in v.array_field("prices").into_iter().flatten() {
                adjustment_promotions(price, acc);
            }
            for (key, child) in fields {
                if key != "prices" && !MATERIALISED_KEYS.contains(&key.as_str()) {
                    collect_price_promotions(child, acc);
                }
            }
        }
        Value::Array(elements) => {
            for element in elements {
                collect_price_promotions(element, acc);
            }
        }
        _ => {}
    }
}

fn adjustment_promotions(price: &Value, acc: &mut Vec<i64>) {
    for adjustment in price.array_field("adjustments").into_iter().flatten() {
        if let Some(seq) = adjustment.seq_field("promotionSequence") {
            acc.push(seq);
        }
    }
}

/// `amendedDetails: [{ newId, oldId }]` links the replacement to the entity
/// it supersedes.
fn amendments(record: &Value, indices: &Indices, out: &mut EdgeSink) {
    for pair in record.array_field("amendedDetails").into_iter().flatten() {
        let (Some(new_id), Some(old_id)) = (pair.str_field("newId"), pair.str_field("oldId"))
        else {
            continue;
        };
        match (indices.id(new_id), indices.id(old_id)) {
            (Some(source), Some(target)) => out.push(source, target, EdgeType::Amendment),
            _ => trace!(new_id, old_id, "unresolved amendment"),
        }
    }
}

/// Lines list their items by business id, not by sequence number.
fn item_sequences(node: &Node, indices: &Indices, out: &mut EdgeSink) {
    for item in node.data.array_field("itemSequences").into_iter().flatten() {
        let Some(item_id) = item.as_str() else {
            continue;
        };
        match indices.id(item_id) {
            Some(target) => out.push(&node.id, target, EdgeType::Reference),
            None => trace!(node = %node.id, item_id, "unresolved item reference"),
        }
    }
}

/// Fulfillments list the products they cover as numeric strings.
fn product_sequences(node: &Node, indices: &Indices, out: &mut EdgeSink) {
    let Some(raw) = node.data.field("productSequenceNumber") else {
        return;
    };
    let values: Vec<&Value> = match raw {
        Value::Array(elements) => elements.iter().collect(),
        other => vec![other],
    };

    for v in values {
        let seq = match v {
            Value::String(s) => s.trim().parse::<i64>().ok(),
            other => as_sequence(other),
        };
        let Some(seq) = seq else {
            continue;
        };
        match indices.sequence(EntityKind::Product, seq) {
            Some(target) => out.push(&node.id, target, EdgeType::Reference),
            None => trace!(node = %node.id, seq, "unresolved product reference"),
        }
    }
}

/// Collects edges, dropping self-loops and exact repeats.
#[derive(Default)]
struct EdgeSink {
    seen: HashSet<Edge>,
    edges: Vec<Edge>,
}

impl EdgeSink {
    fn push(&mut self, source: &str, target: &str, edge_type: EdgeType) {
        if source == target {
            return;
        }
        let edge = Edge::new(source, target, edge_type);
        if self.seen.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }
}

// --- tests -------------------------------------------------------------------
