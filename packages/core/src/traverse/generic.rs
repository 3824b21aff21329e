//! Schema-free walk: every object and array becomes a node, scalars stay in
//! their parent's `data`.

use serde_json::Value;

use crate::json::{scalar_text, ValueExt};
use crate::rules::ClassificationRules;
use crate::types::NodeType;

use super::BuildContext;

/// Candidate fields for ordering array elements, tried in this order. The
/// first one that every element carries as a number wins.
const SEQUENCE_CANDIDATES: &[&str] = &[
    "sequenceNumber",
    "productSequenceNumber",
    "lineSequence",
    "serviceSequence",
    "fulfillmentSequence",
    "shipmentSequence",
    "promotionSequence",
    "addressSequence",
    "accountSequence",
    "sequence",
];

/// Fields that usually identify an object, for labels.
const IDENTIFYING_KEYS: &[&str] = &[
    "name",
    "orderId",
    "productId",
    "productName",
    "id",
    "itemId",
    "eventType",
    "code",
    "type",
];

/// Walk `value` under `parent`. Returns the created node's id, or `None`
/// for scalars, which are never materialised.
pub(crate) fn walk(
    ctx: &mut BuildContext,
    rules: &ClassificationRules,
    parent: Option<&str>,
    depth: usize,
    key: Option<&str>,
    value: &Value,
) -> Option<String> {
    match value {
        Value::Object(fields) => {
            let node_type = rules.classify(value);
            let label = object_label(&node_type, key, value);
            let id = ctx.add_node(parent, depth, node_type, label, value);
            ctx.mark_expanded(&id);
            for (k, v) in fields {
                walk(ctx, rules, Some(&id), depth + 1, Some(k.as_str()), v);
            }
            Some(id)
        }
        Value::Array(elements) => {
            let label = match key {
                Some(k) => format!("{k} [{}]", elements.len()),
                None => format!("[{}]", elements.len()),
            };
            let id = ctx.add_node(parent, depth, NodeType::Array, label, value);
            ctx.mark_expanded(&id);

            let mut created: Vec<(String, &Value)> = Vec::with_capacity(elements.len());
            for element in elements {
                if let Some(child) = walk(ctx, rules, Some(&id), depth + 1, key, element) {
                    created.push((child, element));
                }
            }

            // Chains only make sense when every element became an object node.
            if created.len() == elements.len() && elements.iter().all(Value::is_object) {
                if let Some(field) = sequence_field(elements) {
                    ctx.link_sequence(created.iter().map(|(id, v)| (id.as_str(), *v)), field);
                }
            }
            Some(id)
        }
        _ => None,
    }
}

fn sequence_field(elements: &[Value]) -> Option<&'static str> {
    SEQUENCE_CANDIDATES
        .iter()
        .copied()
        .find(|field| elements.iter().all(|e| e.seq_field(field).is_some()))
}

fn object_label(node_type: &NodeType, key: Option<&str>, value: &Value) -> String {
    let title = match (node_type, key) {
        (NodeType::Object, Some(k)) => k.to_string(),
        (t, _) => t.title(),
    };
    let ident = value.first_text(IDENTIFYING_KEYS).or_else(|| {
        SEQUENCE_CANDIDATES
            .iter()
            .find_map(|f| value.field(f).and_then(scalar_text))
            .map(|s| format!("#{s}"))
    });
    match ident {
        Some(ident) => format!("{title} {ident}"),
        None => title,
    }
}

// --- tests -------------------------------------------------------------------
