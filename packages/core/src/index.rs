//! Lookup indices built during traversal and consulted during reference
//! resolution. They live for exactly one build.

use std::collections::HashMap;

use serde_json::Value;

use crate::json::{SequenceNumber, ValueExt};
use crate::types::NodeType;

/// Entity categories that other entities point at by sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    Line,
    Service,
    Fulfillment,
    Promotion,
    Address,
    Account,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Product,
        EntityKind::Line,
        EntityKind::Service,
        EntityKind::Fulfillment,
        EntityKind::Promotion,
        EntityKind::Address,
        EntityKind::Account,
    ];

    /// The field an entity of this kind carries its own sequence number in.
    pub fn sequence_field(self) -> &'static str {
        match self {
            EntityKind::Product => "productSequenceNumber",
            EntityKind::Line => "lineSequence",
            EntityKind::Service => "serviceSequence",
            EntityKind::Fulfillment => "fulfillmentSequence",
            EntityKind::Promotion => "promotionSequence",
            EntityKind::Address => "addressSequence",
            EntityKind::Account => "accountSequence",
        }
    }

    pub fn node_type(self) -> NodeType {
        match self {
            EntityKind::Product => NodeType::Product,
            EntityKind::Line => NodeType::Line,
            EntityKind::Service => NodeType::Service,
            EntityKind::Fulfillment => NodeType::Fulfillment,
            EntityKind::Promotion => NodeType::Promotion,
            EntityKind::Address => NodeType::Address,
            EntityKind::Account => NodeType::Account,
        }
    }

    /// The indexed kind for a node type, if that type has a bucket.
    pub fn for_node_type(t: &NodeType) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|k| &k.node_type() == t)
    }
}

/// Fields holding a business id, per node type. Checked in order; every
/// present id is indexed.
pub fn id_fields(t: &NodeType) -> &'static [&'static str] {
    match t {
        NodeType::Product => &["productId"],
        NodeType::Line => &["lineId"],
        NodeType::Service => &["serviceId"],
        NodeType::Item => &["id", "itemId"],
        NodeType::Fulfillment => &["fulfillmentId"],
        NodeType::Shipment => &["shipmentId"],
        NodeType::Promotion => &["promotionId"],
        NodeType::Account => &["accountId"],
        NodeType::Customer => &["customerId"],
        _ => &[],
    }
}

/// Sequence-number and business-id lookups for one build.
///
/// Every [`EntityKind`] bucket exists from construction, so inserts never
/// need to check for a missing bucket. A repeated key maps to the node that
/// was recorded last.
#[derive(Debug)]
pub struct Indices {
    sequences: HashMap<EntityKind, HashMap<SequenceNumber, String>>,
    ids: HashMap<String, String>,
}

impl Default for Indices {
    fn default() -> Self {
        Self::new()
    }
}

impl Indices {
    pub fn new() -> Self {
        Self {
            sequences: EntityKind::ALL
                .into_iter()
                .map(|k| (k, HashMap::new()))
                .collect(),
            ids: HashMap::new(),
        }
    }

    pub fn insert_sequence(&mut self, kind: EntityKind, seq: SequenceNumber, node_id: &str) {
        if let Some(bucket) = self.sequences.get_mut(&kind) {
            bucket.insert(seq, node_id.to_string());
        }
    }

    pub fn insert_id(&mut self, business_id: &str, node_id: &str) {
        self.ids.insert(business_id.to_string(), node_id.to_string());
    }

    pub fn sequence(&self, kind: EntityKind, seq: SequenceNumber) -> Option<&str> {
        self.sequences
            .get(&kind)
            .and_then(|bucket| bucket.get(&seq))
            .map(String::as_str)
    }

    pub fn id(&self, business_id: &str) -> Option<&str> {
        self.ids.get(business_id).map(String::as_str)
    }

    /// Record whatever sequence number and business ids `data` carries for a
    /// node of type `t`.
    pub fn record(&mut self, t: &NodeType, data: &Value, node_id: &str) {
        if let Some(kind) = EntityKind::for_node_type(t) {
            if let Some(seq) = data.seq_field(kind.sequence_field()) {
                self.insert_sequence(kind, seq, node_id);
            }
        }
        for field in id_fields(t) {
            if let Some(id) = data.str_field(field) {
                self.insert_id(id, node_id);
            }
        }
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences.values().map(HashMap::len).sum()
    }

    pub fn id_count(&self) -> usize {
        self.ids.len()
    }
}
