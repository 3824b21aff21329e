//! Classification rules for the generic traversal.
//!
//! A rule table is an ordered list of `(predicate, type)` pairs. Objects are
//! tested against each rule in turn; the first match decides the node type,
//! and objects that match nothing are typed `object`. Several marker keys can
//! co-occur on one object (a line may carry an `addressSequence`), so order
//! matters.
//!
//! Tables are plain data and load from JSON:
//!
//! ```json
//! [
//!   { "type": "order",   "when": { "hasKey": "orderId" } },
//!   { "type": "simCard", "when": { "hasAllKeys": ["iccid", "imsi"] } },
//!   { "type": "status",  "when": { "keyEquals": { "key": "kind", "value": "milestone" } } }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;
use crate::json::ValueExt;
use crate::types::NodeType;

/// A test applied to a JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    /// The object has this key (any value, including null).
    HasKey(String),
    /// The object has every one of these keys.
    HasAllKeys(Vec<String>),
    /// The object has at least one of these keys.
    HasAnyKey(Vec<String>),
    /// The object's `key` equals `value` exactly.
    KeyEquals { key: String, value: Value },
}

impl Predicate {
    pub fn matches(&self, v: &Value) -> bool {
        let Some(obj) = v.object() else {
            return false;
        };
        match self {
            Predicate::HasKey(k) => obj.contains_key(k),
            Predicate::HasAllKeys(keys) => keys.iter().all(|k| obj.contains_key(k)),
            Predicate::HasAnyKey(keys) => keys.iter().any(|k| obj.contains_key(k)),
            Predicate::KeyEquals { key, value } => obj.get(key) == Some(value),
        }
    }
}

/// One `(predicate, tag)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub when: Predicate,
}

impl Rule {
    pub fn new(node_type: NodeType, when: Predicate) -> Self {
        Self { node_type, when }
    }
}

/// An ordered rule table. First match wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ClassificationRules {
    rules: Vec<Rule>,
}

impl ClassificationRules {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Load a table from a JSON array of rules.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(|e| GraphError::Options(e.to_string()))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Type for a JSON value: `array` for arrays, the first matching rule's
    /// tag for objects, `object` otherwise.
    pub fn classify(&self, v: &Value) -> NodeType {
        if v.is_array() {
            return NodeType::Array;
        }
        self.rules
            .iter()
            .find(|r| r.when.matches(v))
            .map(|r| r.node_type.clone())
            .unwrap_or(NodeType::Object)
    }
}

impl Default for ClassificationRules {
    /// Entities carry other entities' sequence numbers as references (a
    /// service names its line, a product its account), so a marker ranks
    /// above every marker its owner may hold as a reference.
    fn default() -> Self {
        let key = |k: &str| Predicate::HasKey(k.to_string());
        let any = |ks: &[&str]| Predicate::HasAnyKey(ks.iter().map(|k| k.to_string()).collect());
        let all = |ks: &[&str]| Predicate::HasAllKeys(ks.iter().map(|k| k.to_string()).collect());

        Self::new(vec![
            Rule::new(NodeType::Order, key("orderId")),
            Rule::new(NodeType::Product, key("productId")),
            Rule::new(NodeType::Shipment, key("shipmentSequence")),
            Rule::new(NodeType::Item, any(&["itemId", "deviceDetails"])),
            Rule::new(NodeType::Item, all(&["id", "sequenceNumber"])),
            Rule::new(NodeType::Device, key("imei")),
            Rule::new(NodeType::Service, key("serviceSequence")),
            Rule::new(NodeType::Line, key("lineSequence")),
            Rule::new(NodeType::Fulfillment, key("fulfillmentSequence")),
            Rule::new(NodeType::Product, key("productSequenceNumber")),
            Rule::new(
                NodeType::Promotion,
                any(&["promotionId", "promotionCode", "promotionName"]),
            ),
            Rule::new(NodeType::Customer, key("customerId")),
            Rule::new(NodeType::Account, key("accountSequence")),
            Rule::new(NodeType::Address, key("addressSequence")),
            Rule::new(NodeType::EventLog, key("eventType")),
            Rule::new(NodeType::Status, any(&["milestone", "statusCode"])),
        ])
    }
}

// --- tests -------------------------------------------------------------------
