//! Core data types for order graphs.
//!
//! This module defines the output structures produced by a build:
//! [`Node`], [`Edge`], [`NodeType`], [`EdgeType`], and [`GraphData`].
//! All types serialise to JSON in the shape a force-directed renderer expects
//! (`{ "nodes": [...], "edges": [...] }`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;

/// The semantic role of a node. Determines rendering colour and which
/// reference rules can target it.
///
/// Serialises as its plain tag string (e.g. `"product"`, `"eventLog"`).
/// Tags outside the known vocabulary round-trip through [`NodeType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    /// The document root.
    Order,
    /// A purchased product (plan, bundle, handset offer).
    Product,
    /// A subscriber line within a product.
    Line,
    /// A physical or logical item delivered with a product.
    Item,
    /// Device details hanging off an item (IMEI, model, ...).
    Device,
    /// A service provisioned on a line.
    Service,
    /// A fulfillment group.
    Fulfillment,
    /// A shipment within a fulfillment.
    Shipment,
    /// A postal or service address.
    Address,
    /// A billing account.
    Account,
    /// The ordering customer.
    Customer,
    /// A promotion or discount.
    Promotion,
    /// A price breakdown.
    Price,
    /// An order status or milestone.
    Status,
    /// The order's event history.
    EventLog,
    /// A generic array container.
    Array,
    /// A generic object or promoted flag.
    Object,
    /// A tag introduced by a classification rule table.
    Custom(String),
}

impl NodeType {
    /// The wire-format tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Order => "order",
            NodeType::Product => "product",
            NodeType::Line => "line",
            NodeType::Item => "item",
            NodeType::Device => "device",
            NodeType::Service => "service",
            NodeType::Fulfillment => "fulfillment",
            NodeType::Shipment => "shipment",
            NodeType::Address => "address",
            NodeType::Account => "account",
            NodeType::Customer => "customer",
            NodeType::Promotion => "promotion",
            NodeType::Price => "price",
            NodeType::Status => "status",
            NodeType::EventLog => "eventLog",
            NodeType::Array => "array",
            NodeType::Object => "object",
            NodeType::Custom(tag) => tag,
        }
    }

    /// Human-facing name used as a label prefix (e.g. `"Product"`).
    pub fn title(&self) -> String {
        match self {
            NodeType::EventLog => "Event Log".into(),
            other => {
                let tag = other.as_str();
                let mut chars = tag.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "order" => NodeType::Order,
            "product" => NodeType::Product,
            "line" => NodeType::Line,
            "item" => NodeType::Item,
            "device" => NodeType::Device,
            "service" => NodeType::Service,
            "fulfillment" => NodeType::Fulfillment,
            "shipment" => NodeType::Shipment,
            "address" => NodeType::Address,
            "account" => NodeType::Account,
            "customer" => NodeType::Customer,
            "promotion" => NodeType::Promotion,
            "price" => NodeType::Price,
            "status" => NodeType::Status,
            "eventLog" => NodeType::EventLog,
            "array" => NodeType::Array,
            "object" => NodeType::Object,
            _ => NodeType::Custom(s),
        }
    }
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        NodeType::from(s.to_string())
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        match t {
            NodeType::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

/// Formats the type as its wire-format tag (e.g. `"eventLog"`).
impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of relation an [`Edge`] expresses.
///
/// Serialises as a lowercase string (e.g. `"reference"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Containment: structural parent to child.
    Default,
    /// Ordering between consecutive siblings of a sequenced collection.
    Sequence,
    /// Cross-entity pointer via a sequence number or business id.
    Reference,
    /// Supersession: the new entity points at the one it replaces.
    Amendment,
}

/// Formats the edge type as its lowercase wire-format string.
impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeType::Default => write!(f, "default"),
            EdgeType::Sequence => write!(f, "sequence"),
            EdgeType::Reference => write!(f, "reference"),
            EdgeType::Amendment => write!(f, "amendment"),
        }
    }
}

/// Parses an [`EdgeType`] from its lowercase wire-format string.
impl std::str::FromStr for EdgeType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(EdgeType::Default),
            "sequence" => Ok(EdgeType::Sequence),
            "reference" => Ok(EdgeType::Reference),
            "amendment" => Ok(EdgeType::Amendment),
            _ => Err(format!(
                "unknown edge type {:?}; expected one of: \
                 default, sequence, reference, amendment",
                s
            )),
        }
    }
}

/// One visualisable unit of an order document.
///
/// Ids are assigned in traversal order (`n0` is the root) and never derived
/// from content, so two identical sub-documents still get distinct nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Build-unique id, e.g. `"n3"`.
    pub id: String,

    /// Short human-readable summary.
    pub label: String,

    /// Semantic tag.
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Containment distance from the root.
    pub depth: usize,

    /// The JSON fragment this node was derived from, kept verbatim.
    pub data: Value,

    /// Status or milestone sub-object found on `data`, for border cues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

/// A directed relation between two node ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }
}

/// The result of a build: nodes in creation order, edges in append order
/// (containment, then sequence, then reference and amendment).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphData {
    /// Serialise to compact JSON.
    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string(self).map_err(|e| GraphError::Unknown(e.to_string()))
    }

    /// Serialise to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::Unknown(e.to_string()))
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_type_tags_roundtrip() {
        for tag in ["order", "eventLog", "shipment", "array"] {
            let t = NodeType::from(tag);
            assert!(!matches!(t, NodeType::Custom(_)), "{tag} should be known");
            assert_eq!(t.to_string(), tag);
        }
        assert_eq!(NodeType::from("simCard"), NodeType::Custom("simCard".into()));
    }

    #[test]
    fn node_type_title() {
        assert_eq!(NodeType::Product.title(), "Product");
        assert_eq!(NodeType::EventLog.title(), "Event Log");
        assert_eq!(NodeType::Custom("simCard".into()).title(), "SimCard");
    }

    #[test]
    fn edge_type_parse() {
        assert_eq!("amendment".parse::<EdgeType>(), Ok(EdgeType::Amendment));
        assert!("parent".parse::<EdgeType>().is_err());
    }

    #[test]
    fn node_serialises_with_type_field_and_no_null_status() {
        let node = Node {
            id: "n1".into(),
            label: "Address #5".into(),
            node_type: NodeType::Address,
            depth: 1,
            data: json!({ "addressSequence": 5 }),
            status: None,
        };
        let v = serde_json::to_value(&node).unwrap();
        assert_eq!(v["type"], "address");
        assert!(v.get("status").is_none());

        let back: Node = serde_json::from_value(v).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn edge_serialises_lowercase_type() {
        let e = Edge::new("n0", "n1", EdgeType::Default);
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v, json!({ "source": "n0", "target": "n1", "type": "default" }));
    }
}
