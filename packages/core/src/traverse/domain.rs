//! Schema-aware walk over an order document.
//!
//! The root becomes the `order` node. Known collections become one node per
//! entity with a label built from that entity's identifying fields:
//!
//! ```text
//! order
//! ├── products[]            product      (#productSequenceNumber)
//! │   ├── lines[]           line         (#lineSequence)
//! │   │   └── services[]    service      (#serviceSequence)
//! │   └── items[]           item         (#sequenceNumber)
//! │       └── deviceDetails device
//! ├── fulfillments[]        fulfillment  (#fulfillmentSequence)
//! │   └── shipments[]       shipment     (#shipmentSequence)
//! ├── promotions[]          promotion    (#promotionSequence)
//! ├── addresses[]           address      (#addressSequence)
//! ├── accounts[]            account      (#accountSequence)
//! ├── customer              customer
//! ├── status | orderStatus  status
//! ├── eventLog              eventLog     (one node for the whole log)
//! └── orderTotalPrices      price        (one node for the whole list)
//! ```
//!
//! Other top-level booleans are promoted to small `object` nodes; other
//! top-level objects and arrays go to the generic walk.

use serde_json::{Map, Value};

use crate::json::{scalar_text, ValueExt};
use crate::rules::ClassificationRules;
use crate::types::NodeType;

use super::{generic, BuildContext};

/// Root keys consumed by reference resolution rather than drawn as nodes.
const RESOLUTION_ONLY_KEYS: &[&str] = &["amendedDetails"];

/// Keys the domain walk turns into nodes of their own, at any level.
pub(crate) const MATERIALISED_KEYS: &[&str] = &[
    "products",
    "lines",
    "services",
    "items",
    "deviceDetails",
    "fulfillments",
    "shipments",
    "promotions",
    "addresses",
    "accounts",
    "customer",
    "status",
    "orderStatus",
    "eventLog",
    "orderTotalPrices",
];

/// Walk `root` (which must be an object). Returns the root node's id.
pub(crate) fn walk(ctx: &mut BuildContext, rules: &ClassificationRules, root: &Value) -> String {
    let root_id = ctx.add_node(None, 0, NodeType::Order, order_label(root), root);
    // Every top-level object or array becomes a node, apart from the
    // resolution-only keys, which hold no prices.
    ctx.mark_expanded(&root_id);
    let Some(fields) = root.object() else {
        return root_id;
    };

    for (key, value) in fields {
        match key.as_str() {
            "products" if value.is_array() => {
                entity_list(ctx, &root_id, 1, value, Entity::Product)
            }
            "fulfillments" if value.is_array() => {
                entity_list(ctx, &root_id, 1, value, Entity::Fulfillment)
            }
            "promotions" if value.is_array() => {
                entity_list(ctx, &root_id, 1, value, Entity::Promotion)
            }
            "addresses" if value.is_array() => {
                entity_list(ctx, &root_id, 1, value, Entity::Address)
            }
            "accounts" if value.is_array() => {
                entity_list(ctx, &root_id, 1, value, Entity::Account)
            }
            "customer" if value.is_object() => {
                entity(ctx, &root_id, 1, value, Entity::Customer);
            }
            "status" | "orderStatus" if value.is_object() => {
                entity(ctx, &root_id, 1, value, Entity::Status);
            }
            "eventLog" if value.is_array() => {
                let count = value.as_array().map_or(0, Vec::len);
                let label = format!("Event Log ({} event{})", count, plural(count));
                ctx.add_node(Some(&root_id), 1, NodeType::EventLog, label, value);
            }
            "orderTotalPrices" if value.is_array() || value.is_object() => {
                let label = match value.as_array() {
                    Some(prices) => format!("Order Total Prices ({})", prices.len()),
                    None => "Order Total Prices".to_string(),
                };
                ctx.add_node(Some(&root_id), 1, NodeType::Price, label, value);
            }
            k if RESOLUTION_ONLY_KEYS.contains(&k) => {}
            _ => match value {
                Value::Bool(flag) => {
                    let mut flag_data = Map::new();
                    flag_data.insert(key.clone(), Value::Bool(*flag));
                    let data = Value::Object(flag_data);
                    let label = format!("{key}: {flag}");
                    ctx.add_node(Some(&root_id), 1, NodeType::Object, label, &data);
                }
                Value::Object(_) | Value::Array(_) => {
                    generic::walk(ctx, rules, Some(&root_id), 1, Some(key), value);
                }
                _ => {}
            },
        }
    }

    root_id
}

/// The entities the domain walk knows how to label and descend into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entity {
    Product,
    Line,
    Service,
    Item,
    Device,
    Fulfillment,
    Shipment,
    Promotion,
    Address,
    Account,
    Customer,
    Status,
}

impl Entity {
    fn node_type(self) -> NodeType {
        match self {
            Entity::Product => NodeType::Product,
            Entity::Line => NodeType::Line,
            Entity::Service => NodeType::Service,
            Entity::Item => NodeType::Item,
            Entity::Device => NodeType::Device,
            Entity::Fulfillment => NodeType::Fulfillment,
            Entity::Shipment => NodeType::Shipment,
            Entity::Promotion => NodeType::Promotion,
            Entity::Address => NodeType::Address,
            Entity::Account => NodeType::Account,
            Entity::Customer => NodeType::Customer,
            Entity::Status => NodeType::Status,
        }
    }

    /// Field that orders siblings of this entity.
    fn order_field(self) -> Option<&'static str> {
        match self {
            Entity::Product => Some("productSequenceNumber"),
            Entity::Line => Some("lineSequence"),
            Entity::Service => Some("serviceSequence"),
            Entity::Item => Some("sequenceNumber"),
            Entity::Fulfillment => Some("fulfillmentSequence"),
            Entity::Shipment => Some("shipmentSequence"),
            Entity::Promotion => Some("promotionSequence"),
            Entity::Address => Some("addressSequence"),
            Entity::Account => Some("accountSequence"),
            Entity::Device | Entity::Customer | Entity::Status => None,
        }
    }

    fn label(self, data: &Value) -> String {
        let seq = self.order_field().and_then(|f| data.field(f)).and_then(scalar_text);
        let text = |keys: &[&str]| data.first_text(keys);
        let title = self.node_type().title();

        match self {
            Entity::Product => Label::new(title)
                .number(seq)
                .text(text(&["productName", "name", "productCode", "productId"]))
                .bracket(text(&["action", "actionType"]))
                .build(),
            Entity::Line => Label::new(title)
                .text(text(&["name", "lineName", "phoneNumber", "mdn"]))
                .paren_number(seq)
                .text(text(&["lineType", "type"]))
                .bracket(text(&["action", "actionType"]))
                .build(),
            Entity::Service => Label::new(title)
                .text(text(&["serviceName", "name", "serviceCode"]))
                .paren_number(seq)
                .bracket(text(&["action", "actionType"]))
                .build(),
            Entity::Item => Label::new(title)
                .text(text(&["name", "itemName", "sku", "id", "itemId"]))
                .paren_number(seq)
                .build(),
            Entity::Device => Label::new(title)
                .text(text(&["manufacturer", "make"]))
                .text(text(&["model", "modelName"]))
                .text(text(&["imei", "serialNumber"]))
                .build(),
            Entity::Fulfillment => Label::new(title)
                .number(seq)
                .text(text(&["fulfillmentType", "fulfillmentMethod", "method", "type"]))
                .build(),
            Entity::Shipment => Label::new(title)
                .number(seq)
                .text(text(&["trackingNumber", "carrier", "shipmentId"]))
                .build(),
            Entity::Promotion => Label::new(title)
                .number(seq)
                .text(text(&["promotionName", "name", "promotionCode", "promotionId"]))
                .build(),
            Entity::Address => Label::new(title)
                .number(seq)
                .text(text(&["addressType", "type"]))
                .text(text(&["city", "addressLine1", "line1", "postalCode"]))
                .build(),
            Entity::Account => Label::new(title)
                .number(seq)
                .text(text(&["accountNumber", "accountId", "accountType"]))
                .build(),
            Entity::Customer => Label::new(title)
                .text(text(&["name", "customerName", "lastName", "customerId"]))
                .build(),
            Entity::Status => Label::new(title)
                .text(text(&["status", "statusCode", "code", "milestone", "name"]))
                .build(),
        }
    }
}

/// One node per object element of `list`, then a sequence chain over them.
fn entity_list(ctx: &mut BuildContext, parent: &str, depth: usize, list: &Value, kind: Entity) {
    let Some(elements) = list.as_array() else {
        return;
    };

    let mut created: Vec<(String, &Value)> = Vec::with_capacity(elements.len());
    for element in elements.iter().filter(|e| e.is_object()) {
        let id = entity(ctx, parent, depth, element, kind);
        created.push((id, element));
    }

    if let Some(field) = kind.order_field() {
        ctx.link_sequence(created.iter().map(|(id, v)| (id.as_str(), *v)), field);
    }
}

/// Create one entity node and descend into its nested collections, in the
/// entity's own field order.
fn entity(ctx: &mut BuildContext, parent: &str, depth: usize, data: &Value, kind: Entity) -> String {
    let id = ctx.add_node(Some(parent), depth, kind.node_type(), kind.label(data), data);
    let Some(fields) = data.object() else {
        return id;
    };

    let child_depth = depth + 1;
    for (key, value) in fields {
        match (kind, key.as_str()) {
            (Entity::Product, "lines") => entity_list(ctx, &id, child_depth, value, Entity::Line),
            (Entity::Product, "items") => entity_list(ctx, &id, child_depth, value, Entity::Item),
            (Entity::Line, "services") => {
                entity_list(ctx, &id, child_depth, value, Entity::Service)
            }
            (Entity::Fulfillment, "shipments") => {
                entity_list(ctx, &id, child_depth, value, Entity::Shipment)
            }
            (Entity::Item, "deviceDetails") => match value {
                Value::Object(_) => {
                    entity(ctx, &id, child_depth, value, Entity::Device);
                }
                Value::Array(_) => entity_list(ctx, &id, child_depth, value, Entity::Device),
                _ => {}
            },
            _ => {}
        }
    }

    id
}

fn order_label(root: &Value) -> String {
    Label::new("Order".to_string())
        .text(root.first_text(&["orderId", "orderNumber", "id"]))
        .paren(
            root.str_field("orderStatus")
                .or_else(|| root.str_field("status"))
                .map(str::to_string),
        )
        .build()
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Space-joined label parts; absent parts are skipped.
struct Label {
    parts: Vec<String>,
}

impl Label {
    fn new(title: String) -> Self {
        Self { parts: vec![title] }
    }

    fn text(mut self, part: Option<String>) -> Self {
        if let Some(p) = part {
            self.parts.push(p);
        }
        self
    }

    fn number(self, seq: Option<String>) -> Self {
        self.text(seq.map(|s| format!("#{s}")))
    }

    fn paren_number(self, seq: Option<String>) -> Self {
        self.text(seq.map(|s| format!("(#{s})")))
    }

    fn paren(self, part: Option<String>) -> Self {
        self.text(part.map(|s| format!("({s})")))
    }

    fn bracket(self, part: Option<String>) -> Self {
        self.text(part.map(|s| format!("[{s}]")))
    }

    fn build(self) -> String {
        self.parts.join(" ")
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeType, GraphData};
    use serde_json::json;

    fn run(doc: Value) -> GraphData {
        let mut ctx = BuildContext::new();
        walk(&mut ctx, &ClassificationRules::default(), &doc);
        ctx.finish().graph
    }

    fn labels(g: &GraphData) -> Vec<&str> {
        g.nodes.iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn preorder_in_field_order() {
        let g = run(json!({
            "orderId": "O1",
            "products": [
                { "productSequenceNumber": 1, "lines": [{ "lineSequence": 10 }] },
                { "productSequenceNumber": 2 }
            ],
            "addresses": [{ "addressSequence": 5 }]
        }));
        let types: Vec<String> = g.nodes.iter().map(|n| n.node_type.to_string()).collect();
        assert_eq!(types, ["order", "product", "line", "product", "address"]);
        let depths: Vec<usize> = g.nodes.iter().map(|n| n.depth).collect();
        assert_eq!(depths, [0, 1, 2, 1, 1]);
    }

    #[test]
    fn labels_embed_identifying_fields() {
        let g = run(json!({
            "orderId": "O-77",
            "orderStatus": "SUBMITTED",
            "products": [{
                "productSequenceNumber": 1,
                "productName": "Unlimited Plan",
                "lines": [{
                    "lineSequence": 10,
                    "name": "Mobile",
                    "lineType": "voice",
                    "action": "ADD"
                }]
            }],
            "addresses": [{ "addressSequence": 5, "city": "Springfield" }]
        }));
        assert_eq!(
            labels(&g),
            [
                "Order O-77 (SUBMITTED)",
                "Product #1 Unlimited Plan",
                "Line Mobile (#10) voice [ADD]",
                "Address #5 Springfield",
            ]
        );
    }

    #[test]
    fn device_details_object_and_array() {
        let g = run(json!({
            "products": [{
                "items": [
                    { "id": "I1", "deviceDetails": { "make": "Acme", "model": "X" } },
                    { "id": "I2", "deviceDetails": [{ "imei": "1" }, { "imei": "2" }] }
                ]
            }]
        }));
        let devices = g.nodes.iter().filter(|n| n.node_type == NodeType::Device).count();
        assert_eq!(devices, 3);
        assert!(labels(&g).contains(&"Device Acme X"));
    }

    #[test]
    fn booleans_promoted_and_unknown_regions_walked_generically() {
        let g = run(json!({
            "orderId": "O1",
            "isCancelable": false,
            "channel": "web",
            "metadata": { "source": "store" }
        }));
        assert_eq!(g.nodes.len(), 3);
        assert_eq!(g.nodes[1].label, "isCancelable: false");
        assert_eq!(g.nodes[1].data, json!({ "isCancelable": false }));
        assert_eq!(g.nodes[2].node_type, NodeType::Object);
        assert_eq!(g.nodes[2].depth, 1);
    }

    #[test]
    fn only_the_root_and_fallback_regions_are_expanded() {
        let mut ctx = BuildContext::new();
        let doc = json!({
            "products": [{ "productSequenceNumber": 1, "prices": [] }],
            "billing": { "summary": {} }
        });
        walk(&mut ctx, &ClassificationRules::default(), &doc);
        let done = ctx.finish();
        let mut expanded: Vec<&str> = done.expanded.iter().map(String::as_str).collect();
        expanded.sort_unstable();
        assert_eq!(expanded, ["n0", "n2", "n3"]);
    }

    #[test]
    fn amended_details_are_not_drawn() {
        let g = run(json!({ "amendedDetails": [{ "newId": "a", "oldId": "b" }] }));
        assert_eq!(g.nodes.len(), 1);
    }

    #[test]
    fn event_log_and_totals_are_single_nodes() {
        let g = run(json!({
            "eventLog": [{ "eventType": "CREATED" }, { "eventType": "SUBMITTED" }],
            "orderTotalPrices": [{ "amount": 10 }]
        }));
        assert_eq!(
            labels(&g),
            ["Order", "Event Log (2 events)", "Order Total Prices (1)"]
        );
    }

    #[test]
    fn non_array_collections_and_scalar_elements_are_skipped() {
        let g = run(json!({
            "products": { "productSequenceNumber": 1 },
            "addresses": [5, null, { "addressSequence": 1 }]
        }));
        // An object under `products` falls through to the generic walk.
        let addresses = g.nodes.iter().filter(|n| n.node_type == NodeType::Address).count();
        assert_eq!(addresses, 1);
    }

    #[test]
    fn item_chain_follows_sequence_number() {
        let g = run(json!({
            "products": [{
                "items": [{ "sequenceNumber": 2 }, { "sequenceNumber": 1 }]
            }]
        }));
        let seq: Vec<(&str, &str)> = g
            .edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Sequence)
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        // n2 is sequenceNumber 2, n3 is sequenceNumber 1.
        assert_eq!(seq, [("n3", "n2")]);
    }
}
