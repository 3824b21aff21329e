//! Entry points: parse, traverse, resolve, return.

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::GraphError;
use crate::resolve;
use crate::rules::ClassificationRules;
use crate::traverse::{domain, generic, BuildContext, Traversal};
use crate::types::GraphData;

/// Which traversal produces the nodes.
///
/// Serialises as `"domain"` or `"generic"`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Strategy {
    /// Schema-aware walk with readable labels. Unrecognised top-level
    /// regions fall back to the generic walk.
    #[default]
    #[serde(rename = "domain", alias = "domain-aware")]
    DomainAware,
    /// Classify every object by rule table, ignoring field names.
    #[serde(rename = "generic")]
    Generic,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::DomainAware => write!(f, "domain"),
            Strategy::Generic => write!(f, "generic"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" | "domain-aware" => Ok(Strategy::DomainAware),
            "generic" => Ok(Strategy::Generic),
            _ => Err(format!(
                "unknown strategy {:?}; expected one of: domain, generic",
                s
            )),
        }
    }
}

/// Options for one build.
///
/// Deserialises from `{ "strategy": "generic", "rules": [...] }`; both keys
/// are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildOptions {
    pub strategy: Strategy,
    /// Type rules for the generic walk (also used by the domain walk's
    /// fallback).
    pub rules: ClassificationRules,
}

impl BuildOptions {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_rules(mut self, rules: ClassificationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Parse options from JSON.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(|e| GraphError::Options(e.to_string()))
    }
}

/// Build a graph from JSON text with default options.
///
/// - Text that is not valid JSON fails with [`GraphError::Parse`].
/// - A top-level value that is not an object yields an empty graph.
/// - Ids restart at `n0` on every call; identical input gives an identical
///   graph.
pub fn build_graph(json: &str) -> Result<GraphData, GraphError> {
    build_graph_with(json, &BuildOptions::default())
}

/// Build a graph from JSON text.
pub fn build_graph_with(json: &str, options: &BuildOptions) -> Result<GraphData, GraphError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| GraphError::Parse(e.to_string()))?;
    build_graph_from_value(&value, options)
}

/// Build a graph from an already-parsed document.
pub fn build_graph_from_value(
    value: &Value,
    options: &BuildOptions,
) -> Result<GraphData, GraphError> {
    if !value.is_object() {
        debug!("top-level value is not an object; returning empty graph");
        return Ok(GraphData::default());
    }

    panic::catch_unwind(AssertUnwindSafe(|| assemble(value, options)))
        .map_err(|payload| GraphError::Unknown(panic_message(payload.as_ref())))
}

fn assemble(root: &Value, options: &BuildOptions) -> GraphData {
    let mut ctx = BuildContext::new();

    match options.strategy {
        Strategy::DomainAware => {
            domain::walk(&mut ctx, &options.rules, root);
        }
        Strategy::Generic => {
            generic::walk(&mut ctx, &options.rules, None, 0, None, root);
        }
    }
    debug!(
        strategy = %options.strategy,
        nodes = ctx.node_count(),
        "traversal complete"
    );

    let Traversal {
        mut graph,
        indices,
        expanded,
    } = ctx.finish();
    debug!(
        sequences = indices.sequence_count(),
        ids = indices.id_count(),
        "indices built"
    );

    let references = resolve::resolve(&graph.nodes, &indices, &expanded);
    debug!(edges = references.len(), "references resolved");
    graph.edges.extend(references);

    graph
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "traversal aborted".to_string())
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeType, NodeType};

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = build_graph("{not valid json").unwrap_err();
        assert!(matches!(err, GraphError::Parse(_)));
        assert!(err.to_string().starts_with("Invalid JSON: "));
    }

    #[test]
    fn non_object_roots_give_empty_graphs() {
        for text in ["[1,2,3]", "42", "null", "\"order\"", "true"] {
            let g = build_graph(text).unwrap();
            assert!(g.nodes.is_empty() && g.edges.is_empty(), "{text}");
        }
    }

    #[test]
    fn empty_object_is_a_lone_root() {
        let g = build_graph("{}").unwrap();
        assert_eq!(g.nodes.len(), 1);
        assert_eq!(g.nodes[0].id, "n0");
        assert_eq!(g.nodes[0].node_type, NodeType::Order);
        assert!(g.edges.is_empty());
    }

    #[test]
    fn ids_restart_on_every_call() {
        let a = build_graph(r#"{"products":[{}]}"#).unwrap();
        let b = build_graph(r#"{"products":[{}]}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.nodes[1].id, "n1");
    }

    #[test]
    fn edges_are_ordered_by_kind() {
        let g = build_graph(
            r#"{
                "products": [
                    { "productSequenceNumber": 2, "lines": [{ "lineSequence": 1, "addressSequence": 1 }] },
                    { "productSequenceNumber": 1 }
                ],
                "addresses": [{ "addressSequence": 1 }]
            }"#,
        )
        .unwrap();
        let kinds: Vec<EdgeType> = g.edges.iter().map(|e| e.edge_type).collect();
        assert_eq!(
            kinds,
            [
                EdgeType::Default,
                EdgeType::Default,
                EdgeType::Default,
                EdgeType::Default,
                EdgeType::Sequence,
                EdgeType::Reference,
            ]
        );
    }

    #[test]
    fn strategy_parses_and_deserialises() {
        assert_eq!("generic".parse::<Strategy>(), Ok(Strategy::Generic));
        assert_eq!("domain-aware".parse::<Strategy>(), Ok(Strategy::DomainAware));
        assert!("fancy".parse::<Strategy>().is_err());

        let opts = BuildOptions::from_json(r#"{ "strategy": "generic" }"#).unwrap();
        assert_eq!(opts.strategy, Strategy::Generic);
        assert_eq!(opts.rules, ClassificationRules::default());
    }

    #[test]
    fn generic_strategy_builds_from_rules() {
        let opts = BuildOptions::default().with_strategy(Strategy::Generic);
        let g = build_graph_with(r#"{"orderId":"O1","extras":{"a":1}}"#, &opts).unwrap();
        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.nodes[0].node_type, NodeType::Order);
        assert_eq!(g.nodes[1].label, "extras");
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "traversal aborted");
    }
}
