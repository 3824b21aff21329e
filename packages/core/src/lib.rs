//! Turns telecom / e-commerce order documents into typed graphs.
//!
//! An order document (products, lines, items, fulfillments, shipments,
//! promotions, addresses, accounts) goes in as JSON text; a [`GraphData`]
//! of nodes and edges comes out, ready for a force-directed renderer. This
//! crate is the Rust-native foundation for the `ordergraph` CLI and the
//! `ordergraph-wasm` browser bindings.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Output types: [`Node`], [`Edge`], [`NodeType`], [`EdgeType`], [`GraphData`] |
//! | [`build`] | Entry points [`build_graph`] and [`build_graph_with`], [`BuildOptions`] |
//! | [`rules`] | Data-driven type classification for the generic traversal |
//! | [`index`] | Sequence-number and business-id lookups used during a build |
//! | [`graph`] | Read-only navigation over a built graph |
//! | [`validation`] | Structural invariant checking via [`check_graph`] |
//! | [`render`] | Human-readable text rendering |
//!
//! # Pipeline
//!
//! 1. Parse the text. Invalid JSON is a [`GraphError::Parse`]; a non-object
//!    top level is an empty graph.
//! 2. Traverse, pre-order and depth-first, creating nodes and containment
//!    edges and filling the lookup indices. Sibling collections that carry
//!    sequence numbers are chained with `sequence` edges.
//! 3. Resolve references: sequence numbers and business ids found in node
//!    data become `reference` and `amendment` edges.
//!
//! Every build owns its id counter and indices, so builds are reproducible
//! and may run concurrently.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use ordergraph::{build_graph, check_graph, EdgeType};
//!
//! let graph = build_graph(r#"{
//!     "orderId": "O1",
//!     "products": [{ "productSequenceNumber": 1,
//!                    "lines": [{ "lineSequence": 10, "addressSequence": 5 }] }],
//!     "addresses": [{ "addressSequence": 5 }]
//! }"#)?;
//!
//! check_graph(&graph)?;
//! assert_eq!(graph.edges_of_type(EdgeType::Reference).len(), 1);
//! println!("{}", graph.to_json()?);
//! ```

pub mod build;
pub mod error;
pub mod graph;
pub mod index;
pub mod json;
mod resolve;
pub mod render;
pub mod rules;
mod traverse;
pub mod types;
pub mod validation;

pub use build::{build_graph, build_graph_from_value, build_graph_with, BuildOptions, Strategy};
pub use error::GraphError;
pub use rules::{ClassificationRules, Predicate, Rule};
pub use types::{Edge, EdgeType, GraphData, Node, NodeType};
pub use validation::{check_graph, InvariantError};
