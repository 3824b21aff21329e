//! WebAssembly bindings for the ordergraph core library.
//!
//! Exposes the graph builder to JavaScript/TypeScript via `wasm-bindgen` so a
//! browser renderer (force simulation, zoom, tooltips) can call it directly.
//! Compile with `wasm-pack build` to produce an npm-ready package.
//!
//! ```js
//! import init, { buildGraph, buildGraphWith, summarize, checkGraph } from './ordergraph_wasm.js';
//! await init();
//!
//! const graph = JSON.parse(buildGraph(textarea.value));   // { nodes, edges }
//! const generic = JSON.parse(buildGraphWith(text, '{"strategy":"generic"}'));
//! console.log(summarize(text));
//! checkGraph(text); // throws if an invariant is broken
//! ```
//!
//! Errors are thrown as strings. Invalid input throws `Invalid JSON: …`.

use ordergraph::{BuildOptions, GraphData};
use wasm_bindgen::prelude::*;

/// One-time initialisation called at the start of every exported function.
///
/// Installs the `console_error_panic_hook` when the feature is enabled so
/// that Rust panics are forwarded to the browser console as readable errors
/// rather than appearing as generic "unreachable" WASM traps.
fn setup() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Build a graph from an order document with default options.
///
/// Returns the graph as a JSON string: `{ "nodes": [...], "edges": [...] }`.
#[wasm_bindgen(js_name = buildGraph)]
pub fn build_graph(json: &str) -> Result<String, JsValue> {
    setup();
    let graph = ordergraph::build_graph(json).map_err(to_js)?;
    graph.to_json().map_err(to_js)
}

/// Build a graph with explicit options.
///
/// `options_json` is a JSON object; both keys are optional:
///
/// ```json
/// {
///   "strategy": "generic",
///   "rules": [{ "type": "simCard", "when": { "hasKey": "iccid" } }]
/// }
/// ```
#[wasm_bindgen(js_name = buildGraphWith)]
pub fn build_graph_with(json: &str, options_json: &str) -> Result<String, JsValue> {
    setup();
    let options = BuildOptions::from_json(options_json).map_err(to_js)?;
    let graph = ordergraph::build_graph_with(json, &options).map_err(to_js)?;
    graph.to_json().map_err(to_js)
}

/// Render a text summary of the graph built from `json`.
///
/// Pass a node id to describe that node and its relations instead.
#[wasm_bindgen]
pub fn summarize(json: &str, node_id: Option<String>) -> Result<String, JsValue> {
    setup();
    let graph = ordergraph::build_graph(json).map_err(to_js)?;
    match node_id {
        Some(id) => ordergraph::render::render_node(&graph, &id)
            .ok_or_else(|| JsValue::from_str(&format!("no node with id {id:?}"))),
        None => Ok(ordergraph::render::render_graph(&graph)),
    }
}

/// Build the graph and verify its structural invariants.
///
/// Returns `undefined` on success. Throws a descriptive string on failure.
#[wasm_bindgen(js_name = checkGraph)]
pub fn check_graph(json: &str) -> Result<(), JsValue> {
    setup();
    let graph: GraphData = ordergraph::build_graph(json).map_err(to_js)?;
    ordergraph::check_graph(&graph).map_err(to_js)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
