//! Human-readable text rendering of [`GraphData`].
//!
//! The output is plain text for terminals and logs. It is not a canonical
//! format; only the JSON graph is meant for machines.

use crate::types::{EdgeType, GraphData, Node, NodeType};

/// Render a whole graph as a summary grouped by node type.
///
/// ```text
/// Order Graph  4 nodes  4 edges
/// ─────────────────────────────
///
/// ORDER (1)
///   n0  Order O1
///
/// PRODUCT (1)
///   n1  Product #1
///
/// LINE (1)
///   n2  Line (#10)
///
/// ADDRESS (1)
///   n3  Address #5
///
/// EDGES
///   default    3
///   reference  1
/// ```
pub fn render_graph(graph: &GraphData) -> String {
    let header = format!(
        "Order Graph  {} node{}  {} edge{}",
        graph.nodes.len(),
        plural(graph.nodes.len()),
        graph.edges.len(),
        plural(graph.edges.len()),
    );
    let rule = "─".repeat(header.chars().count());
    let mut out = format!("{}\n{}\n", header, rule);

    // Groups appear in the order their first node was created.
    let mut order: Vec<&NodeType> = Vec::new();
    for node in &graph.nodes {
        if !order.contains(&&node.node_type) {
            order.push(&node.node_type);
        }
    }

    for node_type in order {
        let nodes = graph.by_type(node_type);
        out.push('\n');
        out.push_str(&format!(
            "{} ({})\n",
            node_type.as_str().to_uppercase(),
            nodes.len()
        ));
        for n in nodes {
            out.push_str(&format!("  {}  {}\n", n.id, truncate(&n.label, 72)));
        }
    }

    let counts: Vec<(EdgeType, usize)> = [
        EdgeType::Default,
        EdgeType::Sequence,
        EdgeType::Reference,
        EdgeType::Amendment,
    ]
    .into_iter()
    .map(|t| (t, graph.edges_of_type(t).len()))
    .filter(|(_, n)| *n > 0)
    .collect();

    if !counts.is_empty() {
        out.push('\n');
        out.push_str("EDGES\n");
        for (t, n) in counts {
            out.push_str(&format!("  {:<10} {}\n", t.to_string(), n));
        }
    }

    out
}

/// Render one node with its data and relations.
///
/// ```text
/// [line] Line Mobile (#10) voice  depth: 2
///
/// Data:
///   {"lineSequence":10,"addressSequence":5}
///
/// Relations:
///   <- default    n1  Product #1
///   -> reference  n3  Address #5
///
/// id: n2
/// ```
///
/// Returns `None` when `id` is not in the graph.
pub fn render_node(graph: &GraphData, id: &str) -> Option<String> {
    let node = graph.get(id)?;
    let mut out = format!("[{}] {}  depth: {}\n", node.node_type, node.label, node.depth);

    if let Some(status) = &node.status {
        out.push_str(&format!("status: {}\n", status));
    }

    out.push('\n');
    out.push_str("Data:\n");
    out.push_str(&format!("  {}\n", truncate(&node.data.to_string(), 200)));

    let mut relations: Vec<String> = Vec::new();
    for edge in &graph.edges {
        let (arrow, other) = if edge.target == node.id {
            ("<-", &edge.source)
        } else if edge.source == node.id {
            ("->", &edge.target)
        } else {
            continue;
        };
        let label = graph.get(other).map(|n: &Node| n.label.as_str()).unwrap_or("?");
        relations.push(format!(
            "  {} {:<10} {}  {}\n",
            arrow,
            edge.edge_type.to_string(),
            other,
            truncate(label, 60)
        ));
    }
    if !relations.is_empty() {
        out.push('\n');
        out.push_str("Relations:\n");
        for r in relations {
            out.push_str(&r);
        }
    }

    out.push('\n');
    out.push_str(&format!("id: {}\n", node.id));
    Some(out)
}

// --- helpers -----------------------------------------------------------------

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}

// --- tests -------------------------------------------------------------------
