use std::collections::{HashSet, VecDeque};

use crate::types::{Edge, EdgeType, GraphData, Node, NodeType};

/// Read-only navigation over a built graph.
///
/// Lookups are linear scans; graphs are a few thousand nodes at most and are
/// queried by tooling and tests, not on a hot path.
impl GraphData {
    /// Retrieve a node by id.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The root node (the first one created), if the graph is non-empty.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes of a given type, in creation order.
    pub fn by_type(&self, node_type: &NodeType) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| &n.node_type == node_type)
            .collect()
    }

    /// All edges of a given type, in append order.
    pub fn edges_of_type(&self, edge_type: EdgeType) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| e.edge_type == edge_type)
            .collect()
    }

    /// Nodes `id` points at through edges of `edge_type`.
    ///
    /// Edges whose target is missing from the graph are silently omitted.
    pub fn outgoing(&self, id: &str, edge_type: EdgeType) -> Vec<&Node> {
        self.edges
            .iter()
            .filter(|e| e.source == id && e.edge_type == edge_type)
            .filter_map(|e| self.get(&e.target))
            .collect()
    }

    /// Nodes pointing at `id` through edges of `edge_type`.
    pub fn incoming(&self, id: &str, edge_type: EdgeType) -> Vec<&Node> {
        self.edges
            .iter()
            .filter(|e| e.target == id && e.edge_type == edge_type)
            .filter_map(|e| self.get(&e.source))
            .collect()
    }

    /// Direct containment children of `id`.
    pub fn children(&self, id: &str) -> Vec<&Node> {
        self.outgoing(id, EdgeType::Default)
    }

    /// Containment parent of `id`; `None` for the root.
    pub fn parent(&self, id: &str) -> Option<&Node> {
        self.incoming(id, EdgeType::Default).into_iter().next()
    }

    /// Everything contained under `id`, breadth-first, excluding `id`.
    pub fn descendants(&self, id: &str) -> Vec<&Node> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut result: Vec<&Node> = Vec::new();

        visited.insert(id);
        queue.push_back(id);

        while let Some(current) = queue.pop_front() {
            for child in self.children(current) {
                if visited.insert(child.id.as_str()) {
                    queue.push_back(&child.id);
                    result.push(child);
                }
            }
        }

        result
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::build_graph;
    use crate::types::{EdgeType, NodeType};

    const DOC: &str = r#"{
        "orderId": "O1",
        "products": [{
            "productSequenceNumber": 1,
            "lines": [{ "lineSequence": 10, "addressSequence": 5 }]
        }],
        "addresses": [{ "addressSequence": 5 }]
    }"#;

    #[test]
    fn get_and_root() {
        let g = build_graph(DOC).unwrap();
        assert_eq!(g.root().map(|n| n.id.as_str()), Some("n0"));
        assert_eq!(g.get("n2").map(|n| &n.node_type), Some(&NodeType::Line));
        assert!(g.get("n99").is_none());
        assert_eq!(g.len(), 4);
    }

    #[test]
    fn children_and_parent() {
        let g = build_graph(DOC).unwrap();
        let kids: Vec<&str> = g.children("n0").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(kids, ["n1", "n3"]);
        assert_eq!(g.parent("n2").map(|n| n.id.as_str()), Some("n1"));
        assert!(g.parent("n0").is_none());
    }

    #[test]
    fn references_in_both_directions() {
        let g = build_graph(DOC).unwrap();
        let out = g.outgoing("n2", EdgeType::Reference);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].node_type, NodeType::Address);
        assert_eq!(g.incoming("n3", EdgeType::Reference)[0].id, "n2");
    }

    #[test]
    fn descendants_follow_containment_only() {
        let g = build_graph(DOC).unwrap();
        let under_product: Vec<&str> = g.descendants("n1").iter().map(|n| n.id.as_str()).collect();
        // The line's reference to the address is not containment.
        assert_eq!(under_product, ["n2"]);
        assert_eq!(g.descendants("n0").len(), 3);
    }

    #[test]
    fn by_type_and_edges_of_type() {
        let g = build_graph(DOC).unwrap();
        assert_eq!(g.by_type(&NodeType::Product).len(), 1);
        assert_eq!(g.by_type(&NodeType::Promotion).len(), 0);
        assert_eq!(g.edges_of_type(EdgeType::Default).len(), 3);
        assert_eq!(g.edges_of_type(EdgeType::Reference).len(), 1);
    }
}
