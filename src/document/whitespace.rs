//! Whitespace normalization over the node tree
//!
//! Pretty-printed input leaves indentation text between elements. Before any
//! lookup the tree is walked recursively: text values are trimmed, text nodes
//! left empty are dropped, and adjacent text nodes are merged into one.

use super::Node;

/// Normalize a sibling list and everything below it
pub fn normalize_nodes(nodes: &mut Vec<Node>) {
    for node in nodes.iter_mut() {
        match node {
            Node::Element(element) => normalize_nodes(&mut element.children),
            Node::Text(text) => {
                let trimmed = text.trim();
                if trimmed.len() != text.len() {
                    *text = trimmed.to_string();
                }
            }
            _ => {}
        }
    }

    nodes.retain(|node| !matches!(node, Node::Text(text) if text.is_empty()));
    merge_adjacent_text(nodes);
}

fn merge_adjacent_text(nodes: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        if let Node::Text(text) = &node {
            if let Some(Node::Text(previous)) = merged.last_mut() {
                previous.push_str(text);
                continue;
            }
        }
        merged.push(node);
    }
    *nodes = merged;
}
