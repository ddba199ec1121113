//! Treeviz formatter for node trees
//!
//! One line per node, nesting shown as 2 spaces per level:
//!
//!     <indentation><tag> <names> "<label>" <markers>
//!
//! Labels are truncated to 30 characters. Markers flag suppressed (`!`),
//! runtime-only (`+`) and callable (`*`) nodes, and the number of diagnostics.
//! Text fragments are not shown.

use crate::tagtext::ast::node::NodeId;
use crate::tagtext::building::Tree;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

pub fn to_treeviz_str(tree: &Tree, id: NodeId) -> String {
    let mut result = String::new();
    append_node(&mut result, tree, id, 0);
    result
}

fn append_node(result: &mut String, tree: &Tree, id: NodeId, depth: usize) {
    let node = tree.node(id);
    let mut line = format!("{}{}", "  ".repeat(depth), node.tag());
    for name in node.names() {
        line.push(' ');
        line.push_str(name);
    }
    if let Some(label) = &node.label {
        line.push_str(&format!(" \"{}\"", truncate(label, 30)));
    }

    let mut markers = String::new();
    if node.suppressed {
        markers.push('!');
    }
    if node.runtime_only {
        markers.push('+');
    }
    if node.is_callable() {
        markers.push('*');
    }
    if !markers.is_empty() {
        line.push_str(&format!(" [{}]", markers));
    }
    if !node.diagnostics.is_empty() {
        line.push_str(&format!(" ({} diagnostics)", node.diagnostics.len()));
    }
    result.push_str(&line);
    result.push('\n');

    for child in tree.child_nodes(id) {
        append_node(result, tree, child, depth + 1);
    }
}
