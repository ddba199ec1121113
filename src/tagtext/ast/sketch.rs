//! Sketches
//!
//! A sketch is the tag / names / parameters / child shape of a subtree. Two trees
//! with equal sketches are structurally equivalent regardless of payloads, text
//! fragments or formatting. Runtime-only nodes are left out.

use serde::{Deserialize, Serialize};

use crate::tagtext::ast::node::NodeId;
use crate::tagtext::building::Tree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sketch {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Sketch>,
}

impl Sketch {
    pub fn of(tree: &Tree, id: NodeId) -> Sketch {
        let node = tree.node(id);
        Sketch {
            tag: node.tag().to_string(),
            names: node.names().map(str::to_string).collect(),
            params: node.params.to_pairs(),
            children: tree
                .child_nodes(id)
                .filter(|child| !tree.node(*child).runtime_only)
                .map(|child| Sketch::of(tree, child))
                .collect(),
        }
    }

    /// Number of nodes in the sketch, itself included
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Sketch::size).sum::<usize>()
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
