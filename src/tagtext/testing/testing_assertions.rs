//! Fluent assertion API for tree nodes

use std::fmt::Debug;

use crate::tagtext::ast::node::{Child, NodeId};
use crate::tagtext::building::Tree;

// ============================================================================
// Entry Points
// ============================================================================

/// Create an assertion builder for the root of a tree
pub fn assert_tree(tree: &Tree) -> NodeAssertion<'_> {
    assert_node(tree, tree.root())
}

/// Create an assertion builder for any node of a tree
pub fn assert_node(tree: &Tree, id: NodeId) -> NodeAssertion<'_> {
    NodeAssertion {
        tree,
        id,
        context: tree.node(id).tag().to_string(),
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    tree: &'a Tree,
    id: NodeId,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tag(self, expected: &str) -> Self {
        let actual = self.tree.node(self.id).tag();
        assert_eq!(
            actual, expected,
            "{}: expected tag '{}', found '{}'",
            self.context, expected, actual
        );
        self
    }

    /// Assert the primary name
    pub fn name(self, expected: &str) -> Self {
        let actual = self.tree.node(self.id).name.as_deref();
        assert_eq!(
            actual,
            Some(expected),
            "{}: expected name '{}', found {:?}",
            self.context,
            expected,
            actual
        );
        self
    }

    /// Assert the primary name followed by the aliases
    pub fn names(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.tree.node(self.id).names().collect();
        assert_eq!(
            actual, expected,
            "{}: expected names {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    pub fn param(self, key: &str, expected: &str) -> Self {
        let actual = self.tree.node(self.id).params.get(key);
        assert_eq!(
            actual,
            Some(expected),
            "{}: expected param {}={:?}, found {:?}",
            self.context,
            key,
            expected,
            actual
        );
        self
    }

    pub fn option(self, key: &str, expected: &str) -> Self {
        let actual = self.tree.node(self.id).options.get(key);
        assert_eq!(
            actual,
            Some(expected),
            "{}: expected option {}={:?}, found {:?}",
            self.context,
            key,
            expected,
            actual
        );
        self
    }

    /// Assert the parameter keys, in order
    pub fn param_keys(self, expected: &[&str]) -> Self {
        let node = self.tree.node(self.id);
        let actual: Vec<&str> = node.params.keys().collect();
        assert_eq!(
            actual, expected,
            "{}: expected param keys {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    pub fn label(self, expected: &str) -> Self {
        let actual = self.tree.node(self.id).label.as_deref();
        assert_eq!(
            actual,
            Some(expected),
            "{}: expected label {:?}, found {:?}",
            self.context,
            expected,
            actual
        );
        self
    }

    pub fn no_label(self) -> Self {
        let actual = &self.tree.node(self.id).label;
        assert!(
            actual.is_none(),
            "{}: expected no label, found {:?}",
            self.context,
            actual
        );
        self
    }

    pub fn suppressed(self, expected: bool) -> Self {
        let actual = self.tree.node(self.id).suppressed;
        assert_eq!(
            actual, expected,
            "{}: expected suppressed={}, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn runtime_only(self, expected: bool) -> Self {
        let actual = self.tree.node(self.id).runtime_only;
        assert_eq!(
            actual, expected,
            "{}: expected runtime_only={}, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn built(self) -> Self {
        let node = self.tree.node(self.id);
        assert!(
            node.is_built(),
            "{}: expected a built node, state is {:?}",
            self.context,
            node.state()
        );
        self
    }

    /// Assert the raw body text of a node whose body was not expanded
    pub fn raw_body(self, expected: &str) -> Self {
        let node = self.tree.node(self.id);
        assert!(
            !node.expanded,
            "{}: expected a raw body, but the body was expanded",
            self.context
        );
        let actual = node.body.as_text();
        assert_eq!(
            actual,
            Some(expected),
            "{}: expected raw body {:?}, found {:?}",
            self.context,
            expected,
            actual
        );
        self
    }

    pub fn handler(self, expected: &str) -> Self {
        let actual = self.tree.node(self.id).handler_name();
        assert_eq!(
            actual,
            Some(expected),
            "{}: expected handler '{}', found {:?}",
            self.context,
            expected,
            actual
        );
        self
    }

    /// Assert the payload, downcast to `T`
    pub fn payload<T>(self, expected: T) -> Self
    where
        T: PartialEq + Debug + 'static,
    {
        let actual = self.tree.node(self.id).payload_as::<T>();
        assert!(
            actual.as_deref() == Some(&expected),
            "{}: expected payload {:?}, found {:?}",
            self.context,
            expected,
            actual
        );
        self
    }

    pub fn no_payload(self) -> Self {
        assert!(
            self.tree.node(self.id).payload().is_none(),
            "{}: expected no payload",
            self.context
        );
        self
    }

    pub fn callable(self, expected: bool) -> Self {
        let actual = self.tree.is_callable(self.id);
        assert_eq!(
            actual, expected,
            "{}: expected callable={}, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn diagnostic_count(self, expected: usize) -> Self {
        let diagnostics = &self.tree.node(self.id).diagnostics;
        assert_eq!(
            diagnostics.len(),
            expected,
            "{}: expected {} diagnostics, found {:?}",
            self.context,
            expected,
            diagnostics
        );
        self
    }

    pub fn has_diagnostic(self, code: &str) -> Self {
        let diagnostics = &self.tree.node(self.id).diagnostics;
        assert!(
            diagnostics.iter().any(|d| d.has_code(code)),
            "{}: expected a diagnostic with code '{}', found {:?}",
            self.context,
            code,
            diagnostics
        );
        self
    }

    /// Assert the number of node children, runtime-only nodes included
    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.tree.child_nodes(self.id).count();
        assert_eq!(
            actual,
            expected,
            "{}: expected {} children, found {}: [{}]",
            self.context,
            expected,
            actual,
            self.summarize_children()
        );
        self
    }

    /// Assert the text fragments among the children, in order
    pub fn fragments(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self
            .tree
            .node(self.id)
            .children()
            .iter()
            .filter_map(|child| match child {
                Child::Text(text) => Some(text.as_str()),
                Child::Node(_) => None,
            })
            .collect();
        assert_eq!(
            actual, expected,
            "{}: expected fragments {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    /// Assert on the node child at `index`
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children: Vec<NodeId> = self.tree.child_nodes(self.id).collect();
        assert!(
            index < children.len(),
            "{}: child index {} out of bounds ({} children)",
            self.context,
            index,
            children.len()
        );
        let child = children[index];
        assertion(NodeAssertion {
            tree: self.tree,
            id: child,
            context: format!("{}/{}[{}]", self.context, self.tree.node(child).tag(), index),
        });
        self
    }

    /// Assert on the node that `path` locates from this one
    pub fn at<F>(self, path: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let found = self.tree.find(self.id, path);
        assert!(
            found.is_some(),
            "{}: path '{}' does not resolve",
            self.context,
            path
        );
        if let Some(id) = found {
            assertion(NodeAssertion {
                tree: self.tree,
                id,
                context: format!("{}@{}", self.context, path),
            });
        }
        self
    }

    fn summarize_children(&self) -> String {
        self.tree
            .child_nodes(self.id)
            .map(|child| self.tree.node(child).tag().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
