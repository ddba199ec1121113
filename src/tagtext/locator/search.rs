//! Tree search
//!
//! [`find`] follows a path strictly downwards from its start node: each step
//! picks one immediate child and a missing child ends the search. There is no
//! backtracking, so when several children match a step only the first (or the
//! nth, for positional steps) is ever considered.
//!
//! [`first`] tries every descendant of the start node, in pre-order, as the
//! place where the path begins, and returns the first one from which the whole
//! path resolves.

use crate::tagtext::ast::node::NodeId;
use crate::tagtext::building::tree::Tree;
use crate::tagtext::locator::path::{Locator, Selector, Step, ANY_TAG};

/// Resolve `locator` downwards from `start`
///
/// If the first step matches `start` itself the path is anchored there;
/// otherwise the first step selects among the children of `start`.
pub fn find(tree: &Tree, start: NodeId, locator: &Locator) -> Option<NodeId> {
    let steps = locator.steps();
    let (first, rest) = steps.split_first()?;
    let anchored = !matches!(first.selector, Selector::Nth(_)) && first.accepts(tree.node(start));
    let remaining = if anchored { rest } else { steps };

    let found = descend(tree, start, remaining);
    if found.is_none() {
        tracing::debug!(start = %start, path = %locator, "locator found no node");
    }
    found
}

/// The first descendant of `start`, in pre-order, from which `locator` resolves
pub fn first(tree: &Tree, start: NodeId, locator: &Locator) -> Option<NodeId> {
    let (head, rest) = locator.steps().split_first()?;
    let found = tree
        .descendants(start)
        .into_iter()
        .filter(|candidate| matches_in_place(tree, *candidate, head))
        .find_map(|candidate| descend(tree, candidate, rest));
    if found.is_none() {
        tracing::debug!(start = %start, path = %locator, "search found no node");
    }
    found
}

/// Every descendant of `start` carrying `tag`, in pre-order
pub fn search_all(tree: &Tree, start: NodeId, tag: &str) -> Vec<NodeId> {
    tree.descendants(start)
        .into_iter()
        .filter(|id| tag == ANY_TAG || tree.node(*id).tag() == tag)
        .collect()
}

fn descend(tree: &Tree, start: NodeId, steps: &[Step]) -> Option<NodeId> {
    steps
        .iter()
        .try_fold(start, |current, step| select_child(tree, current, step))
}

fn select_child(tree: &Tree, parent: NodeId, step: &Step) -> Option<NodeId> {
    let mut candidates = tree
        .child_nodes(parent)
        .filter(|child| step.accepts(tree.node(*child)));
    match step.selector {
        Selector::Nth(n) => candidates.nth(n - 1),
        _ => candidates.next(),
    }
}

/// Whether `id` is a node the step would select from its own parent
fn matches_in_place(tree: &Tree, id: NodeId, step: &Step) -> bool {
    match step.selector {
        Selector::Nth(_) => {
            tree.parent(id)
                .and_then(|parent| select_child(tree, parent, step))
                == Some(id)
        }
        _ => step.accepts(tree.node(id)),
    }
}

impl Tree {
    /// Resolve `path` downwards from `start`; `None` if it does not compile or
    /// does not resolve
    pub fn find(&self, start: NodeId, path: &str) -> Option<NodeId> {
        let locator = compile_logged(path)?;
        find(self, start, &locator)
    }

    /// Search the descendants of `start` for a node from which `path` resolves
    pub fn first(&self, start: NodeId, path: &str) -> Option<NodeId> {
        let locator = compile_logged(path)?;
        first(self, start, &locator)
    }

    pub fn search_all(&self, start: NodeId, tag: &str) -> Vec<NodeId> {
        search_all(self, start, tag)
    }
}

fn compile_logged(path: &str) -> Option<Locator> {
    match Locator::compile(path) {
        Ok(locator) => Some(locator),
        Err(err) => {
            tracing::debug!(%err, path, "locator did not compile");
            None
        }
    }
}
