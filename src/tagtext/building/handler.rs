//! Tag handlers
//!
//! A handler gives a tag its meaning. The lifecycle calls it at three points:
//! after the node's body is parsed ([`TagHandler::build_payload`]), after its
//! children are built ([`TagHandler::register_with_parent`]) and last of all
//! ([`TagHandler::post_build`]). Every hook has a no-op default, so a handler only
//! implements what it needs.
//!
//! A [`HandlerSpec`] bundles a handler with the grammar choices for its tag and
//! with the overrides it declares for tags nested beneath it.

use std::collections::HashMap;
use std::rc::Rc;

use crate::tagtext::ast::diagnostics::Diagnostic;
use crate::tagtext::ast::node::{Action, Node, NodeId, Payload};
use crate::tagtext::building::tree::Tree;
use crate::tagtext::error::BuildError;
use crate::tagtext::grammar::GrammarBundle;
use crate::tagtext::parsing::{BodyItem, LineGrammar};

/// A grammar that turns a node body into body items
pub type BodyGrammar = GrammarBundle<Vec<BodyItem>>;

pub trait TagHandler {
    fn name(&self) -> &str {
        "generic"
    }

    fn build_payload(&self, _ctx: &mut BuildContext<'_>) -> Result<Option<Payload>, BuildError> {
        Ok(None)
    }

    fn register_with_parent(
        &self,
        _ctx: &mut BuildContext<'_>,
        _parent: NodeId,
    ) -> Result<(), BuildError> {
        Ok(())
    }

    fn post_build(&self, _ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        Ok(())
    }
}

/// The handler used for tags nobody registered
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl TagHandler for NoopHandler {}

/// How a node's body text becomes children
#[derive(Clone, Default)]
pub enum BodyPolicy {
    /// Indentation-driven child parsing
    #[default]
    Structural,
    /// The body stays raw text
    Freeform,
    Grammar(Rc<BodyGrammar>),
}

/// A handler and its grammar overrides
#[derive(Clone)]
pub struct HandlerSpec {
    pub handler: Rc<dyn TagHandler>,
    pub line_grammar: Option<Rc<LineGrammar>>,
    pub body: BodyPolicy,
    /// Handlers for tags declared anywhere beneath nodes handled by this spec
    pub scoped: HashMap<String, Rc<HandlerSpec>>,
}

impl HandlerSpec {
    pub fn new(handler: impl TagHandler + 'static) -> Self {
        Self::from_rc(Rc::new(handler))
    }

    pub fn from_rc(handler: Rc<dyn TagHandler>) -> Self {
        Self {
            handler,
            line_grammar: None,
            body: BodyPolicy::Structural,
            scoped: HashMap::new(),
        }
    }

    pub fn generic() -> Self {
        Self::new(NoopHandler)
    }

    pub fn with_line_grammar(mut self, grammar: LineGrammar) -> Self {
        self.line_grammar = Some(Rc::new(grammar));
        self
    }

    pub fn freeform(mut self) -> Self {
        self.body = BodyPolicy::Freeform;
        self
    }

    pub fn with_body_grammar(mut self, grammar: BodyGrammar) -> Self {
        self.body = BodyPolicy::Grammar(Rc::new(grammar));
        self
    }

    /// Override the handler of `tag` for nodes nested under this one
    pub fn scope(mut self, tag: impl Into<String>, spec: HandlerSpec) -> Self {
        self.scoped.insert(tag.into(), Rc::new(spec));
        self
    }
}

impl std::fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = match &self.body {
            BodyPolicy::Structural => "structural",
            BodyPolicy::Freeform => "freeform",
            BodyPolicy::Grammar(_) => "grammar",
        };
        let mut scoped: Vec<_> = self.scoped.keys().collect();
        scoped.sort();
        f.debug_struct("HandlerSpec")
            .field("handler", &self.handler.name())
            .field("line_grammar", &self.line_grammar.is_some())
            .field("body", &body)
            .field("scoped", &scoped)
            .finish()
    }
}

/// What a handler sees of the tree while one of its hooks runs
pub struct BuildContext<'a> {
    tree: &'a mut Tree,
    id: NodeId,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(tree: &'a mut Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &Node {
        self.tree.node(self.id)
    }

    pub fn node_mut(&mut self) -> &mut Node {
        self.tree.node_mut(self.id)
    }

    pub fn tree(&self) -> &Tree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut *self.tree
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.tree.parent(self.id)
    }

    /// Payloads of the node's children that have one, in order
    pub fn child_payloads(&self) -> Vec<(NodeId, Payload)> {
        self.tree
            .child_nodes(self.id)
            .filter_map(|child| Some((child, self.tree.node(child).payload()?.clone())))
            .collect()
    }

    /// Override the handler of `tag` for this node's descendants
    pub fn override_handler(&mut self, tag: impl Into<String>, spec: HandlerSpec) {
        self.tree.override_handler(self.id, tag, spec);
    }

    pub fn set_action(&mut self, action: Action) {
        self.tree.set_action(self.id, action);
    }

    pub fn annotate(&mut self, diagnostic: Diagnostic) {
        self.node_mut().annotate(diagnostic);
    }
}
