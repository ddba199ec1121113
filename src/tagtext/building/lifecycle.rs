//! Build lifecycle
//!
//!     Building a node runs its phases in a fixed order, each at most once:
//!
//!         Unparsed -> HeaderDecoded -> BodyParsed -> PayloadBuilt
//!                  -> ChildrenBuilt -> Registered -> Built
//!
//!     Decoding the header runs the line grammar (the handler's, or the registry
//!     default) over the stored header text. Parsing the body turns the raw body
//!     into children, unless the node is suppressed or carries inline code. The
//!     handler then builds the payload, the children are built recursively, and the
//!     handler gets its register and post-build hooks. Calling `build` again on a
//!     node that is built, or being built, returns the payload it has so far.
//!
//!     Handler errors never abort a build. They are stored on the node as
//!     diagnostics and the lifecycle carries on with the next phase.
//!
//!     Handler resolution looks for the nearest override of the node's tag, walking
//!     from the parent up to the root. At each ancestor it checks, in order, the
//!     overrides set on that node, the scoped table of the ancestor's own handler,
//!     and the registry's handlers scoped under the ancestor's tag. If no ancestor
//!     overrides the tag, the registry default applies, and failing that the
//!     generic no-op handler. The result is cached on the node.

use std::rc::Rc;

use crate::tagtext::ast::diagnostics::{
    Diagnostic, BODY_PARSE_FAILED, HEADER_PARSE_FAILED, UNKNOWN_PARSER,
};
use crate::tagtext::ast::node::{BuildState, NodeId, Payload, RawBody};
use crate::tagtext::ast::spec::ChildSpec;
use crate::tagtext::building::handler::{BodyPolicy, BuildContext, HandlerSpec};
use crate::tagtext::building::tree::Tree;
use crate::tagtext::error::BuildError;
use crate::tagtext::parsing::{parse_body, BodyItem};

impl Tree {
    /// Run the build lifecycle of `id` and its subtree, returning the payload
    pub fn build(&mut self, id: NodeId) -> Option<Payload> {
        let state = self.node(id).state();
        if state != BuildState::Unparsed {
            return self.node(id).payload().cloned();
        }

        self.decode_header(id);
        self.parse_node_body(id);
        self.build_payload(id);
        self.build_children(id);
        self.register_with_parent(id);
        self.post_build(id);
        self.advance(id, BuildState::Built);

        self.node(id).payload().cloned()
    }

    /// The handler spec governing `id`
    pub fn resolve_handler(&mut self, id: NodeId) -> Rc<HandlerSpec> {
        if let Some(spec) = &self.node(id).handler {
            return Rc::clone(spec);
        }

        let tag = self.node(id).tag().to_string();
        let mut found = None;
        let ancestors: Vec<NodeId> = self.ancestors(id).collect();
        for ancestor in ancestors {
            if let Some(spec) = self.node(ancestor).overrides.get(&tag) {
                found = Some(Rc::clone(spec));
                break;
            }
            let ancestor_spec = self.resolve_handler(ancestor);
            if let Some(spec) = ancestor_spec.scoped.get(&tag) {
                found = Some(Rc::clone(spec));
                break;
            }
            if let Some(spec) = self.registry().lookup_scoped(self.node(ancestor).tag(), &tag) {
                found = Some(spec);
                break;
            }
        }

        let spec = found
            .or_else(|| self.registry().lookup(&tag))
            .unwrap_or_else(|| self.registry().generic());
        tracing::trace!(node = %id, tag = %tag, handler = spec.handler.name(), "handler resolved");
        self.node_mut(id).handler = Some(Rc::clone(&spec));
        spec
    }

    fn advance(&mut self, id: NodeId, state: BuildState) {
        let node = self.node_mut(id);
        if node.state < state {
            node.state = state;
            tracing::trace!(node = %id, tag = node.tag(), ?state, "build phase complete");
        }
    }

    fn decode_header(&mut self, id: NodeId) {
        let Some(text) = self.node(id).header_text.clone() else {
            self.advance(id, BuildState::HeaderDecoded);
            return;
        };
        let grammar = match self.resolve_handler(id).line_grammar.clone() {
            Some(grammar) => grammar,
            None => self.registry().line_grammar(),
        };
        match grammar.parse(&text) {
            Some(header) => self.node_mut(id).apply_header(header),
            None => {
                tracing::debug!(node = %id, header = %text, "header line not decodable");
                self.node_mut(id).annotate(
                    Diagnostic::warning(format!("cannot decode header {:?}", text))
                        .with_code(HEADER_PARSE_FAILED),
                );
            }
        }
        self.advance(id, BuildState::HeaderDecoded);
    }

    fn parse_node_body(&mut self, id: NodeId) {
        let node = self.node(id);
        if node.suppressed || node.inline_code.is_some() {
            self.advance(id, BuildState::BodyParsed);
            return;
        }

        let runtime_only = node.runtime_only;
        match node.body.clone() {
            RawBody::Structured(children) => {
                for child in &children {
                    match child {
                        ChildSpec::Node(spec) => {
                            self.spawn_spec(id, spec, runtime_only);
                        }
                        ChildSpec::Text(text) => {
                            self.spawn_item(id, BodyItem::Text(text.clone()), runtime_only);
                        }
                    }
                }
                self.node_mut(id).expanded = true;
            }
            RawBody::Text(text) => {
                if let Some(items) = self.body_items(id, &text) {
                    for item in items {
                        self.spawn_item(id, item, runtime_only);
                    }
                    self.node_mut(id).expanded = true;
                }
            }
        }
        self.advance(id, BuildState::BodyParsed);
    }

    /// Body items for `text`, or `None` when the body stays raw
    fn body_items(&mut self, id: NodeId, text: &str) -> Option<Vec<BodyItem>> {
        let spec = self.resolve_handler(id);

        let mut policy = spec.body.clone();
        if let Some(marker) = self.node(id).parser.clone() {
            match self.registry().body_grammar(&marker) {
                Some(grammar) => policy = BodyPolicy::Grammar(grammar),
                None => self.node_mut(id).annotate(
                    Diagnostic::warning(format!("no body grammar named {:?}", marker))
                        .with_code(UNKNOWN_PARSER),
                ),
            }
        }

        match policy {
            BodyPolicy::Freeform => None,
            BodyPolicy::Grammar(grammar) => {
                let items = grammar.parse(text);
                if items.is_none() {
                    self.node_mut(id).annotate(
                        Diagnostic::warning("body rejected by its grammar")
                            .with_code(BODY_PARSE_FAILED),
                    );
                }
                items
            }
            BodyPolicy::Structural => {
                let layout = &self.config().layout;
                if layout.is_freeform(self.node(id).tag()) {
                    None
                } else {
                    Some(parse_body(text, layout))
                }
            }
        }
    }

    fn build_payload(&mut self, id: NodeId) {
        let spec = self.resolve_handler(id);
        let result = spec.handler.build_payload(&mut BuildContext::new(self, id));
        match result {
            Ok(payload) => {
                if payload.is_some() {
                    self.node_mut(id).payload = payload;
                }
            }
            Err(err) => self.record(id, err),
        }
        self.advance(id, BuildState::PayloadBuilt);
    }

    fn build_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.child_nodes(id).collect();
        for child in children {
            self.build(child);
        }
        self.advance(id, BuildState::ChildrenBuilt);
    }

    fn register_with_parent(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            let spec = self.resolve_handler(id);
            let result = spec
                .handler
                .register_with_parent(&mut BuildContext::new(self, id), parent);
            if let Err(err) = result {
                self.record(id, err);
            }
        }
        self.advance(id, BuildState::Registered);
    }

    fn post_build(&mut self, id: NodeId) {
        let spec = self.resolve_handler(id);
        if let Err(err) = spec.handler.post_build(&mut BuildContext::new(self, id)) {
            self.record(id, err);
        }
    }

    fn record(&mut self, id: NodeId, err: BuildError) {
        tracing::debug!(
            node = %id,
            tag = self.node(id).tag(),
            code = %err.code,
            %err,
            "handler reported a build error"
        );
        self.node_mut(id).annotate(Diagnostic::from(err));
    }
}
