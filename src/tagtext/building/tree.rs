//! The tree arena
//!
//! A [`Tree`] owns its nodes in a vector and hands out [`NodeId`]s. Node 0 is the
//! root, whose parent is itself. Nodes are only ever appended, so ids stay valid
//! for the life of the tree.

use std::rc::Rc;

use crate::tagtext::ast::diagnostics::Diagnostic;
use crate::tagtext::ast::node::{Action, Child, Node, NodeId, Payload, RawBody};
use crate::tagtext::ast::sketch::Sketch;
use crate::tagtext::ast::spec::{ChildSpec, NodeSpec};
use crate::tagtext::ast::Params;
use crate::tagtext::building::handler::HandlerSpec;
use crate::tagtext::building::registry::HandlerRegistry;
use crate::tagtext::config::EngineConfig;
use crate::tagtext::parsing::header::{split_marker, HEADER_STOPS};
use crate::tagtext::parsing::{parse_body, BodyItem};

pub struct Tree {
    nodes: Vec<Node>,
    registry: Rc<HandlerRegistry>,
    config: Rc<EngineConfig>,
}

impl Tree {
    /// A tree whose root holds `text` as its unparsed body
    pub fn parse(text: &str, registry: Rc<HandlerRegistry>, config: Rc<EngineConfig>) -> Self {
        let root = Node::new(
            config.tree.root_tag.clone(),
            NodeId(0),
            RawBody::Text(text.to_string()),
        );
        Self {
            nodes: vec![root],
            registry,
            config,
        }
    }

    /// Parse and build `text` in one go
    pub fn build_text(text: &str, registry: Rc<HandlerRegistry>, config: Rc<EngineConfig>) -> Self {
        let mut tree = Self::parse(text, registry, config);
        tree.build(tree.root());
        tree
    }

    /// A tree whose root is described by `spec`; the root is not built yet
    pub fn from_spec(spec: &NodeSpec, registry: Rc<HandlerRegistry>, config: Rc<EngineConfig>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            registry,
            config,
        };
        tree.push(node_from_spec(spec, NodeId(0), false));
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn registry(&self) -> &Rc<HandlerRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    ///
    /// If `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Parent of `id`; `None` for the root
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent;
        (parent != id).then_some(parent)
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Direct node children of `id`, in order
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().filter_map(|child| match child {
            Child::Node(child) => Some(*child),
            Child::Text(_) => None,
        })
    }

    /// All nodes below `id` in pre-order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_nodes(id).collect();
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut children: Vec<NodeId> = self.child_nodes(next).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Depth of `id` below the root
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    pub fn sketch(&self, id: NodeId) -> Sketch {
        Sketch::of(self, id)
    }

    /// Every diagnostic recorded in the tree, in arena order
    pub fn diagnostics(&self) -> Vec<(NodeId, &Diagnostic)> {
        self.nodes
            .iter()
            .enumerate()
            .flat_map(|(index, node)| node.diagnostics.iter().map(move |d| (NodeId(index), d)))
            .collect()
    }

    /// Override the handler of `tag` for every descendant of `id`
    ///
    /// Takes effect for nodes whose handler has not been resolved yet, which
    /// includes the children of a node whose payload is being built.
    pub fn override_handler(&mut self, id: NodeId, tag: impl Into<String>, spec: HandlerSpec) {
        self.node_mut(id).overrides.insert(tag.into(), Rc::new(spec));
    }

    pub fn set_action(&mut self, id: NodeId, action: Action) {
        self.node_mut(id).action = Some(action);
    }

    pub fn is_callable(&self, id: NodeId) -> bool {
        self.node(id).is_callable()
    }

    /// Run the node's action; `None` if it has none
    pub fn invoke(&self, id: NodeId) -> Option<Payload> {
        let action = self.node(id).action.clone()?;
        tracing::debug!(node = %id, tag = self.node(id).tag(), "invoking node action");
        action(self, id)
    }

    /// Parse `text` at runtime and append the resulting nodes under `parent`
    ///
    /// The new nodes are runtime-only: they are built immediately and can be
    /// located, but the text serializer and sketches leave them out. Text
    /// fragments in `text` are dropped.
    pub fn insert_text(&mut self, parent: NodeId, text: &str) -> Vec<NodeId> {
        let items = parse_body(text, &self.config.layout);
        let mut inserted = Vec::new();
        for item in items {
            if let BodyItem::Tag { .. } = item {
                if let Child::Node(id) = self.spawn_item(parent, item, true) {
                    inserted.push(id);
                }
            }
        }
        for id in &inserted {
            self.build(*id);
        }
        tracing::debug!(parent = %parent, count = inserted.len(), "inserted runtime nodes");
        inserted
    }

    /// Append a runtime-only node described by `spec` under `parent` and build it
    pub fn insert_spec(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        let id = self.spawn_spec(parent, spec, true);
        self.build(id);
        id
    }

    /// Export a node and its subtree, runtime-only nodes excluded
    pub fn to_spec(&self, id: NodeId) -> NodeSpec {
        let node = self.node(id);
        let mut spec = NodeSpec {
            tag: node.tag().to_string(),
            suppressed: node.suppressed,
            header: node
                .header_text
                .clone()
                .filter(|_| node.header_failed()),
            name: node.name.clone(),
            aliases: node.aliases.clone(),
            params: node.params.to_pairs(),
            options: node.options.to_pairs(),
            label: node.label.clone(),
            parser: node.parser.clone(),
            inline_code: node.inline_code.clone(),
            bracket: node.bracket,
            comment: node.comment.clone(),
            body: None,
            children: Vec::new(),
        };
        if node.expanded {
            for child in &node.children {
                match child {
                    Child::Text(text) => spec.children.push(ChildSpec::Text(text.clone())),
                    Child::Node(child) if !self.node(*child).runtime_only => {
                        spec.children.push(ChildSpec::Node(self.to_spec(*child)))
                    }
                    Child::Node(_) => {}
                }
            }
        } else {
            match &node.body {
                RawBody::Text(text) if !text.is_empty() => spec.body = Some(text.clone()),
                RawBody::Text(_) => {}
                RawBody::Structured(children) => spec.children = children.clone(),
            }
        }
        spec
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Create the child described by a body item and append it to `parent`
    pub(crate) fn spawn_item(
        &mut self,
        parent: NodeId,
        item: BodyItem,
        runtime_only: bool,
    ) -> Child {
        let child = match item {
            BodyItem::Text(text) => Child::Text(text),
            BodyItem::Tag {
                header,
                body,
                bracket,
            } => {
                let raw_tag = header
                    .split(|c: char| c.is_whitespace() || HEADER_STOPS.contains(c))
                    .next()
                    .unwrap_or_default();
                let (tag, suppressed) = split_marker(raw_tag, &self.config.layout.suppress_marker);
                let mut node = Node::new(tag, parent, RawBody::Text(body));
                node.header_text = Some(header);
                node.bracket = bracket;
                node.suppressed = suppressed;
                node.runtime_only = runtime_only;
                Child::Node(self.push(node))
            }
        };
        self.node_mut(parent).children.push(child.clone());
        child
    }

    /// Create the node described by `spec` and append it to `parent`
    pub(crate) fn spawn_spec(&mut self, parent: NodeId, spec: &NodeSpec, runtime_only: bool) -> NodeId {
        let id = self.push(node_from_spec(spec, parent, runtime_only));
        self.node_mut(parent).children.push(Child::Node(id));
        id
    }
}

fn node_from_spec(spec: &NodeSpec, parent: NodeId, runtime_only: bool) -> Node {
    let body = if spec.children.is_empty() {
        RawBody::Text(spec.body.clone().unwrap_or_default())
    } else {
        RawBody::Structured(spec.children.clone())
    };
    let mut node = Node::new(spec.tag.clone(), parent, body);
    node.name = spec.name.clone();
    node.aliases = spec.aliases.clone();
    node.params = spec.params.iter().cloned().collect::<Params>();
    node.options = spec.options.iter().cloned().collect::<Params>();
    node.label = spec.label.clone();
    node.parser = spec.parser.clone();
    node.inline_code = spec.inline_code.clone();
    node.bracket = spec.bracket;
    node.comment = spec.comment.clone();
    node.suppressed = spec.suppressed;
    node.header_text = spec.header.clone();
    node.runtime_only = runtime_only;
    node
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.nodes)
            .field("registry", &self.registry)
            .finish()
    }
}
