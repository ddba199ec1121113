//! Nodes
//!
//! Nodes live in the arena of a [`Tree`](crate::tagtext::building::Tree) and refer
//! to each other by [`NodeId`]. A node starts out holding only its raw header and
//! body text; the build lifecycle fills in the decoded fields, its children and
//! finally the payload produced by its handler.

use std::any::Any;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::tagtext::ast::diagnostics::{Diagnostic, HEADER_PARSE_FAILED};
use crate::tagtext::ast::params::Params;
use crate::tagtext::ast::spec::ChildSpec;
use crate::tagtext::building::{HandlerSpec, Tree};
use crate::tagtext::parsing::Header;

/// Index of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Build lifecycle, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildState {
    Unparsed,
    HeaderDecoded,
    BodyParsed,
    PayloadBuilt,
    ChildrenBuilt,
    Registered,
    Built,
}

/// Domain object produced by a handler
pub type Payload = Rc<dyn Any>;

/// An invocable action attached to a node
pub type Action = Rc<dyn Fn(&Tree, NodeId) -> Option<Payload>>;

/// Body as it was supplied, before the body phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBody {
    Text(String),
    Structured(Vec<ChildSpec>),
}

impl RawBody {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawBody::Text(text) => Some(text),
            RawBody::Structured(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(NodeId),
    Text(String),
}

pub struct Node {
    tag: String,
    /// Header line as written, minus any bracket opener
    pub header_text: Option<String>,
    pub name: Option<String>,
    pub aliases: Vec<String>,
    pub params: Params,
    pub options: Params,
    pub label: Option<String>,
    pub parser: Option<String>,
    pub inline_code: Option<String>,
    pub bracket: bool,
    pub comment: Option<String>,
    pub suppressed: bool,
    pub body: RawBody,
    /// Whether the body was turned into children
    pub expanded: bool,
    pub runtime_only: bool,
    /// Handler-private data
    pub bag: BTreeMap<String, serde_json::Value>,
    pub diagnostics: Vec<Diagnostic>,
    pub(crate) children: Vec<Child>,
    pub(crate) parent: NodeId,
    pub(crate) state: BuildState,
    pub(crate) payload: Option<Payload>,
    pub(crate) action: Option<Action>,
    pub(crate) overrides: HashMap<String, Rc<HandlerSpec>>,
    pub(crate) handler: Option<Rc<HandlerSpec>>,
}

impl Node {
    pub(crate) fn new(tag: impl Into<String>, parent: NodeId, body: RawBody) -> Self {
        Self {
            tag: tag.into(),
            header_text: None,
            name: None,
            aliases: Vec::new(),
            params: Params::new(),
            options: Params::new(),
            label: None,
            parser: None,
            inline_code: None,
            bracket: false,
            comment: None,
            suppressed: false,
            body,
            expanded: false,
            runtime_only: false,
            bag: BTreeMap::new(),
            diagnostics: Vec::new(),
            children: Vec::new(),
            parent,
            state: BuildState::Unparsed,
            payload: None,
            action: None,
            overrides: HashMap::new(),
            handler: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn is_built(&self) -> bool {
        self.state == BuildState::Built
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Primary name followed by the aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name
            .iter()
            .chain(self.aliases.iter())
            .map(String::as_str)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    /// Look up an attribute: parameters, then options, then `name`, `label`, `tag`
    pub fn attribute(&self, key: &str) -> Option<Cow<'_, str>> {
        if let Some(value) = self.params.get(key).or_else(|| self.options.get(key)) {
            return Some(Cow::Borrowed(value));
        }
        match key {
            "name" => self.name.as_deref().map(Cow::Borrowed),
            "label" => self.label.as_deref().map(Cow::Borrowed),
            "tag" => Some(Cow::Borrowed(self.tag.as_str())),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// The payload, if it has type `T`
    pub fn payload_as<T: 'static>(&self) -> Option<Rc<T>> {
        self.payload.clone()?.downcast::<T>().ok()
    }

    pub fn is_callable(&self) -> bool {
        self.action.is_some()
    }

    /// Name of the handler resolved for this node, once resolved
    pub fn handler_name(&self) -> Option<&str> {
        self.handler.as_ref().map(|spec| spec.handler.name())
    }

    /// The header line was present but could not be decoded
    pub fn header_failed(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.has_code(HEADER_PARSE_FAILED))
    }

    pub fn annotate(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Copy the decoded header fields onto the node; the tag never changes
    pub(crate) fn apply_header(&mut self, header: Header) {
        let mut names = header.names.into_iter();
        self.name = names.next();
        self.aliases = names.collect();
        self.params = header.params;
        self.options = header.options;
        self.label = header.label;
        self.parser = header.parser;
        self.inline_code = header.inline_code;
        self.bracket |= header.bracket;
        self.comment = header.comment;
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("params", &self.params)
            .field("options", &self.options)
            .field("label", &self.label)
            .field("state", &self.state)
            .field("children", &self.children)
            .field("runtime_only", &self.runtime_only)
            .field("payload", &self.payload.is_some())
            .field("callable", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        let mut node = Node::new("field", NodeId(0), RawBody::Text(String::new()));
        node.name = Some("email".into());
        node.aliases = vec!["mail".into()];
        node.params.insert("type", "text");
        node.options.insert("type", "ignored");
        node.options.insert("width", "20");
        node.label = Some("E-mail".into());
        node
    }

    #[test]
    fn test_attribute_lookup_order() {
        let node = node();
        assert_eq!(node.attribute("type").as_deref(), Some("text"));
        assert_eq!(node.attribute("width").as_deref(), Some("20"));
        assert_eq!(node.attribute("name").as_deref(), Some("email"));
        assert_eq!(node.attribute("label").as_deref(), Some("E-mail"));
        assert_eq!(node.attribute("tag").as_deref(), Some("field"));
        assert_eq!(node.attribute("missing"), None);
    }

    #[test]
    fn test_names() {
        let node = node();
        assert_eq!(node.names().collect::<Vec<_>>(), vec!["email", "mail"]);
        assert!(node.has_name("mail"));
        assert!(!node.has_name("field"));
    }

    #[test]
    fn test_payload_downcast() {
        let mut node = node();
        node.payload = Some(Rc::new(42_u32));
        assert_eq!(node.payload_as::<u32>().as_deref(), Some(&42));
        assert!(node.payload_as::<String>().is_none());
    }

    #[test]
    fn test_states_are_ordered() {
        assert!(BuildState::Unparsed < BuildState::HeaderDecoded);
        assert!(BuildState::ChildrenBuilt < BuildState::Registered);
        assert!(BuildState::Registered < BuildState::Built);
    }
}
