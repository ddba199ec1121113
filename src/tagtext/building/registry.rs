//! The handler registry
//!
//! The registry is built once and shared, through an `Rc`, by every tree created
//! from it. It holds the default tag table, handlers scoped under ancestor tags,
//! named body grammars for `:parser` markers, and the default line grammar.

use std::collections::HashMap;
use std::rc::Rc;

use crate::tagtext::building::handler::{BodyGrammar, HandlerSpec};
use crate::tagtext::parsing::{line_grammar, LineGrammar};

pub struct HandlerRegistry {
    defaults: HashMap<String, Rc<HandlerSpec>>,
    scoped: HashMap<String, HashMap<String, Rc<HandlerSpec>>>,
    body_grammars: HashMap<String, Rc<BodyGrammar>>,
    line_grammar: Rc<LineGrammar>,
    generic: Rc<HandlerSpec>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            defaults: HashMap::new(),
            scoped: HashMap::new(),
            body_grammars: HashMap::new(),
            line_grammar: Rc::new(line_grammar()),
            generic: Rc::new(HandlerSpec::generic()),
        }
    }

    /// Set the default handler for `tag`
    pub fn register(&mut self, tag: impl Into<String>, spec: HandlerSpec) -> &mut Self {
        self.defaults.insert(tag.into(), Rc::new(spec));
        self
    }

    /// Set the handler for `tag` when it appears anywhere beneath an `ancestor` node
    pub fn register_scoped(
        &mut self,
        ancestor: impl Into<String>,
        tag: impl Into<String>,
        spec: HandlerSpec,
    ) -> &mut Self {
        self.scoped
            .entry(ancestor.into())
            .or_default()
            .insert(tag.into(), Rc::new(spec));
        self
    }

    /// Make `grammar` available to nodes carrying the `:name` marker
    pub fn register_body_grammar(
        &mut self,
        name: impl Into<String>,
        grammar: BodyGrammar,
    ) -> &mut Self {
        self.body_grammars.insert(name.into(), Rc::new(grammar));
        self
    }

    /// Replace the line grammar used for tags whose handler has none
    pub fn set_line_grammar(&mut self, grammar: LineGrammar) -> &mut Self {
        self.line_grammar = Rc::new(grammar);
        self
    }

    pub fn lookup(&self, tag: &str) -> Option<Rc<HandlerSpec>> {
        self.defaults.get(tag).cloned()
    }

    pub fn lookup_scoped(&self, ancestor: &str, tag: &str) -> Option<Rc<HandlerSpec>> {
        self.scoped.get(ancestor)?.get(tag).cloned()
    }

    pub fn body_grammar(&self, name: &str) -> Option<Rc<BodyGrammar>> {
        self.body_grammars.get(name).cloned()
    }

    pub fn line_grammar(&self) -> Rc<LineGrammar> {
        Rc::clone(&self.line_grammar)
    }

    pub fn generic(&self) -> Rc<HandlerSpec> {
        Rc::clone(&self.generic)
    }

    /// Freeze the registry for sharing between trees
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut defaults: Vec<_> = self.defaults.keys().collect();
        defaults.sort();
        let mut grammars: Vec<_> = self.body_grammars.keys().collect();
        grammars.sort();
        f.debug_struct("HandlerRegistry")
            .field("defaults", &defaults)
            .field("scoped", &self.scoped.len())
            .field("body_grammars", &grammars)
            .finish()
    }
}
