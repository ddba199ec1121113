//! Factories for trees and handlers used in tests

use std::any::Any;
use std::rc::Rc;

use crate::tagtext::ast::node::Payload;
use crate::tagtext::building::{BuildContext, HandlerRegistry, HandlerSpec, TagHandler, Tree};
use crate::tagtext::config::EngineConfig;
use crate::tagtext::error::BuildError;

type BuildFn = dyn Fn(&mut BuildContext<'_>) -> Result<Option<Payload>, BuildError>;

/// A handler whose payload comes from a closure
pub struct FnHandler {
    name: String,
    build: Box<BuildFn>,
}

impl FnHandler {
    pub fn new(
        name: impl Into<String>,
        build: impl Fn(&mut BuildContext<'_>) -> Result<Option<Payload>, BuildError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            build: Box::new(build),
        }
    }
}

impl TagHandler for FnHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn build_payload(&self, ctx: &mut BuildContext<'_>) -> Result<Option<Payload>, BuildError> {
        (self.build)(ctx)
    }
}

/// A handler spec whose payload comes from a closure
pub fn handler(
    name: &str,
    build: impl Fn(&mut BuildContext<'_>) -> Result<Option<Payload>, BuildError> + 'static,
) -> HandlerSpec {
    HandlerSpec::new(FnHandler::new(name, build))
}

/// A handler spec whose payload is always `value`
pub fn constant<T: Any + Clone>(name: &str, value: T) -> HandlerSpec {
    handler(name, move |_| Ok(Some(Rc::new(value.clone()) as Payload)))
}

/// Wrap any value as a payload
pub fn payload<T: Any>(value: T) -> Payload {
    Rc::new(value)
}

pub fn config() -> Rc<EngineConfig> {
    Rc::new(EngineConfig::default())
}

pub fn registry() -> Rc<HandlerRegistry> {
    HandlerRegistry::new().shared()
}

/// Parse `text` without building it
pub fn parse(text: &str) -> Tree {
    Tree::parse(text, registry(), config())
}

/// Parse and build `text` with no handlers registered
pub fn build(text: &str) -> Tree {
    Tree::build_text(text, registry(), config())
}

/// Parse and build `text` with the given handlers
pub fn build_with(text: &str, registry: HandlerRegistry) -> Tree {
    Tree::build_text(text, registry.shared(), config())
}
