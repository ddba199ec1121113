//! Tree construction and handler dispatch
//!
//!     [`Tree`] owns the node arena. Parsing a document creates a root node whose
//!     raw body is the whole text; building the root runs the lifecycle (see
//!     [lifecycle]) over every node, creating children from bodies on the way.
//!
//!     Handlers are looked up in a shared [`HandlerRegistry`]. Any node may override
//!     the handler of a tag for its own descendants, either statically through a
//!     [`HandlerSpec`]'s scoped table or at build time through
//!     [`BuildContext::override_handler`]. The nearest override wins.

pub mod handler;
pub mod lifecycle;
pub mod registry;
pub mod tree;

pub use handler::{BodyGrammar, BodyPolicy, BuildContext, HandlerSpec, NoopHandler, TagHandler};
pub use registry::HandlerRegistry;
pub use tree::Tree;
