//! Node data model
//!
//!     A tree is an arena of [`Node`]s addressed by [`NodeId`]; the arena itself and
//!     everything that mutates it lives in [building](crate::tagtext::building).
//!
//!     Each node has an immutable tag, which selects its handler, plus the decoded
//!     header fields: a primary name and aliases, parameters and options (two
//!     separate [`Params`] namespaces), a label, a `:parser` marker, inline code, a
//!     bracket flag and a trailing comment. Its children are an ordered mix of nodes
//!     and literal text fragments, so non-tag text survives a round trip.
//!
//!     The structural projection used to compare trees is the [`Sketch`]; the
//!     serde-friendly description used to build trees from data is [`NodeSpec`].

pub mod diagnostics;
pub mod node;
pub mod params;
pub mod sketch;
pub mod spec;

pub use diagnostics::{Diagnostic, DiagnosticSeverity};
pub use node::{Action, BuildState, Child, Node, NodeId, Payload, RawBody};
pub use params::Params;
pub use sketch::Sketch;
pub use spec::{ChildSpec, NodeSpec};
