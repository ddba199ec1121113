//! Parsing
//!
//!     Tagged text is parsed in two layers that never overlap.
//!
//!     The structural parser ([body](body)) only looks at lines and indentation. It
//!     cuts a block into tag entries (a header line plus the lines that belong to it)
//!     and literal fragments (blank runs, comments, stray text). It never looks
//!     inside a header.
//!
//!     The line parser ([header](header)) decodes one header line into its fields.
//!     It is an ordinary grammar bundle, so a handler can swap it out for its own.
//!
//!     Bodies are parsed one level at a time: each tag entry keeps its body as text
//!     with the body indentation stripped, and that text is parsed again when the
//!     node's own build reaches its body phase. This is what lets handlers pick a
//!     different body policy for their own subtree.

pub mod body;
pub mod header;

pub use body::{parse_body, BodyItem};
pub use header::{line_grammar, Header, LineGrammar};
