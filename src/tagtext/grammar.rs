//! Grammar machinery
//!
//!     Everything that turns a token stream into structure goes through this module.
//!     It has three layers:
//!
//!     - [combinators](combinators): the primitive recognizers. A recognizer reads a
//!       [`TokenStream`](crate::tagtext::token::TokenStream) and returns either the
//!       matched value together with the remaining stream, or `None`. Recognizers
//!       never mutate the stream, so a failed branch costs nothing to undo.
//!     - [compiler](compiler): named rules written as [`Rule`] expressions, bound
//!       lazily through a shared rule table. Rules may reference each other in any
//!       order, including left recursively.
//!     - [bundle](bundle): a lexer, a compiled grammar and the input/output hooks
//!       that make one sublanguage (headers, locator paths, custom bodies).
//!
//!     Results are [`ParseResult`] trees. Named rules wrap their output as
//!     `Rule(name, inner)`, so the output of any grammar describes itself and the
//!     transform hook can pick it apart with [`ParseResult::find`].

pub mod bundle;
pub mod combinators;
pub mod compiler;
pub mod result;

pub use bundle::GrammarBundle;
pub use combinators::{Match, Recognizer, Separator};
pub use compiler::{Grammar, GrammarBuilder, Rule};
pub use result::ParseResult;
