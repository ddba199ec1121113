//! Lexing
//!
//!     Two tokenizers live here, serving different stages.
//!
//!     The rule lexer ([lexer](lexer)) is the generic one the grammar machinery runs
//!     on. It is configured with an ordered list of named rules, each a regex anchored
//!     at the current position, and the first rule that matches wins. Ordering encodes
//!     priority rather than longest match, so specific patterns go before general
//!     ones. When nothing matches, a fallback consumes a maximal run of ordinary
//!     characters as a `word` token. Each sublanguage (headers, locator paths, custom
//!     body grammars) brings its own rule set.
//!
//!     The layout scanner ([layout](layout)) is a logos lexer that only knows about
//!     whitespace, newlines and everything else. The structural body parser uses it to
//!     turn a block into physical lines with their indentation measured in columns.
//!     Keeping indentation out of the rule lexer means no header grammar ever has to
//!     think about line structure.

pub mod layout;
pub mod lexer;
pub mod rules;

pub use layout::{split_lines, LayoutLine, LayoutToken};
pub use lexer::{Lexer, Tokens};
pub use rules::{LexRule, Transform};
