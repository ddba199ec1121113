//! # tagtext
//!
//! A declarative structure engine: programs describe nested, named, parameterized
//! elements as tagged, indented text, and the engine turns that text into a live
//! tree whose nodes get their meaning from pluggable, ancestry-scoped handlers.
//!
//! File Layout
//!
//!     src/tagtext
//!       ├── lexing      Rule-driven lexer and the logos layout scanner
//!       ├── grammar     Combinator primitives, grammar compiler, grammar bundles
//!       ├── parsing     Header (line) grammar and the structural body parser
//!       ├── ast         Nodes, parameters, sketches, structured specs, diagnostics
//!       ├── building    Tree arena, handler registry and the build lifecycle
//!       ├── locator     Path sublanguage and tree search
//!       └── formats     Canonical text serializer and treeviz
//!
//! For testing guidelines, see the [testing module](tagtext::testing).

pub mod tagtext;
