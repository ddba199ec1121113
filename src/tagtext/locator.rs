//! Locating nodes
//!
//!     A locator is a small path language for addressing nodes in a built tree:
//!
//!         menu.group[recent]/entry(2)
//!         *[label=~"^Q"]
//!
//!     Paths are compiled once ([`Locator::compile`]) by a grammar bundle running on
//!     the same machinery as header lines, then resolved with [`find`] (strict
//!     descent) or [`first`] (search anywhere below the start). [`search_all`]
//!     collects every node with a given tag.
//!
//!     The `Tree` convenience methods of the same names compile the path on the fly
//!     and report any failure, compile errors included, as `None`.

pub mod path;
pub mod search;

pub use path::{Locator, Selector, Step, ANY_TAG};
pub use search::{find, first, search_all};
