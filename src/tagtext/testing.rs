//! Testing utilities for trees
//!
//! # Tree Testing Guidelines
//!
//! Assert on the shape and content of a tree, not on generalities like node
//! counts. The [assert_tree](fn@assert_tree) fluent API walks a built tree and
//! checks many nodes at once:
//!
//! ```rust-example
//! use crate::tagtext::testing::{assert_tree, factories};
//!
//! let tree = factories::build("group first \"A\"\n    item a \"Alpha\"\n");
//! assert_tree(&tree)
//!     .child_count(1)
//!     .child(0, |group| {
//!         group
//!             .tag("group")
//!             .name("first")
//!             .label("A")
//!             .child(0, |item| {
//!                 item.tag("item").label("Alpha");
//!             });
//!     });
//! ```
//!
//! Every assertion message carries the path of the node it failed on, such as
//! `root/group[0]/item[0]`.
//!
//! ## Factories
//!
//! [factories] builds trees with the default configuration, a shared registry,
//! or handlers made from closures, so tests do not repeat the setup.

mod testing_assertions;
mod testing_factories;

pub use testing_assertions::{assert_node, assert_tree, NodeAssertion};

// Public submodule path: crate::tagtext::testing::factories
pub mod factories {
    pub use super::testing_factories::*;
}
