//! Output formats
//!
//! - [text]: the canonical tagged-text serializer; its output parses back into an
//!   equivalent tree.
//! - [treeviz]: a one-line-per-node view for debugging and snapshots.

pub mod text;
pub mod treeviz;

pub use text::{header_line, serialize, serialize_spec};
pub use treeviz::to_treeviz_str;
