//! Canonical text format
//!
//! Writes a subtree back as tagged text. Headers come out in canonical form:
//!
//!     [!]tag name aliases (k=v, flag) [k=v] "label" :parser {code} # comment
//!
//! with `{code}` replaced by the open bracket for bracket nodes, whose body is
//! followed by a line holding the close bracket. Bodies are indented one
//! `format.indent` per level. Expanded nodes are written from their children,
//! text fragments included; anything else is written from its raw body.
//! Runtime-only nodes are left out, so parsing the output and building it again
//! gives a tree with the same sketch.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tagtext::ast::node::NodeId;
use crate::tagtext::ast::params::FLAG_VALUE;
use crate::tagtext::ast::spec::{ChildSpec, NodeSpec};
use crate::tagtext::building::Tree;
use crate::tagtext::config::EngineConfig;
use crate::tagtext::parsing::header::{comment_offset, quote, COMMENT_MARKER};

/// Values that read back as a single bare word
static BARE_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[^\s"(){}\[\],=:#]+$"#).expect("bare value pattern compiles"));

/// Serialize `id` and its subtree; for the root only its body is written
pub fn serialize(tree: &Tree, id: NodeId) -> String {
    let spec = tree.to_spec(id);
    let mut out = String::new();
    let writer = Writer {
        config: tree.config(),
    };
    if id == tree.root() {
        writer.body(&mut out, &spec, 0);
    } else {
        writer.node(&mut out, &spec, 0);
    }
    out
}

/// Serialize a node description as it would appear at the top level
pub fn serialize_spec(spec: &NodeSpec, config: &EngineConfig) -> String {
    let mut out = String::new();
    Writer { config }.node(&mut out, spec, 0);
    out
}

/// The canonical header line of `spec`, without indentation or bracket
///
/// A header that could not be decoded is written back as it was found.
pub fn header_line(spec: &NodeSpec, config: &EngineConfig) -> String {
    if let Some(header) = &spec.header {
        return header.clone();
    }
    let mut parts = Vec::new();
    if spec.suppressed {
        parts.push(format!("{}{}", config.layout.suppress_marker, spec.tag));
    } else {
        parts.push(spec.tag.clone());
    }
    parts.extend(spec.name.iter().chain(&spec.aliases).cloned());
    if !spec.params.is_empty() {
        parts.push(format!("({})", entries(&spec.params)));
    }
    if !spec.options.is_empty() {
        parts.push(format!("[{}]", entries(&spec.options)));
    }
    if let Some(label) = &spec.label {
        parts.push(quote(label));
    }
    if let Some(parser) = &spec.parser {
        parts.push(format!(":{}", parser));
    }
    if let Some(code) = &spec.inline_code {
        parts.push(format!("{{{}}}", code));
    }
    if let Some(comment) = &spec.comment {
        parts.push(format!("{} {}", COMMENT_MARKER, comment));
    }
    parts.join(" ")
}

fn entries(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            if value == FLAG_VALUE {
                key.clone()
            } else if BARE_VALUE.is_match(value) {
                format!("{}={}", key, value)
            } else {
                format!("{}={}", key, quote(value))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

struct Writer<'a> {
    config: &'a EngineConfig,
}

impl Writer<'_> {
    fn indent(&self, depth: usize) -> String {
        self.config.format.indent.repeat(depth)
    }

    fn node(&self, out: &mut String, spec: &NodeSpec, depth: usize) {
        let layout = &self.config.layout;
        let bracket = spec.bracket && spec.inline_code.is_none();
        let header = header_line(spec, self.config);
        out.push_str(&self.indent(depth));
        if bracket {
            let (code, comment) = header.split_at(comment_offset(&header));
            out.push_str(code.trim_end());
            out.push(' ');
            out.push_str(&layout.open_bracket);
            if !comment.is_empty() {
                out.push(' ');
                out.push_str(comment);
            }
        } else {
            out.push_str(&header);
        }
        out.push('\n');

        self.body(out, spec, depth + 1);

        if bracket {
            out.push_str(&self.indent(depth));
            out.push_str(&layout.close_bracket);
            out.push('\n');
        }
    }

    fn body(&self, out: &mut String, spec: &NodeSpec, depth: usize) {
        if spec.children.is_empty() {
            if let Some(text) = &spec.body {
                self.lines(out, text, depth);
            }
            return;
        }
        for child in &spec.children {
            match child {
                ChildSpec::Text(text) => self.lines(out, text, depth),
                ChildSpec::Node(node) => self.node(out, node, depth),
            }
        }
    }

    fn lines(&self, out: &mut String, text: &str, depth: usize) {
        let indent = self.indent(depth);
        for line in text.lines() {
            if !line.is_empty() {
                out.push_str(&indent);
                out.push_str(line);
            }
            out.push('\n');
        }
    }
}
