//! Header line grammar
//!
//! A header line is, left to right:
//!
//!     tag names* (params)? [options]? "label"? :parser? {code} | { ? #comment?
//!
//! Only the tag is required, and the whole line must be consumed. Parameter and
//! option lists share the entry syntax: entries separated by commas or spaces,
//! each either a bare `key` (recorded as `key = "yes"`) or `key=value`, where the
//! value is a bare word or a quoted string.

use crate::tagtext::ast::params::Params;
use crate::tagtext::grammar::{Grammar, GrammarBundle, ParseResult, Rule};
use crate::tagtext::lexing::rules::fixed;
use crate::tagtext::lexing::Lexer;

/// Characters that end a bare word in a header
pub const HEADER_STOPS: &str = "\"(){}[],=:#";

/// Starts the trailing comment of a header line
pub const COMMENT_MARKER: char = '#';

pub type LineGrammar = GrammarBundle<Header>;

/// A decoded header line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub tag: String,
    /// Primary name followed by aliases
    pub names: Vec<String>,
    pub params: Params,
    pub options: Params,
    pub label: Option<String>,
    /// Name of the body grammar requested with `:name`
    pub parser: Option<String>,
    pub inline_code: Option<String>,
    /// Header ends with an opening bracket
    pub bracket: bool,
    pub comment: Option<String>,
}

impl Header {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }
}

/// The default header line grammar
pub fn line_grammar() -> LineGrammar {
    let lexer = Lexer::new(vec![
        fixed("ws", r"[ \t]+").silent(),
        fixed("string", r#""(?:[^"\\]|\\.)*""#).with_transform(|s| unescape(&s[1..s.len() - 1])),
        fixed("code", r"\{(?:[^{}]|\{[^{}]*\})*\}")
            .with_transform(|s| s[1..s.len() - 1].trim().to_string()),
        fixed("open_brace", r"\{").structural(),
        fixed("comment", "#.*").with_transform(|s| s[1..].trim().to_string()),
        fixed("lparen", r"\(").structural(),
        fixed("rparen", r"\)").structural(),
        fixed("lbracket", r"\[").structural(),
        fixed("rbracket", r"\]").structural(),
        fixed("comma", ",").structural(),
        fixed("equals", "=").structural(),
        fixed("colon", ":").structural(),
    ])
    .with_fallback_stops(HEADER_STOPS);

    let entries = Rule::seq(vec![
        Rule::reference("entry"),
        Rule::repeat(Rule::seq(vec![
            Rule::optional(Rule::token("comma")),
            Rule::reference("entry"),
        ])),
    ]);

    let grammar = Grammar::builder()
        .rule(
            "header",
            Rule::seq(vec![
                Rule::reference("tag"),
                Rule::reference("names"),
                Rule::optional(Rule::reference("params")),
                Rule::optional(Rule::reference("options")),
                Rule::optional(Rule::reference("label")),
                Rule::optional(Rule::reference("parser")),
                Rule::optional(Rule::choice(vec![
                    Rule::reference("code"),
                    Rule::reference("open"),
                ])),
                Rule::optional(Rule::reference("comment")),
                Rule::end(),
            ]),
        )
        .rule("tag", Rule::token("word"))
        .rule("names", Rule::repeat(Rule::token("word")))
        .rule(
            "params",
            Rule::seq(vec![
                Rule::token("lparen"),
                Rule::optional(Rule::reference("entries")),
                Rule::token("rparen"),
            ]),
        )
        .rule(
            "options",
            Rule::seq(vec![
                Rule::token("lbracket"),
                Rule::optional(Rule::reference("entries")),
                Rule::token("rbracket"),
            ]),
        )
        .rule("entries", entries)
        .rule(
            "entry",
            Rule::seq(vec![
                Rule::reference("key"),
                Rule::optional(Rule::seq(vec![
                    Rule::token("equals"),
                    Rule::reference("value"),
                ])),
            ]),
        )
        .rule("key", Rule::token("word"))
        .rule(
            "value",
            Rule::choice(vec![Rule::token("word"), Rule::token("string")]),
        )
        .rule("label", Rule::token("string"))
        .rule(
            "parser",
            Rule::seq(vec![Rule::token("colon"), Rule::reference("parser_name")]),
        )
        .rule("parser_name", Rule::token("word"))
        .rule("code", Rule::token("code"))
        .rule("open", Rule::token("open_brace"))
        .rule("comment", Rule::token("comment"))
        .build("header")
        .expect("header grammar is well formed");

    GrammarBundle::new(lexer, grammar, decode)
}

fn decode(tree: &ParseResult) -> Option<Header> {
    let text = |rule: &str| tree.find(rule).and_then(ParseResult::text).map(str::to_string);

    Some(Header {
        tag: text("tag")?,
        names: tree
            .find("names")
            .map(|names| names.texts().into_iter().map(str::to_string).collect())
            .unwrap_or_default(),
        params: tree.find("params").map(decode_entries).unwrap_or_default(),
        options: tree.find("options").map(decode_entries).unwrap_or_default(),
        label: text("label"),
        parser: text("parser_name"),
        inline_code: text("code"),
        bracket: tree.find("open").is_some(),
        comment: text("comment"),
    })
}

fn decode_entries(list: &ParseResult) -> Params {
    let mut params = Params::new();
    for entry in list.find_all("entry") {
        let Some(key) = entry.find("key").and_then(ParseResult::text) else {
            continue;
        };
        match entry.find("value").and_then(ParseResult::text) {
            Some(value) => params.insert(key, value),
            None => params.insert_flag(key),
        }
    }
    params
}

/// Resolve the escapes allowed inside quoted strings
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Quote `value` so that [`unescape`] gives it back
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Byte offset where the comment of a header line starts, or the line length
///
/// Comment markers inside quoted strings do not count.
pub fn comment_offset(content: &str) -> usize {
    let mut quoted = false;
    let mut escaped = false;
    for (offset, c) in content.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            COMMENT_MARKER if !quoted => return offset,
            _ => {}
        }
    }
    content.len()
}

/// Strip a leading suppression marker from a tag
pub fn split_marker<'a>(tag: &'a str, marker: &str) -> (&'a str, bool) {
    if marker.is_empty() {
        return (tag, false);
    }
    match tag.strip_prefix(marker) {
        Some(stripped) if !stripped.is_empty() => (stripped, true),
        _ => (tag, false),
    }
}
