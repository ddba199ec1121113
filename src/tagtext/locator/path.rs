//! Locator paths
//!
//! A path is a list of steps separated by `.` or `/`. Each step names a tag (or
//! `*` for any tag) and may narrow it with one selector:
//!
//!     tag[name]            name or alias equals `name`
//!     tag[attr=value]      attribute equals `value`
//!     tag[attr=~pattern]   attribute matches the regex `pattern`
//!     tag(n)               the nth child with that tag, counting from 1
//!
//! Values are bare words or quoted strings. A pattern containing any of
//! `. / [ ] ( ) =` has to be quoted.

use regex::Regex;

use crate::tagtext::ast::node::Node;
use crate::tagtext::error::LocatorError;
use crate::tagtext::grammar::{Grammar, GrammarBundle, ParseResult, Rule};
use crate::tagtext::lexing::rules::fixed;
use crate::tagtext::lexing::Lexer;
use crate::tagtext::parsing::header::unescape;

/// Tag written in a step to accept any tag
pub const ANY_TAG: &str = "*";

const PATH_STOPS: &str = "./[]()=\"";

thread_local! {
    static PATH_GRAMMAR: GrammarBundle<Vec<RawStep>> = path_grammar();
}

/// How a step narrows the nodes carrying its tag
#[derive(Debug, Clone)]
pub enum Selector {
    Any,
    Name(String),
    AttrEq { key: String, value: String },
    AttrMatch { key: String, pattern: Regex },
    /// 1-based position among the siblings with the step's tag
    Nth(usize),
}

#[derive(Debug, Clone)]
pub struct Step {
    pub tag: String,
    pub selector: Selector,
}

impl Step {
    pub fn accepts_tag(&self, tag: &str) -> bool {
        self.tag == ANY_TAG || self.tag == tag
    }

    /// Whether `node` passes the tag test and any filtering selector
    ///
    /// Positional selectors depend on siblings, so they are not checked here.
    pub fn accepts(&self, node: &Node) -> bool {
        if !self.accepts_tag(node.tag()) {
            return false;
        }
        match &self.selector {
            Selector::Any | Selector::Nth(_) => true,
            Selector::Name(name) => node.has_name(name),
            Selector::AttrEq { key, value } => {
                node.attribute(key).is_some_and(|found| found == value.as_str())
            }
            Selector::AttrMatch { key, pattern } => {
                node.attribute(key).is_some_and(|found| pattern.is_match(&found))
            }
        }
    }
}

/// A compiled locator path
#[derive(Debug, Clone)]
pub struct Locator {
    source: String,
    steps: Vec<Step>,
}

impl Locator {
    pub fn compile(path: &str) -> Result<Self, LocatorError> {
        PATH_GRAMMAR.with(|grammar| {
            let stream = grammar.lexer().stream(path)?;
            let raw = grammar
                .grammar()
                .parse(&stream)
                .and_then(|tree| decode(&tree))
                .ok_or_else(|| LocatorError::Syntax(path.to_string()))?;
            let steps = raw
                .into_iter()
                .map(|step| step.compile(path))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Self {
                source: path.to_string(),
                steps,
            })
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Locator {
    type Err = LocatorError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Self::compile(path)
    }
}

/// A step as parsed, before patterns and positions are checked
#[derive(Debug, Clone, PartialEq, Eq)]
enum RawStep {
    Plain(String),
    Name(String, String),
    AttrEq(String, String, String),
    AttrMatch(String, String, String),
    Nth(String, String),
}

impl RawStep {
    fn compile(self, path: &str) -> Result<Step, LocatorError> {
        let (tag, selector) = match self {
            RawStep::Plain(tag) => (tag, Selector::Any),
            RawStep::Name(tag, name) => (tag, Selector::Name(name)),
            RawStep::AttrEq(tag, key, value) => (tag, Selector::AttrEq { key, value }),
            RawStep::AttrMatch(tag, key, pattern) => {
                let compiled = Regex::new(&pattern).map_err(|err| LocatorError::Pattern {
                    pattern: pattern.clone(),
                    message: err.to_string(),
                })?;
                (
                    tag,
                    Selector::AttrMatch {
                        key,
                        pattern: compiled,
                    },
                )
            }
            RawStep::Nth(tag, index) => match index.parse::<usize>() {
                Ok(0) => return Err(LocatorError::ZeroIndex(path.to_string())),
                Ok(n) => (tag, Selector::Nth(n)),
                Err(_) => return Err(LocatorError::Syntax(path.to_string())),
            },
        };
        Ok(Step { tag, selector })
    }
}

fn path_grammar() -> GrammarBundle<Vec<RawStep>> {
    let lexer = Lexer::new(vec![
        fixed("ws", r"[ \t]+").silent(),
        fixed("string", r#""(?:[^"\\]|\\.)*""#).with_transform(|s| unescape(&s[1..s.len() - 1])),
        fixed("match_op", "=~").structural(),
        fixed("equals", "=").structural(),
        fixed("lbracket", r"\[").structural(),
        fixed("rbracket", r"\]").structural(),
        fixed("lparen", r"\(").structural(),
        fixed("rparen", r"\)").structural(),
        fixed("dot", r"\.").structural(),
        fixed("slash", "/").structural(),
    ])
    .with_fallback_stops(PATH_STOPS);

    let value = || Rule::choice(vec![Rule::token("word"), Rule::token("string")]);

    let grammar = Grammar::builder()
        .rule(
            "path",
            Rule::seq(vec![
                Rule::reference("step"),
                Rule::repeat(Rule::seq(vec![
                    Rule::choice(vec![Rule::token("dot"), Rule::token("slash")]),
                    Rule::reference("step"),
                ])),
                Rule::end(),
            ]),
        )
        .rule(
            "step",
            Rule::seq(vec![
                Rule::reference("tag"),
                Rule::optional(Rule::choice(vec![
                    Rule::reference("filter"),
                    Rule::reference("position"),
                ])),
            ]),
        )
        .rule("tag", Rule::token("word"))
        .rule(
            "filter",
            Rule::seq(vec![
                Rule::token("lbracket"),
                Rule::choice(vec![
                    Rule::reference("attr_match"),
                    Rule::reference("attr_eq"),
                    Rule::reference("name"),
                ]),
                Rule::token("rbracket"),
            ]),
        )
        .rule(
            "attr_match",
            Rule::seq(vec![
                Rule::reference("key"),
                Rule::token("match_op"),
                Rule::reference("value"),
            ]),
        )
        .rule(
            "attr_eq",
            Rule::seq(vec![
                Rule::reference("key"),
                Rule::token("equals"),
                Rule::reference("value"),
            ]),
        )
        .rule("key", Rule::token("word"))
        .rule("value", value())
        .rule("name", value())
        .rule(
            "position",
            Rule::seq(vec![
                Rule::token("lparen"),
                Rule::reference("index"),
                Rule::token("rparen"),
            ]),
        )
        .rule("index", Rule::token("word"))
        .build("path")
        .expect("locator grammar is well formed");

    GrammarBundle::new(lexer, grammar, decode)
}

fn decode(tree: &ParseResult) -> Option<Vec<RawStep>> {
    tree.find_all("step").into_iter().map(decode_step).collect()
}

fn decode_step(step: &ParseResult) -> Option<RawStep> {
    let text = |within: &ParseResult, rule: &str| {
        within
            .find(rule)
            .and_then(ParseResult::text)
            .map(str::to_string)
    };
    let tag = text(step, "tag")?;

    if let Some(found) = step.find("attr_match") {
        return Some(RawStep::AttrMatch(
            tag,
            text(found, "key")?,
            text(found, "value")?,
        ));
    }
    if let Some(found) = step.find("attr_eq") {
        return Some(RawStep::AttrEq(
            tag,
            text(found, "key")?,
            text(found, "value")?,
        ));
    }
    if let Some(name) = text(step, "name") {
        return Some(RawStep::Name(tag, name));
    }
    if let Some(index) = text(step, "index") {
        return Some(RawStep::Nth(tag, index));
    }
    Some(RawStep::Plain(tag))
}
