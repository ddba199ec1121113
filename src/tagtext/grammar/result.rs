//! Parse results

use crate::tagtext::token::Token;

/// The uniform output of every recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    /// An optional part that was absent, or an empty repetition
    Empty,
    Token(Token),
    List(Vec<ParseResult>),
    /// Output of a named grammar rule
    Rule(String, Box<ParseResult>),
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        match self {
            ParseResult::Empty => true,
            ParseResult::List(items) => items.iter().all(ParseResult::is_empty),
            ParseResult::Rule(_, inner) => inner.is_empty(),
            ParseResult::Token(_) => false,
        }
    }

    pub fn rule_name(&self) -> Option<&str> {
        match self {
            ParseResult::Rule(name, _) => Some(name),
            _ => None,
        }
    }

    /// The value wrapped by a named rule, or `self` for anything else
    pub fn inner(&self) -> &ParseResult {
        match self {
            ParseResult::Rule(_, inner) => inner,
            other => other,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            ParseResult::Token(token) => Some(token),
            ParseResult::Rule(_, inner) => inner.token(),
            _ => None,
        }
    }

    /// Text of the first token in this result
    pub fn text(&self) -> Option<&str> {
        self.tokens().first().map(|token| token.text.as_str())
    }

    /// Immediate items of a list result; a single value counts as one item
    pub fn items(&self) -> Vec<&ParseResult> {
        match self {
            ParseResult::Empty => Vec::new(),
            ParseResult::List(items) => items.iter().collect(),
            ParseResult::Rule(_, inner) => inner.items(),
            token => vec![token],
        }
    }

    /// All tokens in the result, left to right
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            ParseResult::Empty => {}
            ParseResult::Token(token) => out.push(token),
            ParseResult::List(items) => items.iter().for_each(|item| item.collect_tokens(out)),
            ParseResult::Rule(_, inner) => inner.collect_tokens(out),
        }
    }

    /// Texts of all tokens in the result
    pub fn texts(&self) -> Vec<&str> {
        self.tokens().into_iter().map(|t| t.text.as_str()).collect()
    }

    /// First result produced by the rule called `name`, searching depth first
    pub fn find(&self, name: &str) -> Option<&ParseResult> {
        match self {
            ParseResult::Rule(rule, inner) => {
                if rule == name {
                    Some(self)
                } else {
                    inner.find(name)
                }
            }
            ParseResult::List(items) => items.iter().find_map(|item| item.find(name)),
            _ => None,
        }
    }

    /// Every result produced by the rule called `name`; matches are not searched
    /// for further nested matches
    pub fn find_all(&self, name: &str) -> Vec<&ParseResult> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a ParseResult>) {
        match self {
            ParseResult::Rule(rule, _) if rule == name => out.push(self),
            ParseResult::Rule(_, inner) => inner.collect_named(name, out),
            ParseResult::List(items) => items.iter().for_each(|item| item.collect_named(name, out)),
            _ => {}
        }
    }
}
