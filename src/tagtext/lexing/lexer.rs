//! The rule-driven lexer
//!
//! Scanning is left to right. At every position the rules are tried in order and the
//! first non-empty match wins. If none matches, the fallback takes the longest run
//! of characters that are neither whitespace nor stop characters and emits it as a
//! `word`. A position where even the fallback consumes nothing ends the tokenize
//! call with a [`LexError`].

use crate::tagtext::error::LexError;
use crate::tagtext::lexing::rules::LexRule;
use crate::tagtext::token::{Token, TokenStream};

/// Kind given to tokens produced by the fallback rule
pub const WORD: &str = "word";

/// Characters the fallback stops at unless a lexer overrides them
pub const DEFAULT_STOPS: &str = "\"'()[]{},;=:#";

/// An ordered rule set plus the word fallback
#[derive(Debug, Clone)]
pub struct Lexer {
    rules: Vec<LexRule>,
    stops: String,
}

impl Lexer {
    pub fn new(rules: Vec<LexRule>) -> Self {
        Self {
            rules,
            stops: DEFAULT_STOPS.to_string(),
        }
    }

    /// Replace the set of characters that end a fallback word
    pub fn with_fallback_stops(mut self, stops: impl Into<String>) -> Self {
        self.stops = stops.into();
        self
    }

    pub fn rules(&self) -> &[LexRule] {
        &self.rules
    }

    /// Pull-style iteration over every token, silent ones included
    pub fn tokens<'a>(&'a self, source: &'a str) -> Tokens<'a> {
        Tokens {
            lexer: self,
            source,
            pos: 0,
            failed: false,
        }
    }

    /// Collect the visible tokens of `source`
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let mut visible = Vec::new();
        for token in self.tokens(source) {
            let token = token?;
            if !token.silent {
                visible.push(token);
            }
        }
        Ok(visible)
    }

    /// Tokenize into the persistent stream representation used by recognizers
    pub fn stream(&self, source: &str) -> Result<TokenStream, LexError> {
        self.tokenize(source).map(TokenStream::new)
    }

    fn next_token(&self, source: &str, pos: usize) -> Result<Token, LexError> {
        let rest = &source[pos..];
        for rule in &self.rules {
            if let Some(len) = rule.match_len(rest) {
                let matched = &rest[..len];
                return Ok(Token {
                    kind: rule.name().to_string(),
                    text: rule.apply(matched),
                    span: pos..pos + len,
                    silent: rule.is_silent(),
                    structural: rule.is_structural(),
                });
            }
        }

        let len: usize = rest
            .chars()
            .take_while(|c| !c.is_whitespace() && !self.stops.contains(*c))
            .map(char::len_utf8)
            .sum();
        if len == 0 {
            return Err(LexError::no_match(source, pos));
        }
        Ok(Token::new(WORD, &rest[..len], pos..pos + len))
    }
}

/// Iterator returned by [`Lexer::tokens`]; it stops after the first error
pub struct Tokens<'a> {
    lexer: &'a Lexer,
    source: &'a str,
    pos: usize,
    failed: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.source.len() {
            return None;
        }
        match self.lexer.next_token(self.source, self.pos) {
            Ok(token) => {
                self.pos = token.span.end;
                Some(Ok(token))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
