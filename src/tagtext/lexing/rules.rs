//! Lexer rule definitions

use regex::Regex;
use std::fmt;
use std::rc::Rc;

/// Rewrites the matched text of a token (for example to unescape a string)
pub type Transform = Rc<dyn Fn(&str) -> String>;

/// One named lexer rule
#[derive(Clone)]
pub struct LexRule {
    name: String,
    pattern: Regex,
    transform: Option<Transform>,
    silent: bool,
    structural: bool,
}

impl LexRule {
    /// Create a rule; `pattern` is anchored at the current lexing position
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(Self {
            name: name.into(),
            pattern,
            transform: None,
            silent: false,
            structural: false,
        })
    }

    /// Tokens of this rule are omitted from the visible stream
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// Tokens of this rule are punctuation and never match `word()`
    pub fn structural(mut self) -> Self {
        self.structural = true;
        self
    }

    pub fn with_transform(mut self, transform: impl Fn(&str) -> String + 'static) -> Self {
        self.transform = Some(Rc::new(transform));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_structural(&self) -> bool {
        self.structural
    }

    /// Length in bytes of a non-empty match at the start of `input`
    pub(crate) fn match_len(&self, input: &str) -> Option<usize> {
        self.pattern
            .find(input)
            .map(|m| m.end())
            .filter(|len| *len > 0)
    }

    pub(crate) fn apply(&self, matched: &str) -> String {
        match &self.transform {
            Some(transform) => transform(matched),
            None => matched.to_string(),
        }
    }
}

impl fmt::Debug for LexRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("silent", &self.silent)
            .field("structural", &self.structural)
            .finish()
    }
}

/// Build a rule from a pattern known to be valid at compile time
pub(crate) fn fixed(name: &str, pattern: &str) -> LexRule {
    LexRule::new(name, pattern).expect("built-in lexer pattern must compile")
}
