//! Tokens and the persistent token stream
//!
//! Recognizers only ever read a [`TokenStream`]; consuming a token produces a new
//! stream value that shares the same backing slice. A failed branch of a choice
//! simply drops its derived stream, which gives backtracking without any rollback
//! bookkeeping.

use std::ops::Range;
use std::rc::Rc;

/// A single lexed token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Name of the lexer rule that produced the token (`word` for the fallback)
    pub kind: String,
    /// Token text, after the rule's transform
    pub text: String,
    /// Byte range in the source the token was read from
    pub span: Range<usize>,
    /// Silent tokens advance the lexer but are left out of the visible stream
    pub silent: bool,
    /// Structural tokens are punctuation; `word()` never accepts them
    pub structural: bool,
}

impl Token {
    pub fn new(kind: impl Into<String>, text: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            span,
            silent: false,
            structural: false,
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

/// An immutable cursor over a shared token slice
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Rc<[Token]>,
    pos: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
            pos: 0,
        }
    }

    /// The next token, if any
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Split off the head token, returning it together with the remainder
    pub fn split_first(&self) -> Option<(&Token, TokenStream)> {
        self.peek().map(|token| (token, self.advance()))
    }

    /// The stream after the head token; an exhausted stream stays exhausted
    pub fn advance(&self) -> TokenStream {
        TokenStream {
            tokens: Rc::clone(&self.tokens),
            pos: (self.pos + 1).min(self.tokens.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Number of tokens consumed from the start of the backing slice
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of tokens left
    pub fn len(&self) -> usize {
        self.tokens.len() - self.pos
    }

    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.pos..]
    }

    /// Identity of the backing slice, used to key per-parse memo tables
    pub(crate) fn source_id(&self) -> usize {
        Rc::as_ptr(&self.tokens) as *const Token as usize
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<Token> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Token::new("word", *t, i..i + 1))
            .collect()
    }

    #[test]
    fn test_advance_shares_backing_slice() {
        let stream = TokenStream::new(words(&["a", "b", "c"]));
        let rest = stream.advance();

        assert_eq!(stream.peek().map(|t| t.text.as_str()), Some("a"));
        assert_eq!(rest.peek().map(|t| t.text.as_str()), Some("b"));
        assert_eq!(stream.source_id(), rest.source_id());
        assert_eq!(rest.len(), 2);
        assert_eq!(rest.position(), 1);
    }

    #[test]
    fn test_exhausted_stream() {
        let stream = TokenStream::new(words(&["only"]));
        let (head, rest) = stream.split_first().expect("one token");
        assert_eq!(head.text, "only");
        assert!(rest.is_empty());
        assert!(rest.split_first().is_none());
        assert!(rest.advance().is_empty());
        assert!(rest.remaining().is_empty());
    }
}
