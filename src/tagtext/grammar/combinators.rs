//! Combinator primitives
//!
//! Each primitive is a [`Recognizer`]: a shared closure from a stream to an
//! optional `(result, remainder)` pair. Failure is `None`; no primitive panics or
//! mutates its input.

use std::rc::Rc;

use crate::tagtext::grammar::result::ParseResult;
use crate::tagtext::token::TokenStream;

/// A successful match: the value and the stream after it
pub type Match = (ParseResult, TokenStream);

/// A composable recognizer
pub type Recognizer = Rc<dyn Fn(&TokenStream) -> Option<Match>>;

/// Whether `list_of` keeps separator tokens in its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Silent,
    Visible,
}

/// One token of the given kind
pub fn token(kind: impl Into<String>) -> Recognizer {
    let kind = kind.into();
    Rc::new(move |stream: &TokenStream| {
        let (head, rest) = stream.split_first()?;
        head.is(&kind)
            .then(|| (ParseResult::Token(head.clone()), rest))
    })
}

/// One token whose text is exactly `text`
pub fn literal(text: impl Into<String>) -> Recognizer {
    let text = text.into();
    Rc::new(move |stream: &TokenStream| {
        let (head, rest) = stream.split_first()?;
        (head.text == text).then(|| (ParseResult::Token(head.clone()), rest))
    })
}

/// Any one non-structural token
pub fn word() -> Recognizer {
    Rc::new(|stream: &TokenStream| {
        let (head, rest) = stream.split_first()?;
        (!head.structural).then(|| (ParseResult::Token(head.clone()), rest))
    })
}

/// All recognizers in order
pub fn sequence(parts: Vec<Recognizer>) -> Recognizer {
    Rc::new(move |stream: &TokenStream| {
        let mut items = Vec::with_capacity(parts.len());
        let mut rest = stream.clone();
        for part in &parts {
            let (value, next) = part(&rest)?;
            items.push(value);
            rest = next;
        }
        Some((ParseResult::List(items), rest))
    })
}

/// The first alternative that matches
pub fn choice(alternatives: Vec<Recognizer>) -> Recognizer {
    Rc::new(move |stream: &TokenStream| alternatives.iter().find_map(|alt| alt(stream)))
}

/// Zero or more, greedy
pub fn repeat(item: Recognizer) -> Recognizer {
    Rc::new(move |stream: &TokenStream| {
        let mut items = Vec::new();
        let mut rest = stream.clone();
        while let Some((value, next)) = item(&rest) {
            if next.position() == rest.position() {
                break;
            }
            items.push(value);
            rest = next;
        }
        Some((ParseResult::List(items), rest))
    })
}

/// Zero or one; absence yields `Empty`
pub fn optional(item: Recognizer) -> Recognizer {
    Rc::new(move |stream: &TokenStream| {
        item(stream).or_else(|| Some((ParseResult::Empty, stream.clone())))
    })
}

/// One or more items, separated by tokens of kind `separator` when given
///
/// A separator is only consumed together with the item after it, so a dangling
/// separator is left in the remainder.
pub fn list_of(item: Recognizer, separator: Option<String>, visibility: Separator) -> Recognizer {
    let separator = separator.map(token);
    Rc::new(move |stream: &TokenStream| {
        let (first, mut rest) = item(stream)?;
        let mut items = vec![first];
        loop {
            let (sep, after_sep) = match &separator {
                Some(sep) => match sep(&rest) {
                    Some(found) => found,
                    None => break,
                },
                None => (ParseResult::Empty, rest.clone()),
            };
            let Some((value, next)) = item(&after_sep) else {
                break;
            };
            if next.position() == rest.position() {
                break;
            }
            if visibility == Separator::Visible && !sep.is_empty() {
                items.push(sep);
            }
            items.push(value);
            rest = next;
        }
        Some((ParseResult::List(items), rest))
    })
}

/// Succeeds, consuming nothing, only on an exhausted stream
pub fn end_of_input() -> Recognizer {
    Rc::new(|stream: &TokenStream| {
        stream
            .is_empty()
            .then(|| (ParseResult::Empty, stream.clone()))
    })
}
