//! Grammar bundles
//!
//! A bundle is everything needed to run one sublanguage end to end: the lexer, the
//! compiled grammar, an input normalizer applied before lexing and an output
//! transform applied to the parse tree. Header lines, locator paths and custom
//! body grammars are all bundles over the same machinery.

use std::fmt;
use std::rc::Rc;

use crate::tagtext::grammar::compiler::Grammar;
use crate::tagtext::grammar::result::ParseResult;
use crate::tagtext::lexing::Lexer;

pub type Normalizer = Rc<dyn Fn(&str) -> String>;
pub type OutputTransform<T> = Rc<dyn Fn(&ParseResult) -> Option<T>>;

pub struct GrammarBundle<T> {
    lexer: Lexer,
    grammar: Grammar,
    normalize: Option<Normalizer>,
    transform: OutputTransform<T>,
}

impl<T> GrammarBundle<T> {
    pub fn new(
        lexer: Lexer,
        grammar: Grammar,
        transform: impl Fn(&ParseResult) -> Option<T> + 'static,
    ) -> Self {
        Self {
            lexer,
            grammar,
            normalize: None,
            transform: Rc::new(transform),
        }
    }

    pub fn with_normalizer(mut self, normalize: impl Fn(&str) -> String + 'static) -> Self {
        self.normalize = Some(Rc::new(normalize));
        self
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Normalize, lex and run the start rule, returning the raw parse tree
    pub fn parse_tree(&self, input: &str) -> Option<ParseResult> {
        let normalized;
        let input = match &self.normalize {
            Some(normalize) => {
                normalized = normalize(input);
                normalized.as_str()
            }
            None => input,
        };
        let stream = match self.lexer.stream(input) {
            Ok(stream) => stream,
            Err(err) => {
                tracing::debug!(%err, start = self.grammar.start(), "input rejected by lexer");
                return None;
            }
        };
        self.grammar.parse(&stream)
    }

    /// Parse and transform; any failure along the way is `None`
    pub fn parse(&self, input: &str) -> Option<T> {
        let tree = self.parse_tree(input)?;
        (self.transform)(&tree)
    }
}

impl<T> fmt::Debug for GrammarBundle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarBundle")
            .field("lexer", &self.lexer)
            .field("grammar", &self.grammar)
            .field("normalize", &self.normalize.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagtext::grammar::{Rule, Separator};
    use crate::tagtext::lexing::rules::fixed;

    fn csv_bundle() -> GrammarBundle<Vec<String>> {
        let lexer = Lexer::new(vec![
            fixed("ws", r"\s+").silent(),
            fixed("comma", ",").structural(),
        ]);
        let grammar = Grammar::builder()
            .rule(
                "row",
                Rule::seq(vec![
                    Rule::list_of(Rule::word(), Some("comma"), Separator::Silent),
                    Rule::end(),
                ]),
            )
            .build("row")
            .unwrap();
        GrammarBundle::new(lexer, grammar, |tree| {
            Some(tree.texts().into_iter().map(str::to_string).collect())
        })
    }

    #[test]
    fn test_bundle_parses_and_transforms() {
        let bundle = csv_bundle();
        assert_eq!(
            bundle.parse("a, b ,c"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(bundle.parse("a, b,"), None);
    }

    #[test]
    fn test_normalizer_runs_before_lexing() {
        let bundle = csv_bundle().with_normalizer(|s| s.replace(';', ","));
        assert_eq!(bundle.parse("x;y").map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_lex_errors_become_none() {
        let lexer = Lexer::new(vec![fixed("ws", r"\s+").silent()]).with_fallback_stops("!");
        let grammar = Grammar::builder()
            .rule("any", Rule::repeat(Rule::word()))
            .build("any")
            .unwrap();
        let bundle = GrammarBundle::new(lexer, grammar, |tree| Some(tree.texts().len()));
        assert_eq!(bundle.parse("a b"), Some(2));
        assert_eq!(bundle.parse("a ! b"), None);
    }
}
