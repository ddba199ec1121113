//! Property-based tests for the rule lexer and the layout scanner
//!
//! These tests ensure that tokenizing never loses or duplicates input and that
//! layout lines measure indentation the way the body parser expects.

use proptest::prelude::*;
use tagtext::tagtext::error::LexError;
use tagtext::tagtext::lexing::{split_lines, LexRule, Lexer};
use tagtext::tagtext::parsing::line_grammar;
use tagtext::tagtext::token::Token;

/// A lexer that has a rule for every fallback stop, so no input can fail
fn total_lexer() -> Lexer {
    Lexer::new(vec![
        LexRule::new("ws", r"\s+").unwrap().silent(),
        LexRule::new("string", r#""(?:[^"\\]|\\.)*""#).unwrap(),
        LexRule::new("punct", r#"["'()\[\]{},;=:#]"#).unwrap().structural(),
    ])
}

fn kinds(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| format!("{}:{}", t.kind, t.text))
        .collect()
}

proptest! {
    #[test]
    fn spans_cover_the_source(source in "[a-z0-9 \t\n\"'()\\[\\]{},;=:#.-]{0,60}") {
        let tokens: Vec<Token> = total_lexer()
            .tokens(&source)
            .collect::<Result<_, _>>()
            .unwrap();
        let mut offset = 0;
        for token in &tokens {
            prop_assert_eq!(token.span.start, offset);
            prop_assert!(token.span.end > token.span.start);
            offset = token.span.end;
        }
        prop_assert_eq!(offset, source.len());
    }

    #[test]
    fn silent_tokens_are_left_out(source in "[a-z ]{0,40}") {
        let visible = total_lexer().tokenize(&source).unwrap();
        let words: Vec<&str> = source.split_whitespace().collect();
        prop_assert_eq!(visible.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(), words);
        prop_assert!(visible.iter().all(|t| t.kind == "word"));
    }

    #[test]
    fn layout_lines_measure_indentation(
        lines in prop::collection::vec((0usize..4, 0usize..3, "[a-z]{1,8}"), 1..20),
    ) {
        let source: String = lines
            .iter()
            .map(|(spaces, tabs, text)| format!("{}{}{}\n", "\t".repeat(*tabs), " ".repeat(*spaces), text))
            .collect();
        let scanned = split_lines(&source, 4);
        prop_assert_eq!(scanned.len(), lines.len());
        for (line, (spaces, tabs, text)) in scanned.iter().zip(&lines) {
            prop_assert_eq!(line.indent, tabs * 4 + spaces);
            prop_assert_eq!(&line.content, text);
        }
    }

    #[test]
    fn headers_never_panic(source in "\\PC{0,40}") {
        let _ = line_grammar().parse(&source);
    }
}

#[test]
fn unmatched_input_is_an_error() {
    let lexer = Lexer::new(vec![LexRule::new("ws", r"\s+").unwrap().silent()]);
    let err = lexer.tokenize("ok (").unwrap_err();
    assert!(matches!(err, LexError::NoMatch { offset: 3, .. }), "{}", err);
}

#[test]
fn header_tokens() {
    let tokens = total_lexer()
        .tokenize(r#"menu main (wide, tall=2) "File menu" # top"#)
        .unwrap();
    insta::assert_debug_snapshot!(kinds(&tokens), @r###"
    [
        "word:menu",
        "word:main",
        "punct:(",
        "word:wide",
        "punct:,",
        "word:tall",
        "punct:=",
        "word:2",
        "punct:)",
        "string:\"File menu\"",
        "punct:#",
        "word:top",
    ]
    "###);
}
