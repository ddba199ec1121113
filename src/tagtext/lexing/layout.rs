//! Layout scanning
//!
//!     The structural parser works on physical lines, so before any header grammar
//!     runs a block is scanned into [`LayoutLine`]s. The scan is a plain logos lexer
//!     over three token kinds (whitespace runs, newlines and anything else), grouped
//!     by newline.
//!
//!     Whitespace at the start of a line is indentation and is measured in columns:
//!     a space advances one column, a tab advances to the next multiple of the tab
//!     width. The rest of the line is kept verbatim (minus trailing whitespace and a
//!     trailing carriage return).

use logos::Logos;

/// Raw layout tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutToken {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"[^ \t\n]+")]
    Text,
}

/// One physical line of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutLine {
    /// Indentation in columns
    pub indent: usize,
    /// Line content after the indentation
    pub content: String,
    /// 0-based line number within the scanned block
    pub number: usize,
}

impl LayoutLine {
    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }

    /// The line re-indented by `columns` spaces
    pub fn indented(&self, columns: usize) -> String {
        format!("{}{}", " ".repeat(columns), self.content)
    }
}

/// Width in columns of a run of spaces and tabs
pub fn columns(whitespace: &str, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    whitespace.chars().fold(0, |col, c| match c {
        '\t' => (col / tab_width + 1) * tab_width,
        _ => col + 1,
    })
}

/// Split `source` into layout lines
///
/// A trailing newline does not produce an extra empty line, so `"a\n"` and `"a"`
/// both scan to a single line.
pub fn split_lines(source: &str, tab_width: usize) -> Vec<LayoutLine> {
    let mut lines = Vec::new();
    let mut lexer = LayoutToken::lexer(source);

    let mut line_start = 0;
    let mut content_start: Option<usize> = None;
    let mut indent_span: Option<std::ops::Range<usize>> = None;

    let finish = |line_end: usize,
                      content_start: Option<usize>,
                      indent_span: Option<std::ops::Range<usize>>,
                      lines: &mut Vec<LayoutLine>| {
        let indent = indent_span
            .map(|span| columns(&source[span], tab_width))
            .unwrap_or(0);
        let content = content_start
            .map(|start| source[start..line_end].trim_end().trim_end_matches('\r'))
            .unwrap_or("")
            .to_string();
        let number = lines.len();
        lines.push(LayoutLine {
            indent: if content.is_empty() { 0 } else { indent },
            content,
            number,
        });
    };

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(LayoutToken::Newline) => {
                finish(span.start, content_start.take(), indent_span.take(), &mut lines);
                line_start = span.end;
            }
            Ok(LayoutToken::Whitespace) => {
                if span.start == line_start && content_start.is_none() {
                    indent_span = Some(span);
                }
            }
            Ok(LayoutToken::Text) | Err(_) => {
                if content_start.is_none() {
                    content_start = Some(span.start);
                }
            }
        }
    }
    if line_start < source.len() {
        finish(source.len(), content_start, indent_span, &mut lines);
    }

    lines
}
