//! Structural body parser
//!
//!     A block of tagged text is cut into [`BodyItem`]s, one level deep. The parser
//!     walks physical lines (see [layout](crate::tagtext::lexing::layout)) and keeps
//!     one open tag at a time:
//!
//!     - A non-blank, non-comment line while no tag is open is a header and opens
//!       a tag at that line's indent.
//!     - A line indented further than the open tag's header belongs to its body.
//!       The first such line fixes the body indent, which is stripped from every
//!       body line. Lines between the header and the body indent are clamped to
//!       the body column.
//!     - A content line at or below the header's indent closes the tag.
//!     - Blank lines and comments are held back until it is known where they go. A
//!       deeper content line pulls them into the body. When the tag closes, held
//!       lines up to the last comment at or beyond the body indent stay in the body
//!       and the rest become literal fragments between the siblings.
//!
//!     A header ending in the open bracket starts a bracket body instead: every
//!     line belongs to it until a line holding only the close bracket, at or below
//!     the body indent, with nested bracket pairs counted. The closing line is
//!     consumed.

use crate::tagtext::config::LayoutConfig;
use crate::tagtext::lexing::layout::{split_lines, LayoutLine};
use crate::tagtext::parsing::header::comment_offset;

/// One entry of a parsed block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyItem {
    /// A header line and the block it owns, with the body indent stripped
    Tag {
        header: String,
        body: String,
        bracket: bool,
    },
    /// Literal lines (blank runs, comments, stray text), each ending in a newline
    Text(String),
}

/// Parse one level of `source`
pub fn parse_body(source: &str, layout: &LayoutConfig) -> Vec<BodyItem> {
    let mut parser = BodyParser {
        layout,
        items: Vec::new(),
        fragment: Vec::new(),
        open: None,
    };
    for line in split_lines(source, layout.tab_width) {
        parser.line(line);
    }
    parser.finish()
}

struct OpenTag {
    header: String,
    line_indent: usize,
    body_indent: Option<usize>,
    lines: Vec<String>,
    held: Vec<LayoutLine>,
    bracket: bool,
    depth: usize,
}

impl OpenTag {
    fn push(&mut self, line: &LayoutLine) {
        if line.is_blank() {
            self.lines.push(String::new());
            return;
        }
        let body_indent = *self.body_indent.get_or_insert(line.indent);
        self.lines
            .push(line.indented(line.indent.saturating_sub(body_indent)));
    }

    fn flush_held(&mut self) {
        let held = std::mem::take(&mut self.held);
        for line in &held {
            if line.is_blank() {
                self.lines.push(String::new());
            } else {
                let body_indent = self.body_indent.unwrap_or(line.indent);
                self.lines
                    .push(line.indented(line.indent.saturating_sub(body_indent)));
            }
        }
    }

    /// Resolve held lines and return the finished item plus the lines left over
    /// for the enclosing level
    fn close(mut self, layout: &LayoutConfig) -> (BodyItem, Vec<LayoutLine>) {
        let leftover = match self.body_indent {
            None => std::mem::take(&mut self.held),
            Some(body_indent) => {
                let keep = self
                    .held
                    .iter()
                    .rposition(|line| is_comment(line, layout) && line.indent >= body_indent)
                    .map_or(0, |last| last + 1);
                let rest = self.held.split_off(keep);
                self.flush_held();
                rest
            }
        };
        let body = self.lines.iter().map(|line| format!("{}\n", line)).collect();
        let item = BodyItem::Tag {
            header: self.header,
            body,
            bracket: self.bracket,
        };
        (item, leftover)
    }
}

struct BodyParser<'a> {
    layout: &'a LayoutConfig,
    items: Vec<BodyItem>,
    fragment: Vec<String>,
    open: Option<OpenTag>,
}

impl BodyParser<'_> {
    fn line(&mut self, line: LayoutLine) {
        let Some(open) = self.open.as_mut() else {
            self.top_level(line);
            return;
        };

        if open.bracket {
            let layout = self.layout;
            if line.content == layout.close_bracket {
                let within = open.body_indent.map_or(true, |b| line.indent <= b);
                if open.depth == 0 && within {
                    open.flush_held();
                    self.close_open();
                    return;
                }
                open.depth = open.depth.saturating_sub(1);
            } else if opens_bracket(&line, layout) {
                open.depth += 1;
            }
            open.flush_held();
            open.push(&line);
            return;
        }

        if line.is_blank() || is_comment(&line, self.layout) {
            open.held.push(line);
        } else if line.indent > open.line_indent {
            if open.body_indent.is_none() {
                open.body_indent = Some(line.indent);
            }
            open.flush_held();
            open.push(&line);
        } else {
            self.close_open();
            self.top_level(line);
        }
    }

    fn top_level(&mut self, line: LayoutLine) {
        let layout = self.layout;
        if line.is_blank() {
            self.fragment.push(String::new());
        } else if is_comment(&line, layout) || line.content == layout.close_bracket {
            self.fragment.push(line.content);
        } else {
            self.flush_fragment();
            let opened = bracket_header(&line, layout);
            let bracket = opened.is_some();
            let header = opened.unwrap_or(line.content);
            self.open = Some(OpenTag {
                header,
                line_indent: line.indent,
                body_indent: None,
                lines: Vec::new(),
                held: Vec::new(),
                bracket,
                depth: 0,
            });
        }
    }

    fn close_open(&mut self) {
        if let Some(open) = self.open.take() {
            let (item, leftover) = open.close(self.layout);
            self.items.push(item);
            self.fragment.extend(leftover.into_iter().map(|line| line.content));
        }
    }

    fn flush_fragment(&mut self) {
        if self.fragment.is_empty() {
            return;
        }
        let text = self
            .fragment
            .drain(..)
            .map(|line| format!("{}\n", line))
            .collect();
        self.items.push(BodyItem::Text(text));
    }

    fn finish(mut self) -> Vec<BodyItem> {
        self.close_open();
        self.flush_fragment();
        self.items
    }
}

fn is_comment(line: &LayoutLine, layout: &LayoutConfig) -> bool {
    !layout.comment_prefix.is_empty() && line.content.starts_with(&layout.comment_prefix)
}

fn opens_bracket(line: &LayoutLine, layout: &LayoutConfig) -> bool {
    bracket_header(line, layout).is_some()
}

/// The header of a line that opens a bracket body, with the bracket removed
///
/// The bracket has to be the last thing before the header comment. Brackets
/// inside quoted strings or inside the comment do not count.
fn bracket_header(line: &LayoutLine, layout: &LayoutConfig) -> Option<String> {
    let open = layout.open_bracket.as_str();
    if open.is_empty() || is_comment(line, layout) {
        return None;
    }
    let (code, comment) = line.content.split_at(comment_offset(&line.content));
    let code = code.trim_end();
    if code.len() <= open.len() || !code.ends_with(open) {
        return None;
    }
    let header = code[..code.len() - open.len()].trim_end();
    if comment.is_empty() {
        Some(header.to_string())
    } else {
        Some(format!("{} {}", header, comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<BodyItem> {
        parse_body(source, &LayoutConfig::default())
    }

    fn tag(header: &str, body: &str) -> BodyItem {
        BodyItem::Tag {
            header: header.to_string(),
            body: body.to_string(),
            bracket: false,
        }
    }

    fn bracket(header: &str, body: &str) -> BodyItem {
        BodyItem::Tag {
            header: header.to_string(),
            body: body.to_string(),
            bracket: true,
        }
    }

    fn text(fragment: &str) -> BodyItem {
        BodyItem::Text(fragment.to_string())
    }

    #[test]
    fn test_siblings_own_deeper_lines() {
        let source = "group first \"A\"\n   item a \"Alpha\"\n   item b \"Beta\"\ngroup second \"B\"\n   item c \"Gamma\"\n";
        assert_eq!(
            parse(source),
            vec![
                tag("group first \"A\"", "item a \"Alpha\"\nitem b \"Beta\"\n"),
                tag("group second \"B\"", "item c \"Gamma\"\n"),
            ]
        );
    }

    #[test]
    fn test_nested_indentation_is_kept_relative() {
        assert_eq!(parse("a\n  b\n    c\n  d\n"), vec![tag("a", "b\n  c\nd\n")]);
    }

    #[test]
    fn test_blank_line_between_siblings_is_a_fragment() {
        assert_eq!(
            parse("a\n  x\n\nb\n"),
            vec![tag("a", "x\n"), text("\n"), tag("b", "")]
        );
    }

    #[test]
    fn test_blank_line_inside_body_is_kept() {
        assert_eq!(parse("a\n  x\n\n  y\n"), vec![tag("a", "x\n\ny\n")]);
    }

    #[test]
    fn test_trailing_comment_at_body_indent_stays_in_body() {
        assert_eq!(
            parse("a\n  x\n  # note\n\nb"),
            vec![tag("a", "x\n# note\n"), text("\n"), tag("b", "")]
        );
    }

    #[test]
    fn test_boundary_comment_becomes_sibling() {
        assert_eq!(
            parse("a\n  x\n# top\nb"),
            vec![tag("a", "x\n"), text("# top\n"), tag("b", "")]
        );
    }

    #[test]
    fn test_comment_alone_in_body_is_a_boundary_comment() {
        assert_eq!(
            parse("a\n  # only\nb"),
            vec![tag("a", ""), text("# only\n"), tag("b", "")]
        );
    }

    #[test]
    fn test_comment_followed_by_content_joins_body() {
        assert_eq!(parse("a\n  # lead\n  x\n"), vec![tag("a", "# lead\nx\n")]);
    }

    #[test]
    fn test_under_indented_line_is_clamped_to_body_column() {
        assert_eq!(parse("a\n    x\n  y\n"), vec![tag("a", "x\ny\n")]);
    }

    #[test]
    fn test_trailing_blank_lines_at_end_of_input() {
        assert_eq!(parse("a\n  x\n\n"), vec![tag("a", "x\n"), text("\n")]);
    }

    #[test]
    fn test_leading_fragments() {
        assert_eq!(parse("\n# c\na"), vec![text("\n# c\n"), tag("a", "")]);
    }

    #[test]
    fn test_bracket_body_ignores_indentation() {
        assert_eq!(
            parse("a {\nx\n  y\n}\nb"),
            vec![bracket("a", "x\n  y\n"), tag("b", "")]
        );
    }

    #[test]
    fn test_nested_brackets_are_counted() {
        assert_eq!(
            parse("a {\n  b {\n    c\n  }\n}\nd\n"),
            vec![bracket("a", "b {\n  c\n}\n"), tag("d", "")]
        );
    }

    #[test]
    fn test_blank_lines_inside_brackets_stay() {
        assert_eq!(parse("a {\n  x\n\n}\n"), vec![bracket("a", "x\n\n")]);
    }

    #[test]
    fn test_unclosed_bracket_runs_to_end() {
        assert_eq!(parse("a {\n  x\ny\n"), vec![bracket("a", "x\ny\n")]);
    }

    #[test]
    fn test_stray_close_bracket_is_text() {
        assert_eq!(parse("}\na"), vec![text("}\n"), tag("a", "")]);
    }

    #[test]
    fn test_inline_code_is_not_a_bracket() {
        assert_eq!(
            parse("a {x}\n  b\n"),
            vec![tag("a {x}", "b\n")]
        );
    }

    #[test]
    fn test_bracket_in_header_comment_is_not_an_opener() {
        assert_eq!(
            parse("a # start {\nb\nc\n"),
            vec![tag("a # start {", ""), tag("b", ""), tag("c", "")]
        );
        assert_eq!(
            parse("a \"x {\"\nb\n"),
            vec![tag("a \"x {\"", ""), tag("b", "")]
        );
    }

    #[test]
    fn test_bracket_before_header_comment() {
        assert_eq!(
            parse("a { # open\n  x\n}\nb\n"),
            vec![bracket("a # open", "x\n"), tag("b", "")]
        );
        assert_eq!(
            parse("a {x} {\n  y\n}\n"),
            vec![bracket("a {x}", "y\n")]
        );
    }

    #[test]
    fn test_tabs_count_as_columns() {
        assert_eq!(parse("a\n\tb\n\t\tc\n"), vec![tag("a", "b\n    c\n")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert_eq!(parse("\n\n"), vec![text("\n\n")]);
    }
}
