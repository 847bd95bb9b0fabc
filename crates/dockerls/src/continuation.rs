//
// continuation.rs
//
// Merges physical lines into logical spans per the active escape character.
// An escape character followed by optional horizontal whitespace and a line
// terminator is a continuation marker: the marker contributes nothing to the
// logical text and the next physical line becomes the next fragment of the
// same span. An escape anywhere else is ordinary content.
//
// Comment lines (first non-whitespace character is '#') are never continued;
// a trailing escape on a comment is part of the comment.
//

use crate::scanner::{LineEnding, PhysicalLine};

/// One physical-line slice of a logical span. Columns are char columns
/// within the physical line; `logical_start` is the char offset of this
/// fragment's first character within the concatenated logical text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub logical_start: usize,
}

impl Fragment {
    pub fn len(&self) -> usize {
        self.end_col - self.start_col
    }

    pub fn logical_end(&self) -> usize {
        self.logical_start + self.len()
    }
}

/// A continuation-joined logical line: the concatenated text plus the
/// ordered fragments it was assembled from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalSpan {
    pub text: String,
    pub fragments: Vec<Fragment>,
}

impl LogicalSpan {
    /// Char length of the logical text.
    pub fn len(&self) -> usize {
        self.fragments
            .last()
            .map(|f| f.logical_end())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map a (physical line, char column) position to an offset in the
    /// logical text, or `None` when the position is not inside any fragment
    /// (continuation markers, trailing whitespace, other lines).
    pub fn logical_offset(&self, line: usize, col: usize) -> Option<usize> {
        self.fragments
            .iter()
            .find(|f| f.line == line && f.start_col <= col && col < f.end_col)
            .map(|f| f.logical_start + (col - f.start_col))
    }

    /// The fragment whose logical range contains `offset`.
    pub fn fragment_containing(&self, offset: usize) -> Option<&Fragment> {
        self.fragments
            .iter()
            .find(|f| f.logical_start <= offset && offset < f.logical_end())
    }
}

fn is_horizontal_ws(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

fn is_comment_line(chars: &[char]) -> bool {
    chars
        .iter()
        .copied()
        .find(|ch| !is_horizontal_ws(*ch))
        == Some('#')
}

/// Join physical lines into logical spans under the given escape character.
pub fn normalize(source: &str, lines: &[PhysicalLine], escape: char) -> Vec<LogicalSpan> {
    let mut spans = Vec::new();
    let mut current: Option<LogicalSpan> = None;

    for line in lines {
        let chars: Vec<char> = line.text(source).chars().collect();

        if current.is_none() && is_comment_line(&chars) {
            let mut span = LogicalSpan::default();
            push_fragment(&mut span, line.index, &chars, chars.len());
            spans.push(span);
            continue;
        }

        // A continuation marker needs a terminator after the escape and any
        // trailing horizontal whitespace; an escape at end-of-document is
        // ordinary content.
        let mut frag_end = chars.len();
        let mut continued = false;
        if line.ending != LineEnding::Eof {
            let mut j = chars.len();
            while j > 0 && is_horizontal_ws(chars[j - 1]) {
                j -= 1;
            }
            if j > 0 && chars[j - 1] == escape {
                continued = true;
                frag_end = j - 1;
            }
        }

        let span = current.get_or_insert_with(LogicalSpan::default);
        push_fragment(span, line.index, &chars, frag_end);

        if !continued {
            if let Some(done) = current.take() {
                spans.push(done);
            }
        }
    }

    if let Some(done) = current.take() {
        spans.push(done);
    }

    spans
}

fn push_fragment(span: &mut LogicalSpan, line: usize, chars: &[char], frag_end: usize) {
    let logical_start = span.len();
    span.fragments.push(Fragment {
        line,
        start_col: 0,
        end_col: frag_end,
        logical_start,
    });
    span.text.extend(chars[..frag_end].iter());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;

    fn normalize_str(source: &str, escape: char) -> Vec<LogicalSpan> {
        let lines = scanner::scan(source);
        normalize(source, &lines, escape)
    }

    #[test]
    fn test_no_continuation() {
        let spans = normalize_str("FROM node\nEXPOSE 8081", '\\');
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "FROM node");
        assert_eq!(spans[1].text, "EXPOSE 8081");
    }

    #[test]
    fn test_keyword_split_across_lines() {
        for src in ["fr\\\noM node", "fr\\\roM node", "fr\\\r\noM node"] {
            let spans = normalize_str(src, '\\');
            assert_eq!(spans.len(), 1, "source {:?}", src);
            assert_eq!(spans[0].text, "froM node");
            assert_eq!(spans[0].fragments.len(), 2);
            assert_eq!(spans[0].fragments[0].end_col, 2);
            assert_eq!(spans[0].fragments[1].logical_start, 2);
        }
    }

    #[test]
    fn test_whitespace_between_escape_and_terminator() {
        let spans = normalize_str("ARG \\ \t\nz=y", '\\');
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "ARG z=y");
    }

    #[test]
    fn test_trailing_whitespace_on_continued_line_kept() {
        // Only whitespace between the escape and the terminator is elided;
        // the continuation line's own content is kept verbatim.
        let spans = normalize_str("ONBUILD \\\n EXPOSE 8080", '\\');
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "ONBUILD  EXPOSE 8080");
    }

    #[test]
    fn test_escape_mid_line_is_literal() {
        let spans = normalize_str("FR\\OM node", '\\');
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "FR\\OM node");
    }

    #[test]
    fn test_escape_at_end_of_document_is_literal() {
        let spans = normalize_str("RUN ls \\", '\\');
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "RUN ls \\");
    }

    #[test]
    fn test_backtick_escape() {
        let spans = normalize_str("fr`\noM node", '`');
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "froM node");

        // Backslash is ordinary content once the escape is a backtick.
        let spans = normalize_str("ONBUILD \\\nEXPOSE 8080", '`');
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "ONBUILD \\");
        assert_eq!(spans[1].text, "EXPOSE 8080");
    }

    #[test]
    fn test_comment_line_not_continued() {
        let spans = normalize_str("# comment \\\nFROM node", '\\');
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "# comment \\");
        assert_eq!(spans[1].text, "FROM node");
    }

    #[test]
    fn test_chained_continuations() {
        let spans = normalize_str("a\\\nb\\\nc", '\\');
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "abc");
        assert_eq!(spans[0].fragments.len(), 3);
    }

    #[test]
    fn test_logical_offset_mapping() {
        let spans = normalize_str("fr\\\noM node", '\\');
        let span = &spans[0];
        assert_eq!(span.logical_offset(0, 0), Some(0));
        assert_eq!(span.logical_offset(0, 1), Some(1));
        // The escape character itself is not inside any fragment.
        assert_eq!(span.logical_offset(0, 2), None);
        assert_eq!(span.logical_offset(1, 0), Some(2));
        assert_eq!(span.logical_offset(1, 1), Some(3));
        assert_eq!(span.logical_offset(2, 0), None);
    }

    #[test]
    fn test_fragment_containing() {
        let spans = normalize_str("fr\\\noM node", '\\');
        let span = &spans[0];
        assert_eq!(span.fragment_containing(0).map(|f| f.line), Some(0));
        assert_eq!(span.fragment_containing(3).map(|f| f.line), Some(1));
        assert_eq!(span.fragment_containing(span.len()), None);
    }

    #[test]
    fn test_double_escape_before_terminator() {
        // Only the final escape forms the marker; the one before it is
        // ordinary content.
        let spans = normalize_str("RUN a\\\\\nb", '\\');
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "RUN a\\b");
    }
}
