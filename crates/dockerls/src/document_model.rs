//
// document_model.rs
//
// Whole-document parse tying the pipeline together: physical scan, leading
// directive scan (which fixes the escape character), continuation joining,
// per-line classification, and the variable table. The model is immutable
// once built; every hover query is a read-only lookup against it.
//

use std::ops::Range as StdRange;

use tower_lsp::lsp_types::{Position, Range};

use crate::continuation::{self, LogicalSpan};
use crate::directive::{self, Directive};
use crate::instruction::{self, Instruction};
use crate::scanner::{self, PhysicalLine};
use crate::utf16;
use crate::variables::VariableTable;

/// Classification of a logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// Includes parser-directive lines; recognized directives are tracked
    /// separately in `DocumentModel::directives`.
    Comment,
    Instruction(Instruction),
}

/// A classified logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub span: LogicalSpan,
    pub kind: LineKind,
}

/// Parsed snapshot of one document revision.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    text: String,
    physical: Vec<PhysicalLine>,
    pub escape: char,
    pub directives: Vec<Directive>,
    pub lines: Vec<LogicalLine>,
    pub variables: VariableTable,
}

impl DocumentModel {
    pub fn parse(text: &str) -> Self {
        let physical = scanner::scan(text);
        let scan = directive::scan_directives(text, &physical);
        log::trace!(
            "parsed {} physical lines, escape {:?}, {} directives",
            physical.len(),
            scan.escape,
            scan.directives.len()
        );

        let spans = continuation::normalize(text, &physical, scan.escape);
        let lines: Vec<LogicalLine> = spans
            .into_iter()
            .map(|span| {
                let kind = classify(&span);
                LogicalLine { span, kind }
            })
            .collect();
        let variables = VariableTable::build(&lines);

        Self {
            text: text.to_string(),
            physical,
            escape: scan.escape,
            directives: scan.directives,
            lines,
            variables,
        }
    }

    pub fn physical_line_count(&self) -> usize {
        self.physical.len()
    }

    /// Text of a physical line, without its terminator.
    pub fn line_text(&self, index: usize) -> &str {
        self.physical
            .get(index)
            .map(|line| line.text(&self.text))
            .unwrap_or("")
    }

    /// Map a (physical line, char column) position to its logical line index
    /// and the char offset within that logical text. `None` when the
    /// position is not inside any fragment.
    pub fn locate(&self, line: usize, col: usize) -> Option<(usize, usize)> {
        self.lines.iter().enumerate().find_map(|(index, logical)| {
            logical
                .span
                .logical_offset(line, col)
                .map(|offset| (index, offset))
        })
    }

    /// The recognized directive whose key token covers the given position
    /// (end-inclusive, like all token hit-testing).
    pub fn directive_at(&self, line: usize, col: usize) -> Option<&Directive> {
        self.directives
            .iter()
            .find(|d| d.line == line && d.key_start <= col && col <= d.key_end)
    }

    /// LSP range of a directive's key token.
    pub fn directive_key_range(&self, directive: &Directive) -> Range {
        let text = self.line_text(directive.line);
        Range {
            start: Position::new(
                directive.line as u32,
                utf16::char_col_to_utf16_col(text, directive.key_start),
            ),
            end: Position::new(
                directive.line as u32,
                utf16::char_col_to_utf16_col(text, directive.key_end),
            ),
        }
    }

    /// LSP range of the portion of a logical-text token that lies in the
    /// fragment containing `offset` (the fragment under the cursor).
    pub fn token_range(
        &self,
        logical_index: usize,
        token: &StdRange<usize>,
        offset: usize,
    ) -> Option<Range> {
        let line = self.lines.get(logical_index)?;
        let fragment = line.span.fragment_containing(offset)?;
        let start = token.start.max(fragment.logical_start);
        let end = token.end.min(fragment.logical_end());
        if start >= end {
            return None;
        }
        let start_col = fragment.start_col + (start - fragment.logical_start);
        let end_col = fragment.start_col + (end - fragment.logical_start);
        let text = self.line_text(fragment.line);
        Some(Range {
            start: Position::new(
                fragment.line as u32,
                utf16::char_col_to_utf16_col(text, start_col),
            ),
            end: Position::new(
                fragment.line as u32,
                utf16::char_col_to_utf16_col(text, end_col),
            ),
        })
    }
}

fn classify(span: &LogicalSpan) -> LineKind {
    let trimmed = span.text.trim_start();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }
    match instruction::parse(&span.text) {
        Some(instr) => LineKind::Instruction(instr),
        None => LineKind::Blank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let model = DocumentModel::parse("#escape=`\n\nFROM node\n# note\n   ");
        assert_eq!(model.lines.len(), 5);
        assert_eq!(model.lines[0].kind, LineKind::Comment);
        assert_eq!(model.lines[1].kind, LineKind::Blank);
        assert!(matches!(model.lines[2].kind, LineKind::Instruction(_)));
        assert_eq!(model.lines[3].kind, LineKind::Comment);
        assert_eq!(model.lines[4].kind, LineKind::Blank);
        assert_eq!(model.escape, '`');
        assert_eq!(model.directives.len(), 1);
    }

    #[test]
    fn test_directive_changes_continuation() {
        // Under a backtick escape the backslash no longer continues lines.
        let model = DocumentModel::parse("#escape=`\nONBUILD \\\nEXPOSE 8080");
        let instructions: Vec<&str> = model
            .lines
            .iter()
            .filter_map(|l| match &l.kind {
                LineKind::Instruction(i) => Some(i.keyword.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(instructions, vec!["ONBUILD", "EXPOSE"]);
    }

    #[test]
    fn test_locate_through_continuation() {
        let model = DocumentModel::parse("fr\\\noM node");
        assert_eq!(model.locate(0, 0), Some((0, 0)));
        assert_eq!(model.locate(1, 1), Some((0, 3)));
        // The escape character belongs to no fragment.
        assert_eq!(model.locate(0, 2), None);
        assert_eq!(model.locate(5, 0), None);
    }

    #[test]
    fn test_line_text_out_of_bounds() {
        let model = DocumentModel::parse("FROM node");
        assert_eq!(model.line_text(0), "FROM node");
        assert_eq!(model.line_text(7), "");
    }

    #[test]
    fn test_token_range_clipped_to_fragment() {
        let model = DocumentModel::parse("fr\\\noM node");
        // Keyword "froM" spans logical 0..4 over two fragments.
        let range = model.token_range(0, &(0..4), 0).unwrap();
        assert_eq!(range.start, Position::new(0, 0));
        assert_eq!(range.end, Position::new(0, 2));
        let range = model.token_range(0, &(0..4), 3).unwrap();
        assert_eq!(range.start, Position::new(1, 0));
        assert_eq!(range.end, Position::new(1, 2));
    }

    #[test]
    fn test_empty_document() {
        let model = DocumentModel::parse("");
        assert_eq!(model.physical_line_count(), 1);
        assert_eq!(model.lines.len(), 1);
        assert_eq!(model.lines[0].kind, LineKind::Blank);
        assert_eq!(model.locate(0, 0), None);
    }
}
