//
// hover.rs
//
// The hover query engine: classify a position against the parsed document
// model and produce documentation or a resolved variable value. Pure reads,
// fixed priority order, and exactly one negative outcome ("no hover") for
// every malformed or out-of-bounds input.
//

use std::ops::Range as StdRange;

use tower_lsp::lsp_types::{Position, Range};

use crate::document_model::{DocumentModel, LineKind};
use crate::markdown::DocumentationProvider;
use crate::utf16;
use crate::variables;

/// Token hit-testing is inclusive of the end offset: an LSP position sits
/// between characters, so the boundary just past a token still hovers it.
fn hits(span: &StdRange<usize>, offset: usize) -> bool {
    span.start <= offset && offset <= span.end
}

/// What a successful hover carries: keyword/directive documentation
/// (markdown) or a build-argument value (plain text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverPayload {
    Documentation(String),
    Value(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverResult {
    pub payload: HoverPayload,
    pub range: Option<Range>,
}

/// Classify `position` against a parsed model, in priority order: directive
/// key, instruction keyword (top-level, then the `ONBUILD` trigger), `ARG`
/// self-lookup, variable reference. Everything else is no hover.
pub fn query(
    model: &DocumentModel,
    position: Position,
    docs: &dyn DocumentationProvider,
) -> Option<HoverResult> {
    let line = position.line as usize;
    if line >= model.physical_line_count() {
        return None;
    }
    let col = utf16::utf16_col_to_char_col(model.line_text(line), position.character);

    if let Some(directive) = model.directive_at(line, col) {
        let markdown = docs.get_markdown(&directive.canonical_key())?;
        return Some(HoverResult {
            payload: HoverPayload::Documentation(markdown),
            range: Some(model.directive_key_range(directive)),
        });
    }

    let (logical_index, offset) = model.locate(line, col)?;
    let instr = match &model.lines[logical_index].kind {
        LineKind::Instruction(instr) => instr,
        _ => return None,
    };

    if hits(&instr.keyword_span, offset) {
        if !instr.recognized {
            return None;
        }
        let markdown = docs.get_markdown(&instr.keyword)?;
        return Some(HoverResult {
            payload: HoverPayload::Documentation(markdown),
            range: model.token_range(logical_index, &instr.keyword_span, offset),
        });
    }

    if let Some(nested) = &instr.nested {
        if hits(&nested.keyword_span, offset) {
            if !nested.recognized {
                return None;
            }
            let markdown = docs.get_markdown(&nested.keyword)?;
            return Some(HoverResult {
                payload: HoverPayload::Documentation(markdown),
                range: model.token_range(logical_index, &nested.keyword_span, offset),
            });
        }
    }

    // Hovering the name token of an ARG's own declaration resolves to that
    // declaration's value; a bare declaration yields nothing.
    if instr.recognized && instr.keyword == "ARG" {
        if let Some(decl) = model.variables.declaration_at(logical_index, offset) {
            let value = decl.value.clone()?;
            return Some(HoverResult {
                payload: HoverPayload::Value(value),
                range: model.token_range(logical_index, &decl.name_span, offset),
            });
        }
    }

    if let Some(arg) = &instr.argument {
        if let Some(reference) = variables::reference_at(&arg.text, arg.span.start, offset) {
            let decl = model
                .variables
                .resolve(&reference.name, logical_index, reference.span.start)?;
            let value = decl.value.clone()?;
            return Some(HoverResult {
                payload: HoverPayload::Value(value),
                range: model.token_range(logical_index, &reference.span, offset),
            });
        }
    }

    None
}

/// Public convenience entry: parse one document snapshot and query it.
pub fn hover(
    text: &str,
    position: Position,
    docs: &dyn DocumentationProvider,
) -> Option<HoverResult> {
    query(&DocumentModel::parse(text), position, docs)
}
