//
// handlers.rs
//
// LSP-level request handlers. These translate between wire types and the
// core engine; all parsing/lookup logic lives below this layer.
//

use tower_lsp::lsp_types::{
    Hover, HoverContents, MarkedString, MarkupContent, MarkupKind, Position,
};
use url::Url;

use crate::hover::{self, HoverPayload};
use crate::state::WorldState;

pub fn hover(state: &WorldState, uri: &Url, position: Position) -> Option<Hover> {
    let doc = state.get_document(uri)?;
    let result = hover::query(&doc.model, position, state.docs.as_ref())?;

    let contents = match result.payload {
        HoverPayload::Documentation(markdown) => HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: markdown,
        }),
        HoverPayload::Value(value) => HoverContents::Scalar(MarkedString::String(value)),
    };

    Some(Hover {
        contents,
        range: result.range,
    })
}
