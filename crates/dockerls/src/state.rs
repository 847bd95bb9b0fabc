//
// state.rs
//
// Shared server state: open documents keyed by URI, plus the injected
// documentation provider used to render hover content.
//

use std::collections::HashMap;
use std::sync::Arc;

use ropey::Rope;
use tower_lsp::lsp_types::TextDocumentContentChangeEvent;
use url::Url;

use crate::document_model::DocumentModel;
use crate::markdown::{DocumentationProvider, MarkdownDocumentation};
use crate::utf16;

/// An open document: rope contents for incremental edits, plus the parsed
/// model for the current revision. The model is rebuilt whole-document on
/// every change; hover queries only ever read it.
pub struct Document {
    pub contents: Rope,
    pub model: DocumentModel,
    pub version: Option<i32>,
    pub revision: u64,
}

impl Document {
    pub fn new(text: &str, version: Option<i32>) -> Self {
        Self {
            contents: Rope::from_str(text),
            model: DocumentModel::parse(text),
            version,
            revision: 0,
        }
    }

    pub fn apply_change(&mut self, change: TextDocumentContentChangeEvent) {
        if let Some(range) = change.range {
            let start_line = range.start.line as usize;
            let end_line = range.end.line as usize;

            let start_line_text = self.contents.line(start_line).to_string();
            let end_line_text = self.contents.line(end_line).to_string();

            let start_char =
                utf16::utf16_col_to_char_col(&start_line_text, range.start.character);
            let end_char = utf16::utf16_col_to_char_col(&end_line_text, range.end.character);

            let start_idx = self.contents.line_to_char(start_line) + start_char;
            let end_idx = self.contents.line_to_char(end_line) + end_char;

            self.contents.remove(start_idx..end_idx);
            self.contents.insert(start_idx, &change.text);
        } else {
            // Full document sync
            self.contents = Rope::from_str(&change.text);
        }

        self.revision += 1;
        self.model = DocumentModel::parse(&self.contents.to_string());
    }

    pub fn text(&self) -> String {
        self.contents.to_string()
    }
}

/// All state a request handler needs.
pub struct WorldState {
    documents: HashMap<Url, Document>,
    pub docs: Arc<dyn DocumentationProvider + Send + Sync>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::with_documentation(Arc::new(MarkdownDocumentation::new()))
    }

    pub fn with_documentation(docs: Arc<dyn DocumentationProvider + Send + Sync>) -> Self {
        Self {
            documents: HashMap::new(),
            docs,
        }
    }

    pub fn open_document(&mut self, uri: Url, text: &str, version: i32) {
        log::trace!("open_document: {} ({} bytes)", uri, text.len());
        self.documents
            .insert(uri, Document::new(text, Some(version)));
    }

    pub fn update_document(
        &mut self,
        uri: &Url,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) {
        if let Some(doc) = self.documents.get_mut(uri) {
            for change in changes {
                doc.apply_change(change);
            }
            doc.version = Some(version);
        } else {
            log::warn!("update_document for unopened document: {}", uri);
        }
    }

    pub fn close_document(&mut self, uri: &Url) {
        log::trace!("close_document: {}", uri);
        self.documents.remove(uri);
    }

    pub fn get_document(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}
