use maestro_lsp_core::LineIndex;
use tower_lsp::lsp_types::{Position, Range};

/// Represents an open document in the LSP server
pub struct Document {
    /// The current text content of the document
    text: String,
    /// Whether the document lives in a flow folder
    is_flow: bool,
}

impl Document {
    pub fn new(text: String, is_flow: bool) -> Self {
        Self { text, is_flow }
    }

    pub fn update_text(&mut self, new_text: String) {
        self.text = new_text;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_flow(&self) -> bool {
        self.is_flow
    }

    /// Line table for converting between byte offsets and LSP positions.
    /// Building it scans the whole text, so handlers build one per request.
    pub fn positions(&self) -> Positions<'_> {
        Positions {
            index: LineIndex::new(&self.text),
        }
    }
}

pub struct Positions<'a> {
    index: LineIndex<'a>,
}

impl Positions<'_> {
    /// Byte offset of an LSP position
    pub fn offset_at(&self, position: Position) -> usize {
        self.index.offset(position.line, position.character)
    }

    /// LSP position of a byte offset
    pub fn position_at(&self, offset: usize) -> Position {
        let (line, character) = self.index.position(offset);
        Position { line, character }
    }

    pub fn range_of(&self, range: std::ops::Range<usize>) -> Range {
        Range {
            start: self.position_at(range.start),
            end: self.position_at(range.end),
        }
    }
}
