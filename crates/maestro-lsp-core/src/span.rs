//! Spans, diagnostics and offset bookkeeping shared by the scanner and the
//! completion resolver.
//!
//! All offsets are byte offsets into the document text. Conversion to
//! editor coordinates (line, UTF-16 column) goes through [`LineIndex`].

use std::ops::Range;

use serde::Serialize;

/// Classification attached to a highlighted range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    ExpressionBackground,
    StringLiteral,
    Operator,
    Identifier,
    BadVariable,
}

impl SpanKind {
    pub const ALL: [SpanKind; 5] = [
        SpanKind::ExpressionBackground,
        SpanKind::Identifier,
        SpanKind::StringLiteral,
        SpanKind::Operator,
        SpanKind::BadVariable,
    ];

    /// Human readable name shown in colour settings and CLI output
    pub fn display_name(&self) -> &'static str {
        match self {
            SpanKind::ExpressionBackground => "Expression Background",
            SpanKind::Identifier => "Variable/Identifier (in expressions)",
            SpanKind::StringLiteral => "String Literal (in expressions)",
            SpanKind::Operator => "Operator (in expressions)",
            SpanKind::BadVariable => "Bad Variable ($VAR)",
        }
    }

    /// Stable attribute key editors can bind colours to
    pub fn attribute_key(&self) -> &'static str {
        match self {
            SpanKind::ExpressionBackground => "MAESTRO_EXPRESSION",
            SpanKind::Identifier => "MAESTRO_PROPERTY_REFERENCE",
            SpanKind::StringLiteral => "MAESTRO_STRING_LITERAL",
            SpanKind::Operator => "MAESTRO_OPERATOR",
            SpanKind::BadVariable => "MAESTRO_BAD_VARIABLE",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SpanKind::BadVariable => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// Half-open byte range `[start, end)` tagged with a [`SpanKind`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl TextSpan {
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Self { start, end, kind }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice of `text` this span covers
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

/// A message attached to a span
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub span: TextSpan,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(span: TextSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Collapse nested spans into a sorted, non-overlapping sequence.
///
/// Expression backgrounds are cut around the tokens they contain so that
/// only the uncovered parts (delimiters, whitespace) keep the background
/// kind. Among the remaining spans the earliest one wins on overlap.
pub fn flatten_spans(spans: &[TextSpan]) -> Vec<TextSpan> {
    let mut tokens: Vec<TextSpan> = spans
        .iter()
        .filter(|s| s.kind != SpanKind::ExpressionBackground && !s.is_empty())
        .copied()
        .collect();
    tokens.sort_by_key(|s| (s.start, s.end));

    let mut kept: Vec<TextSpan> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if kept.last().map_or(true, |last| token.start >= last.end) {
            kept.push(token);
        }
    }

    let mut flat = Vec::with_capacity(kept.len() * 2);
    for background in spans
        .iter()
        .filter(|s| s.kind == SpanKind::ExpressionBackground)
    {
        // `kept` is sorted and disjoint, so ends are sorted too
        let first = kept.partition_point(|t| t.end <= background.start);
        let mut cursor = background.start;
        for token in kept[first..]
            .iter()
            .take_while(|t| t.start < background.end)
        {
            if token.start > cursor {
                flat.push(TextSpan::new(cursor, token.start, background.kind));
            }
            cursor = cursor.max(token.end);
        }
        if cursor < background.end {
            flat.push(TextSpan::new(cursor, background.end, background.kind));
        }
    }

    flat.extend(kept);
    flat.sort_by_key(|s| (s.start, s.end));
    flat
}

/// Line table over a document, mapping byte offsets to editor positions.
///
/// Columns are counted in UTF-16 code units, the unit LSP clients use.
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts
            .get(line)
            .copied()
            .unwrap_or(self.text.len())
    }

    /// End of `line`, excluding its line terminator
    pub fn line_end(&self, line: usize) -> usize {
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let line_text = &self.text[self.line_start(line).min(end)..end];
        end - usize::from(line_text.ends_with('\r'))
    }

    /// Text of `line` without its terminator
    pub fn line_text(&self, line: usize) -> &'a str {
        let start = self.line_start(line);
        &self.text[start..self.line_end(line).max(start)]
    }

    /// `(line, utf16_column)` of a byte offset
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let offset = floor_char_boundary(self.text, offset);
        let line = self.line_of(offset);
        let start = self.line_start(line);
        let column: usize = self.text[start..offset].chars().map(char::len_utf16).sum();
        (line as u32, column as u32)
    }

    /// Byte offset of `(line, utf16_column)`, clamped to the line's end
    pub fn offset(&self, line: u32, column: u32) -> usize {
        let line = line as usize;
        if line >= self.line_starts.len() {
            return self.text.len();
        }
        let start = self.line_start(line);
        let mut remaining = column as usize;
        for (i, c) in self.line_text(line).char_indices() {
            if remaining == 0 {
                return start + i;
            }
            remaining = remaining.saturating_sub(c.len_utf16());
        }
        self.line_end(line)
    }
}

/// Largest char boundary in `text` at or before `offset`
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> u32 {
    text.chars().map(char::len_utf16).sum::<usize>() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_cuts_background_around_tokens() {
        // ${a + b}
        let spans = vec![
            TextSpan::new(0, 8, SpanKind::ExpressionBackground),
            TextSpan::new(2, 3, SpanKind::Identifier),
            TextSpan::new(4, 5, SpanKind::Operator),
            TextSpan::new(6, 7, SpanKind::Identifier),
        ];
        let flat = flatten_spans(&spans);
        let ranges: Vec<_> = flat.iter().map(|s| (s.start, s.end, s.kind)).collect();
        assert_eq!(
            ranges,
            vec![
                (0, 2, SpanKind::ExpressionBackground),
                (2, 3, SpanKind::Identifier),
                (3, 4, SpanKind::ExpressionBackground),
                (4, 5, SpanKind::Operator),
                (5, 6, SpanKind::ExpressionBackground),
                (6, 7, SpanKind::Identifier),
                (7, 8, SpanKind::ExpressionBackground),
            ]
        );
    }

    #[test]
    fn test_flatten_keeps_tokens_with_their_background() {
        // ${a} $B ${c}
        let spans = vec![
            TextSpan::new(0, 4, SpanKind::ExpressionBackground),
            TextSpan::new(2, 3, SpanKind::Identifier),
            TextSpan::new(8, 12, SpanKind::ExpressionBackground),
            TextSpan::new(10, 11, SpanKind::Identifier),
            TextSpan::new(5, 7, SpanKind::BadVariable),
        ];
        let ranges: Vec<_> = flatten_spans(&spans)
            .iter()
            .map(|s| (s.start, s.end, s.kind))
            .collect();
        assert_eq!(
            ranges,
            vec![
                (0, 2, SpanKind::ExpressionBackground),
                (2, 3, SpanKind::Identifier),
                (3, 4, SpanKind::ExpressionBackground),
                (5, 7, SpanKind::BadVariable),
                (8, 10, SpanKind::ExpressionBackground),
                (10, 11, SpanKind::Identifier),
                (11, 12, SpanKind::ExpressionBackground),
            ]
        );
    }

    #[test]
    fn test_flatten_drops_overlapping_tokens() {
        let spans = vec![
            TextSpan::new(3, 6, SpanKind::BadVariable),
            TextSpan::new(4, 6, SpanKind::Identifier),
        ];
        let flat = flatten_spans(&spans);
        assert_eq!(flat, vec![TextSpan::new(3, 6, SpanKind::BadVariable)]);
    }

    #[test]
    fn test_line_index_positions() {
        let text = "appId: x\n---\n- tapOn: é${a}\n";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(0), (0, 0));
        assert_eq!(index.position(9), (1, 0));
        let dollar = text.find('$').unwrap();
        assert_eq!(index.position(dollar), (2, 10));
        assert_eq!(index.offset(2, 10), dollar);
    }

    #[test]
    fn test_line_index_strips_carriage_return() {
        let text = "a: 1\r\nb: 2";
        let index = LineIndex::new(text);
        assert_eq!(index.line_text(0), "a: 1");
        assert_eq!(index.line_text(1), "b: 2");
        assert_eq!(index.offset(0, 99), 4);
    }

    #[test]
    fn test_span_kind_labels() {
        assert_eq!(SpanKind::Identifier.attribute_key(), "MAESTRO_PROPERTY_REFERENCE");
        assert_eq!(SpanKind::BadVariable.severity(), Severity::Warning);
        assert_eq!(SpanKind::Operator.severity(), Severity::Info);
    }
}
