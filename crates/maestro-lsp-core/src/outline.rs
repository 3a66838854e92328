//! Structural lookup over a flow document.
//!
//! Completion only needs one structural question answered: which `key:`
//! encloses a given offset, and does the offset sit in that key's value.
//! [`KeyValueLookup`] is that question; [`YamlOutline`] answers it from
//! indentation alone.

use std::ops::Range;

use crate::line::LineShape;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Inline value on the key's own line
    Scalar,
    /// `|` or `>` block scalar spanning the following indented lines
    Block,
}

/// Value region of a pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueNode {
    /// From after the colon to the end of the line (or the start of a
    /// comment); for blocks, to the end of the last body line. Empty when
    /// nothing follows the colon.
    pub range: Range<usize>,
    pub kind: ValueKind,
}

impl ValueNode {
    /// End inclusive, so a cursor right after the last typed character
    /// still counts
    pub fn contains(&self, offset: usize) -> bool {
        self.range.start <= offset && offset <= self.range.end
    }
}

/// A `key: value` pair as seen from a cursor position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValuePair {
    pub key: String,
    pub key_range: Range<usize>,
    pub value: Option<ValueNode>,
}

impl KeyValuePair {
    /// Whether `offset` falls in the pair's value region
    pub fn value_contains(&self, offset: usize) -> bool {
        self.value.as_ref().map_or(false, |v| v.contains(offset))
    }
}

/// Supplies the innermost key/value pair enclosing an offset
pub trait KeyValueLookup {
    fn enclosing_pair(&self, offset: usize) -> Option<KeyValuePair>;
}

impl<T: KeyValueLookup + ?Sized> KeyValueLookup for &T {
    fn enclosing_pair(&self, offset: usize) -> Option<KeyValuePair> {
        (**self).enclosing_pair(offset)
    }
}

struct OutlineLine {
    start: usize,
    /// Length without the line terminator
    len: usize,
    shape: LineShape,
    /// Header line of the block scalar this line belongs to
    block_header: Option<usize>,
}

/// Indentation outline of a flow document
pub struct YamlOutline<'a> {
    text: &'a str,
    lines: Vec<OutlineLine>,
}

impl<'a> YamlOutline<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        for raw in text.split_inclusive('\n') {
            let line = raw.trim_end_matches(&['\n', '\r'][..]);
            lines.push(OutlineLine {
                start,
                len: line.len(),
                shape: LineShape::parse(line),
                block_header: None,
            });
            start += raw.len();
        }
        if text.is_empty() || text.ends_with('\n') {
            lines.push(OutlineLine {
                start,
                len: 0,
                shape: LineShape::default(),
                block_header: None,
            });
        }

        let mut index = 0;
        while index < lines.len() {
            let body = block_body(&lines, index);
            for line in &mut lines[body.clone()] {
                line.block_header = Some(index);
            }
            index = body.end.max(index + 1);
        }

        Self { text, lines }
    }

    /// Every pair in the document, in order. Block scalar bodies are text,
    /// not structure.
    pub fn pairs(&self) -> Vec<KeyValuePair> {
        (0..self.lines.len())
            .filter(|&i| self.lines[i].block_header.is_none())
            .filter_map(|i| self.pair_on(i))
            .collect()
    }

    fn line_index(&self, offset: usize) -> usize {
        self.lines
            .iter()
            .rposition(|l| l.start <= offset)
            .unwrap_or(0)
    }

    fn pair_on(&self, index: usize) -> Option<KeyValuePair> {
        let line = &self.lines[index];
        let key = line.shape.key.as_ref()?;
        let colon = line.shape.colon?;
        let value_start = line.start + colon + 1;

        let value = if line.shape.block_scalar {
            let body = block_body(&self.lines, index);
            let end = match body.end.checked_sub(1) {
                Some(last) if last > index => self.lines[last].start + self.lines[last].len,
                _ => line.start + line.shape.body_end,
            };
            ValueNode {
                range: value_start..end,
                kind: ValueKind::Block,
            }
        } else {
            ValueNode {
                range: value_start..line.start + line.shape.body_end,
                kind: ValueKind::Scalar,
            }
        };

        Some(KeyValuePair {
            key: self.text[line.start + key.start..line.start + key.end].to_string(),
            key_range: line.start + key.start..line.start + key.end,
            value: Some(value),
        })
    }
}

/// Body lines of the block scalar opened on `header`, empty if the line
/// opens none. The body is every following line indented deeper than the
/// key, plus interior whitespace-only lines.
fn block_body(lines: &[OutlineLine], header: usize) -> Range<usize> {
    let first = header + 1;
    let shape = &lines[header].shape;
    if !shape.block_scalar {
        return first..first;
    }
    let column = shape.content_start();

    let mut last_content = first;
    for (i, line) in lines.iter().enumerate().skip(first) {
        let deeper = line.shape.indent > column;
        if !deeper && !line.shape.is_whitespace() {
            break;
        }
        if deeper {
            last_content = i + 1;
        }
    }
    // Trailing lines too shallow to continue the block are not part of it
    first..last_content
}

impl KeyValueLookup for YamlOutline<'_> {
    fn enclosing_pair(&self, offset: usize) -> Option<KeyValuePair> {
        let offset = offset.min(self.text.len());
        let index = self.line_index(offset);
        let current = &self.lines[index];

        if let Some(header) = current.block_header {
            return self.pair_on(header);
        }

        if let Some(colon) = current.shape.colon {
            if offset > current.start + colon {
                return self.pair_on(index);
            }
        }

        let cursor_column = offset - current.start;
        let column = if current.shape.is_blank() {
            cursor_column
        } else {
            current.shape.content_start().min(cursor_column)
        };

        for (i, line) in self.lines[..index].iter().enumerate().rev() {
            if line.shape.separator {
                return None;
            }
            if line.shape.is_blank() || line.block_header.is_some() {
                continue;
            }
            if line.shape.content_start() < column {
                return self.pair_on(i);
            }
        }

        None
    }
}
