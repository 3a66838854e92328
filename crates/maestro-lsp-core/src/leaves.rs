//! Leaf tokens of a flow document.
//!
//! The scanner works on one leaf at a time. A leaf is the smallest piece of
//! text the YAML lexer would hand out: a list marker, a key, the `:`
//! indicator, a scalar or a comment. Leaves never contain each other, so
//! scanning every leaf never produces duplicate spans.

use crate::line::LineShape;

/// A leaf token and its absolute byte offset in the document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leaf<'a> {
    pub offset: usize,
    pub text: &'a str,
}

impl<'a> Leaf<'a> {
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Split `text` into leaves, in document order
pub fn leaves(text: &str) -> Vec<Leaf<'_>> {
    let mut out = Vec::new();
    let mut line_start = 0;

    for raw in text.split_inclusive('\n') {
        let line = raw.trim_end_matches(&['\n', '\r'][..]);
        let shape = LineShape::parse(line);
        let mut push = |start: usize, end: usize| {
            if start < end {
                out.push(Leaf {
                    offset: line_start + start,
                    text: &line[start..end],
                });
            }
        };

        if shape.separator {
            push(0, shape.body_end.min(line.trim_end().len()));
        }
        for dash in &shape.dashes {
            push(*dash, dash + 1);
        }
        if let Some(key) = &shape.key {
            push(key.start, key.end);
        }
        if let Some(colon) = shape.colon {
            push(colon, colon + 1);
        }
        if let Some(value) = &shape.value {
            push(value.start, value.end);
        }
        if let Some(comment) = &shape.comment {
            push(comment.start, line.trim_end().len());
        }

        line_start += raw.len();
    }

    out
}
