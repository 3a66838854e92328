//! Line-level shape of a YAML flow file.
//!
//! Flow files are block-style YAML: every line is at most a stack of list
//! markers, one `key:` and an inline scalar, optionally followed by a
//! comment. That is all the structure the leaf splitter and the outline
//! need, so nothing here attempts to parse YAML proper.

use std::ops::Range;

/// Positions are byte offsets relative to the start of the line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct LineShape {
    pub indent: usize,
    pub separator: bool,
    pub dashes: Vec<usize>,
    pub key: Option<Range<usize>>,
    pub colon: Option<usize>,
    /// Inline scalar, trimmed
    pub value: Option<Range<usize>>,
    /// The value is a `|` or `>` block indicator; the scalar continues on
    /// the following, more indented lines
    pub block_scalar: bool,
    /// End of the line body, i.e. where the comment (or the line) starts
    pub body_end: usize,
    pub comment: Option<Range<usize>>,
}

impl LineShape {
    pub fn parse(line: &str) -> Self {
        let indent = line.len() - line.trim_start().len();
        let comment_start = find_comment(line, indent);
        let body_end = comment_start.unwrap_or(line.len());
        let mut shape = LineShape {
            indent,
            body_end,
            comment: comment_start.map(|start| start..line.len()),
            ..Default::default()
        };

        if indent == 0 && line.starts_with("---") && line[3..body_end].trim().is_empty() {
            shape.separator = true;
            return shape;
        }

        let mut pos = indent;
        loop {
            let rest = &line[pos..body_end];
            if rest == "-" || rest.starts_with("- ") || rest.starts_with("-\t") {
                shape.dashes.push(pos);
                pos += 1;
                pos += leading_whitespace(&line[pos..body_end]);
            } else {
                break;
            }
        }

        let rest = &line[pos..body_end];
        match key_colon(rest) {
            Some(colon) => {
                let key = rest[..colon].trim_end();
                shape.key = Some(pos..pos + key.len());
                shape.colon = Some(pos + colon);
                let value_start = pos + colon + 1;
                let value_start = value_start + leading_whitespace(&line[value_start..body_end]);
                shape.value = scalar(line, value_start, body_end);
                shape.block_scalar = shape
                    .value
                    .as_ref()
                    .map_or(false, |v| line[v.clone()].starts_with(&['|', '>'][..]));
            }
            None => shape.value = scalar(line, pos, body_end),
        }

        shape
    }

    pub fn is_blank(&self) -> bool {
        !self.separator && self.dashes.is_empty() && self.key.is_none() && self.value.is_none()
    }

    /// Nothing but indentation
    pub fn is_whitespace(&self) -> bool {
        self.comment.is_none() && self.indent == self.body_end
    }

    /// Column where the line's structural content starts
    pub fn content_start(&self) -> usize {
        self.key
            .as_ref()
            .or(self.value.as_ref())
            .map(|r| r.start)
            .or_else(|| self.dashes.last().map(|d| d + 1))
            .unwrap_or(self.indent)
    }
}

fn scalar(line: &str, start: usize, body_end: usize) -> Option<Range<usize>> {
    let text = line[start.min(body_end)..body_end].trim_end();
    (!text.is_empty()).then(|| start..start + text.len())
}

fn leading_whitespace(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

/// Offset of the colon terminating a mapping key at the start of `rest`
fn key_colon(rest: &str) -> Option<usize> {
    if rest.starts_with(&['"', '\'', '{', '[', '|', '>'][..]) {
        return None;
    }
    let bytes = rest.as_bytes();
    let colon = bytes.iter().enumerate().position(|(i, &b)| {
        b == b':' && bytes.get(i + 1).map_or(true, |next| next.is_ascii_whitespace())
    })?;
    let key = rest[..colon].trim_end();
    if key.is_empty() || key.contains("${") {
        return None;
    }
    Some(colon)
}

/// Start of a `#` comment, ignoring `#` inside quoted scalars
fn find_comment(line: &str, from: usize) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == b'\\' && q == b'"' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => {
                let at_scalar_start = i == from || bytes[i - 1] == b' ' || bytes[i - 1] == b'-';
                if at_scalar_start {
                    quote = Some(b);
                }
            }
            None if b == b'#' && (i == from || bytes[i - 1].is_ascii_whitespace()) => {
                return Some(i);
            }
            None => {}
        }
        i += 1;
    }
    None
}
