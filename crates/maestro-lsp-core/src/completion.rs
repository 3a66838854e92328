//! Completion context resolution and suggestions for flow files.
//!
//! A completion request is answered in two steps: [`resolve_context`]
//! decides which slot the cursor is in, then [`suggestions`] looks the slot
//! up in the static [`schema`](crate::schema::schema).

use std::ops::Range;

use serde::Serialize;

use crate::outline::{KeyValueLookup, KeyValuePair};
use crate::schema::{schema, PropertySchema};
use crate::span::floor_char_boundary;

/// Document separator between the config header and the command list
pub const DOCUMENT_SEPARATOR: &str = "---";

/// The slot being edited
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// A key of the config header, before the first `---`
    TopLevelKey,
    /// A command in the command list
    CommandName,
    /// A property of the enclosing command
    CommandProperty,
    /// The value of an enumerated property
    PropertyValue,
    /// Nothing to suggest
    Unresolved,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::TopLevelKey => "top-level-key",
            ContextKind::CommandName => "command-name",
            ContextKind::CommandProperty => "command-property",
            ContextKind::PropertyValue => "property-value",
            ContextKind::Unresolved => "unresolved",
        }
    }
}

/// Result of classifying a cursor position
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletionContext {
    pub kind: ContextKind,
    pub enclosing_key: Option<String>,
}

/// A replacement of `range` in the document with `new_text`.
/// The cursor is expected to land at the end of the inserted text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub new_text: String,
}

/// Extra editing applied when a suggestion is accepted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertTransform {
    /// `appId` becomes `appId: `
    AppendKeySeparator,
    /// `tapOn` on a bare line becomes `- tapOn`
    EnsureListItem,
}

impl InsertTransform {
    /// Edit that inserts `label` for a cursor at `cursor`
    pub fn apply(&self, document: &str, cursor: usize, label: &str) -> TextEdit {
        let cursor = floor_char_boundary(document, cursor);
        let word = word_start(document, cursor);
        match self {
            InsertTransform::AppendKeySeparator => TextEdit {
                range: word..cursor,
                new_text: format!("{}: ", label),
            },
            InsertTransform::EnsureListItem => {
                let line = line_start(document, word);
                let before = &document[line..word];
                if before.trim().starts_with('-') {
                    TextEdit {
                        range: word..cursor,
                        new_text: label.to_string(),
                    }
                } else {
                    let indent = before.len() - before.trim_start().len();
                    TextEdit {
                        range: line + indent..cursor,
                        new_text: format!("- {}", label),
                    }
                }
            }
        }
    }
}

/// One completion candidate
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub label: String,
    pub description: String,
    pub emphasize: bool,
    pub insert: Option<InsertTransform>,
}

impl Suggestion {
    fn plain(label: &str, description: &str) -> Self {
        Self {
            label: label.to_string(),
            description: description.to_string(),
            emphasize: false,
            insert: None,
        }
    }

    /// Edit that accepts this suggestion at `cursor`
    pub fn edit(&self, document: &str, cursor: usize) -> TextEdit {
        match self.insert {
            Some(transform) => transform.apply(document, cursor, &self.label),
            None => {
                let cursor = floor_char_boundary(document, cursor);
                TextEdit {
                    range: word_start(document, cursor)..cursor,
                    new_text: self.label.clone(),
                }
            }
        }
    }
}

/// What the rules get to look at
struct Probe<'a> {
    before: &'a str,
    line: &'a str,
    cursor: usize,
    pair: Option<&'a KeyValuePair>,
}

type Rule = fn(&Probe<'_>) -> bool;

/// Evaluated in order, the first match wins
const RULES: [(ContextKind, Rule); 4] = [
    (ContextKind::TopLevelKey, is_top_level),
    (ContextKind::CommandName, is_command_slot),
    (ContextKind::CommandProperty, is_property_slot),
    (ContextKind::PropertyValue, is_value_slot),
];

fn is_top_level(probe: &Probe<'_>) -> bool {
    !probe.before.contains(DOCUMENT_SEPARATOR)
}

fn is_command_slot(probe: &Probe<'_>) -> bool {
    if probe.line.contains(':') {
        return false;
    }
    let trimmed = probe.line.trim();
    if trimmed.starts_with("- ") || trimmed == "-" {
        return true;
    }
    // Root indentation only
    trimmed.is_empty() && probe.line.chars().take_while(|c| *c == ' ').count() <= 2
}

fn is_property_slot(probe: &Probe<'_>) -> bool {
    probe
        .pair
        .map_or(false, |pair| !pair.value_contains(probe.cursor))
}

fn is_value_slot(probe: &Probe<'_>) -> bool {
    probe
        .pair
        .map_or(false, |pair| pair.value_contains(probe.cursor))
}

/// Classify the cursor position in `text`.
///
/// Rules look at the text before the word being typed, so a partially
/// typed name is classified like an empty slot. `lookup` supplies the YAML
/// structure around the cursor; pass a
/// [`YamlOutline`](crate::outline::YamlOutline) when no host parser is
/// available.
pub fn resolve_context(
    text: &str,
    cursor: usize,
    lookup: &dyn KeyValueLookup,
) -> CompletionContext {
    let anchor = word_start(text, floor_char_boundary(text, cursor));
    let before = &text[..anchor];
    let pair = lookup.enclosing_pair(anchor);
    let probe = Probe {
        before,
        line: &before[line_start(text, anchor)..],
        cursor: anchor,
        pair: pair.as_ref(),
    };

    let kind = RULES
        .iter()
        .find(|(_, rule)| rule(&probe))
        .map(|(kind, _)| *kind)
        .unwrap_or(ContextKind::Unresolved);

    CompletionContext {
        kind,
        enclosing_key: pair.map(|p| p.key),
    }
}

/// Suggestions for a resolved context, in display order
pub fn suggestions(context: &CompletionContext) -> Vec<Suggestion> {
    let schema = schema();
    let key = context.enclosing_key.as_deref();

    match context.kind {
        ContextKind::TopLevelKey => schema
            .config_keys
            .iter()
            .map(|p| Suggestion {
                insert: Some(InsertTransform::AppendKeySeparator),
                ..Suggestion::plain(p.name, p.description)
            })
            .collect(),
        ContextKind::CommandName => schema
            .commands
            .iter()
            .map(|c| Suggestion {
                emphasize: true,
                insert: Some(InsertTransform::EnsureListItem),
                ..Suggestion::plain(c.name, c.description)
            })
            .collect(),
        ContextKind::CommandProperty => {
            let command = key.and_then(|k| schema.command(k));
            let mut properties: Vec<&PropertySchema> = schema.common_properties.iter().collect();
            if let Some(command) = command {
                if command.uses_selector {
                    properties.extend(schema.selector_properties.iter());
                }
                properties.extend(command.properties.iter());
            }
            properties
                .into_iter()
                .map(|p| Suggestion::plain(p.name, p.description))
                .collect()
        }
        ContextKind::PropertyValue => key
            .and_then(|k| schema.value_domain(k))
            .map(|domain| {
                domain
                    .values
                    .iter()
                    .map(|v| Suggestion::plain(v, ""))
                    .collect()
            })
            .unwrap_or_default(),
        ContextKind::Unresolved => Vec::new(),
    }
}

/// Resolve the context at `cursor` and return its suggestions
pub fn complete(text: &str, cursor: usize, lookup: &dyn KeyValueLookup) -> Vec<Suggestion> {
    suggestions(&resolve_context(text, cursor, lookup))
}

fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Start of the identifier-like word ending at `offset`
fn word_start(text: &str, offset: usize) -> usize {
    text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map_or(offset, |(i, _)| i)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
