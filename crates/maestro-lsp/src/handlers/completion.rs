use maestro_lsp_core::{resolve_context, suggestions, ContextKind, Suggestion, YamlOutline};
use tower_lsp::lsp_types::*;

use crate::document::{Document, Positions};

/// Get completion items for a position in the document
pub fn get_completions(doc: &Document, position: Position) -> Vec<CompletionItem> {
    if !doc.is_flow() {
        return Vec::new();
    }

    let text = doc.text();
    let positions = doc.positions();
    let cursor = positions.offset_at(position);

    let context = resolve_context(text, cursor, &YamlOutline::parse(text));
    let kind = item_kind(context.kind);

    suggestions(&context)
        .iter()
        .enumerate()
        .map(|(index, suggestion)| {
            convert_to_lsp_completion(text, &positions, cursor, index, suggestion, kind)
        })
        .collect()
}

fn item_kind(context: ContextKind) -> CompletionItemKind {
    match context {
        ContextKind::TopLevelKey => CompletionItemKind::PROPERTY,
        ContextKind::CommandName => CompletionItemKind::FUNCTION,
        ContextKind::CommandProperty => CompletionItemKind::FIELD,
        ContextKind::PropertyValue => CompletionItemKind::ENUM_MEMBER,
        ContextKind::Unresolved => CompletionItemKind::TEXT,
    }
}

/// Convert a core suggestion to an LSP completion item
fn convert_to_lsp_completion(
    text: &str,
    positions: &Positions<'_>,
    cursor: usize,
    index: usize,
    suggestion: &Suggestion,
    kind: CompletionItemKind,
) -> CompletionItem {
    let edit = suggestion.edit(text, cursor);

    CompletionItem {
        label: suggestion.label.clone(),
        kind: Some(kind),
        detail: Some(suggestion.description.clone()),
        label_details: suggestion.emphasize.then(|| CompletionItemLabelDetails {
            detail: None,
            description: Some("command".to_string()),
        }),
        // Schema order is the presentation order
        sort_text: Some(format!("{:04}", index)),
        filter_text: Some(suggestion.label.clone()),
        text_edit: Some(CompletionTextEdit::Edit(TextEdit {
            range: positions.range_of(edit.range),
            new_text: edit.new_text,
        })),
        insert_text_format: Some(InsertTextFormat::PLAIN_TEXT),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::new(text.to_string(), true)
    }

    fn edit_of(item: &CompletionItem) -> &TextEdit {
        match item.text_edit.as_ref() {
            Some(CompletionTextEdit::Edit(edit)) => edit,
            other => panic!("unexpected edit {:?}", other),
        }
    }

    #[test]
    fn test_command_names_after_separator() {
        let doc = doc("appId: x\n---\n");
        let items = get_completions(&doc, Position::new(2, 0));

        assert_eq!(items.len(), 41);
        assert!(items.iter().all(|i| i.kind == Some(CompletionItemKind::FUNCTION)));
        assert!(items.iter().all(|i| i.label_details.is_some()));

        let launch = items.iter().find(|i| i.label == "launchApp").unwrap();
        let edit = edit_of(launch);
        assert_eq!(edit.new_text, "- launchApp");
        assert_eq!(edit.range, Range::new(Position::new(2, 0), Position::new(2, 0)));
    }

    #[test]
    fn test_top_level_keys_append_separator() {
        let doc = doc("app");
        let items = get_completions(&doc, Position::new(0, 3));

        assert_eq!(items[0].label, "appId");
        assert_eq!(items[0].kind, Some(CompletionItemKind::PROPERTY));
        let edit = edit_of(&items[0]);
        assert_eq!(edit.new_text, "appId: ");
        assert_eq!(edit.range, Range::new(Position::new(0, 0), Position::new(0, 3)));
    }

    #[test]
    fn test_value_items_keep_schema_order() {
        let doc = doc("---\n- swipe:\n    direction: ");
        let items = get_completions(&doc, Position::new(2, 15));

        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["UP", "DOWN", "LEFT", "RIGHT"]);
        let sort: Vec<_> = items.iter().filter_map(|i| i.sort_text.clone()).collect();
        let mut sorted = sort.clone();
        sorted.sort();
        assert_eq!(sort, sorted);
        assert!(items.iter().all(|i| i.kind == Some(CompletionItemKind::ENUM_MEMBER)));
    }

    #[test]
    fn test_no_items_for_free_value() {
        let doc = doc("---\n- tapOn: ");
        assert!(get_completions(&doc, Position::new(1, 9)).is_empty());
    }

    #[test]
    fn test_no_items_outside_flow_folders() {
        let doc = Document::new("---\n".to_string(), false);
        assert!(get_completions(&doc, Position::new(1, 0)).is_empty());
    }
}
