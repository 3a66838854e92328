//! Offline completion: what the editor would offer at a line/column.

use anyhow::{bail, Result};
use maestro_lsp_core::{complete, resolve_context, CompletionContext, LineIndex, YamlOutline};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CompletionReport {
    pub context: CompletionContext,
    pub items: Vec<CompletionEntry>,
}

#[derive(Debug, Serialize)]
pub struct CompletionEntry {
    pub label: String,
    pub description: String,
    pub emphasize: bool,
    /// Text that replaces `replace_start..cursor`
    pub insert_text: String,
    pub replace_start: usize,
}

/// Completion at a 1-based `line`/`column`
pub fn complete_at(source: &str, line: u32, column: u32) -> Result<CompletionReport> {
    if line == 0 || column == 0 {
        bail!("line and column are 1-based");
    }
    let index = LineIndex::new(source);
    if line as usize > index.line_count() {
        bail!("line {} is past the end of the file ({} lines)", line, index.line_count());
    }

    let cursor = index.offset(line - 1, column - 1);
    let outline = YamlOutline::parse(source);
    let context = resolve_context(source, cursor, &outline);

    let items = complete(source, cursor, &outline)
        .into_iter()
        .map(|suggestion| {
            let edit = suggestion.edit(source, cursor);
            CompletionEntry {
                label: suggestion.label,
                description: suggestion.description,
                emphasize: suggestion.emphasize,
                insert_text: edit.new_text,
                replace_start: edit.range.start,
            }
        })
        .collect();

    Ok(CompletionReport { context, items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_lsp_core::ContextKind;

    #[test]
    fn test_direction_values() {
        let source = "appId: app\n---\n- swipe:\n    direction: \n";
        let report = complete_at(source, 4, 16).unwrap();
        assert_eq!(report.context.kind, ContextKind::PropertyValue);
        let labels: Vec<_> = report.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["UP", "DOWN", "LEFT", "RIGHT"]);
    }

    #[test]
    fn test_command_insert_text() {
        let report = complete_at("---\n", 2, 1).unwrap();
        let launch = report.items.iter().find(|i| i.label == "launchApp").unwrap();
        assert_eq!(launch.insert_text, "- launchApp");
        assert!(launch.emphasize);
    }

    #[test]
    fn test_rejects_bad_positions() {
        assert!(complete_at("a: b", 0, 1).is_err());
        assert!(complete_at("a: b", 5, 1).is_err());
    }
}
