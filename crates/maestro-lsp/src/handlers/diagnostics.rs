use maestro_lsp_core::{scan_document, Severity};
use tower_lsp::lsp_types::*;

use crate::document::Document;

pub const SOURCE: &str = "maestro";
pub const BAD_VARIABLE_CODE: &str = "bad-variable";

/// Compute legacy variable warnings for a flow document
pub fn compute_diagnostics(doc: &Document) -> Vec<Diagnostic> {
    if !doc.is_flow() {
        return Vec::new();
    }

    let positions = doc.positions();

    scan_document(doc.text())
        .diagnostics
        .into_iter()
        .map(|diagnostic| Diagnostic {
            range: positions.range_of(diagnostic.span.range()),
            severity: Some(lsp_severity(diagnostic.severity)),
            code: Some(NumberOrString::String(BAD_VARIABLE_CODE.to_string())),
            source: Some(SOURCE.to_string()),
            message: diagnostic.message,
            tags: Some(vec![DiagnosticTag::DEPRECATED]),
            ..Default::default()
        })
        .collect()
}

fn lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Info => DiagnosticSeverity::INFORMATION,
        Severity::Warning => DiagnosticSeverity::WARNING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_variable_warning() {
        let doc = Document::new("---\n- inputText: $USER\n".to_string(), true);
        let diagnostics = compute_diagnostics(&doc);

        assert_eq!(diagnostics.len(), 1);
        let d = &diagnostics[0];
        assert_eq!(d.message, "Use ${USER} instead of $USER");
        assert_eq!(d.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(d.source.as_deref(), Some("maestro"));
        assert_eq!(
            d.range,
            Range::new(Position::new(1, 13), Position::new(1, 18))
        );
    }

    #[test]
    fn test_braced_variables_are_clean() {
        let doc = Document::new("---\n- inputText: ${USER}\n".to_string(), true);
        assert!(compute_diagnostics(&doc).is_empty());
    }

    #[test]
    fn test_files_outside_flow_folders_are_ignored() {
        let doc = Document::new("- inputText: $USER\n".to_string(), false);
        assert!(compute_diagnostics(&doc).is_empty());
    }
}
