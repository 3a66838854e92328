//! Lint module for Maestro flows.
//! Reports legacy `$NAME` references with line/column information.

use maestro_lsp_core::{scan_document, LineIndex};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LintIssue {
    /// 1-based line
    pub line: usize,
    /// 1-based column, in UTF-16 code units like editors count them
    pub column: usize,
    pub message: String,
    pub severity: String,
}

/// Check a flow for legacy variable references
pub fn check_flow(source: &str) -> Vec<LintIssue> {
    let index = LineIndex::new(source);

    scan_document(source)
        .diagnostics
        .into_iter()
        .map(|diagnostic| {
            let (line, column) = index.position(diagnostic.span.start);
            LintIssue {
                line: line as usize + 1,
                column: column as usize + 1,
                message: diagnostic.message,
                severity: diagnostic.severity.as_str().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_flow() {
        let source = "appId: app\n---\n- inputText: ${USER}\n";
        assert!(check_flow(source).is_empty());
    }

    #[test]
    fn test_reports_position_and_message() {
        let source = "appId: app\n---\n- inputText: $USER\n- tapOn: ok $B\n";
        let issues = check_flow(source);

        assert_eq!(issues.len(), 2);
        assert_eq!((issues[0].line, issues[0].column), (3, 14));
        assert_eq!(issues[0].message, "Use ${USER} instead of $USER");
        assert_eq!(issues[0].severity, "warning");
        assert_eq!((issues[1].line, issues[1].column), (4, 13));
    }

    #[test]
    fn test_json_shape() {
        let issues = check_flow("- back: $X");
        let json = serde_json::to_value(&issues).unwrap();
        assert_eq!(json[0]["line"], 1);
        assert_eq!(json[0]["severity"], "warning");
    }
}
