use tower_lsp::lsp_types::*;

use crate::handlers::semantic_tokens;

/// Define the server capabilities for the Maestro LSP
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        // Full text sync - simplest to implement
        text_document_sync: Some(TextDocumentSyncCapability::Kind(
            TextDocumentSyncKind::FULL,
        )),

        // Config keys, commands, properties and enumerated values
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(vec!["-".to_string(), ":".to_string(), " ".to_string()]),
            ..Default::default()
        }),

        // Expression highlighting
        semantic_tokens_provider: Some(SemanticTokensServerCapabilities::SemanticTokensOptions(
            SemanticTokensOptions {
                legend: semantic_tokens::legend(),
                full: Some(SemanticTokensFullOptions::Bool(true)),
                range: None,
                ..Default::default()
            },
        )),

        // Bad variable warnings are pushed via publishDiagnostics

        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advertised_capabilities() {
        let json = serde_json::to_value(server_capabilities()).unwrap();

        assert_eq!(json["textDocumentSync"], 1);
        assert_eq!(
            json["completionProvider"]["triggerCharacters"],
            serde_json::json!(["-", ":", " "])
        );
        assert_eq!(
            json["semanticTokensProvider"]["legend"]["tokenTypes"],
            serde_json::json!(["macro", "string", "operator", "variable"])
        );
        assert_eq!(json["semanticTokensProvider"]["full"], true);
    }
}
