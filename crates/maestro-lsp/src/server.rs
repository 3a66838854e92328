use dashmap::DashMap;
use maestro_lsp_core::Settings;
use once_cell::sync::OnceCell;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::capabilities;
use crate::document::Document;
use crate::handlers;

pub struct Backend {
    client: Client,
    documents: DashMap<Url, Document>,
    settings: OnceCell<Settings>,
    debug: bool,
}

impl Backend {
    pub fn new(client: Client, debug: bool) -> Self {
        Self {
            client,
            documents: DashMap::new(),
            settings: OnceCell::new(),
            debug,
        }
    }

    fn settings(&self) -> &Settings {
        self.settings.get_or_init(Settings::default)
    }

    fn debug_enabled(&self) -> bool {
        self.debug || self.settings().debug
    }

    async fn log_debug(&self, message: &str) {
        tracing::debug!("{}", message);
        if self.debug_enabled() {
            self.client
                .log_message(MessageType::INFO, format!("[DEBUG] {}", message))
                .await;
        }
    }

    fn is_flow(&self, uri: &Url) -> bool {
        self.settings().is_flow_path(&flow_path(uri))
    }

    async fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: i32) {
        tracing::debug!(%uri, count = diagnostics.len(), "publishing diagnostics");
        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }
}

/// Decoded file system path of `uri`, or its raw path for non-file URIs
fn flow_path(uri: &Url) -> String {
    match uri.to_file_path() {
        Ok(path) => path.to_string_lossy().into_owned(),
        Err(()) => uri.path().to_string(),
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let options = params.initialization_options.unwrap_or_default();
        let settings = match Settings::from_json(options) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default settings");
                self.client
                    .log_message(MessageType::WARNING, format!("Maestro LSP: {}", err))
                    .await;
                Settings::default()
            }
        };
        tracing::info!(marker = %settings.flow_path_marker, "settings loaded");
        let _ = self.settings.set(settings);

        self.log_debug("Initializing Maestro LSP server").await;

        Ok(InitializeResult {
            capabilities: capabilities::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "maestro-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.log_debug("Server initialized successfully").await;
        self.client
            .log_message(MessageType::INFO, "Maestro LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.log_debug("Shutting down server").await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        self.log_debug(&format!("Document opened: {}", uri)).await;

        let document = Document::new(params.text_document.text, self.is_flow(&uri));
        let diagnostics = handlers::diagnostics::compute_diagnostics(&document);

        self.documents.insert(uri.clone(), document);

        self.publish(uri, diagnostics, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        self.log_debug(&format!("Document changed: {}", uri)).await;

        if let Some(mut doc) = self.documents.get_mut(&uri) {
            // Full sync: the last change carries the whole text
            for change in params.content_changes {
                doc.update_text(change.text);
            }

            let diagnostics = handlers::diagnostics::compute_diagnostics(&doc);

            drop(doc); // Release the lock before async call

            self.publish(uri, diagnostics, version).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.log_debug(&format!("Document closed: {}", uri)).await;
        self.documents.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        self.log_debug(&format!("Completion request at {:?}", position))
            .await;

        let items = match self.documents.get(uri) {
            Some(doc) => handlers::completion::get_completions(&doc, position),
            None => return Ok(None),
        };
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let uri = &params.text_document.uri;

        self.log_debug(&format!("Semantic tokens for: {}", uri))
            .await;

        let data = match self.documents.get(uri) {
            Some(doc) => handlers::semantic_tokens::get_semantic_tokens(&doc),
            None => return Ok(None),
        };
        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_path_is_percent_decoded() {
        let uri = Url::parse("file:///home/dev/my%20app/e2e%20flows/login.yaml").unwrap();
        let custom = Settings {
            flow_path_marker: "/e2e flows/".to_string(),
            ..Settings::default()
        };
        assert!(custom.is_flow_path(&flow_path(&uri)));
    }

    #[test]
    fn test_non_file_uri_uses_raw_path() {
        let uri = Url::parse("untitled:/maestro/Untitled-1").unwrap();
        assert_eq!(flow_path(&uri), "/maestro/Untitled-1");
    }
}
