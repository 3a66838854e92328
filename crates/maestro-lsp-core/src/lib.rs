//! Core editor intelligence for Maestro flow files
//!
//! This crate provides the analysis behind the language server and the CLI.
//! Everything here is a pure function of the document text.
//!
//! # Features
//!
//! - **Scanning**: finds `${...}` expressions, classifies their string
//!   literals, operators and identifiers, and flags `$NAME` references
//!   that lack braces
//! - **Completion**: works out which slot the cursor is in (config key,
//!   command, command property, enumerated value) and suggests from the
//!   static command schema
//!
//! # Example
//!
//! ```
//! use maestro_lsp_core::{complete, scan_document, ContextKind, YamlOutline, resolve_context};
//!
//! let flow = "appId: com.example\n---\n- inputText: $USER\n";
//! let result = scan_document(flow);
//! assert_eq!(result.diagnostics[0].message, "Use ${USER} instead of $USER");
//!
//! let text = "appId: com.example\n---\n";
//! let outline = YamlOutline::parse(text);
//! assert_eq!(resolve_context(text, text.len(), &outline).kind, ContextKind::CommandName);
//! assert!(complete(text, text.len(), &outline).iter().any(|s| s.label == "launchApp"));
//! ```

pub mod completion;
pub mod leaves;
mod line;
pub mod outline;
pub mod scanner;
pub mod schema;
pub mod settings;
pub mod span;

// Re-export main types for convenience
pub use completion::{
    complete, resolve_context, suggestions, CompletionContext, ContextKind, InsertTransform,
    Suggestion, TextEdit,
};
pub use leaves::{leaves, Leaf};
pub use outline::{KeyValueLookup, KeyValuePair, ValueKind, ValueNode, YamlOutline};
pub use scanner::{scan, scan_document, ScanResult};
pub use schema::{schema, CommandSchema, PropertySchema, Schema, ValueDomain};
pub use settings::{Settings, SettingsError};
pub use span::{
    flatten_spans, utf16_len, Diagnostic, LineIndex, Severity, SpanKind, TextSpan,
};
