pub mod completion;
pub mod diagnostics;
pub mod semantic_tokens;
