mod clike;
mod plain;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

pub use clike::CLikeLexer;
pub use plain::PlainTextLexer;

use crate::error::LexError;
use crate::token::{FileId, TokenStream};

/// What a language front-end must provide. Implementations are deterministic,
/// emit tokens in document order with strictly increasing begin positions,
/// never emit zero-length tokens, and report malformed input as a `LexError`
/// instead of panicking.
pub trait Lexer: Send + Sync {
    fn tokenize(&self, text: &str, file_id: FileId) -> Result<TokenStream, LexError>;
}

/// Explicit language table, built once at startup and passed by reference
/// into the run. Keyed by language id plus optional version; resolution falls
/// back to the versionless entry.
pub struct LanguageRegistry {
    lexers: HashMap<(String, Option<String>), Arc<dyn Lexer>>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self {
            lexers: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in front-ends.
    pub fn with_builtin_languages() -> Self {
        let mut registry = Self::new();
        let clike: Arc<dyn Lexer> = Arc::new(CLikeLexer::new());
        for id in [
            "c",
            "cpp",
            "csharp",
            "go",
            "java",
            "javascript",
            "rust",
            "typescript",
        ] {
            registry.register(id, None, Arc::clone(&clike));
        }
        registry.register("text", None, Arc::new(PlainTextLexer));
        registry
    }

    pub fn register(&mut self, language_id: &str, version: Option<&str>, lexer: Arc<dyn Lexer>) {
        self.lexers.insert(
            (language_id.to_string(), version.map(str::to_string)),
            lexer,
        );
    }

    /// Resolves `(id, version)` and falls back to `(id, None)`. `None` means
    /// the language is unsupported; callers record that as a per-file
    /// diagnostic rather than failing the run.
    pub fn resolve(&self, language_id: &str, version: Option<&str>) -> Option<Arc<dyn Lexer>> {
        if let Some(version) = version
            && let Some(lexer) = self
                .lexers
                .get(&(language_id.to_string(), Some(version.to_string())))
        {
            return Some(Arc::clone(lexer));
        }
        self.lexers
            .get(&(language_id.to_string(), None))
            .map(Arc::clone)
    }

    /// Sorted, deduplicated ids, for display.
    pub fn language_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lexers.keys().map(|(id, _)| id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::with_builtin_languages()
    }
}
