//! Language selection via ast-grep-language.
//!
//! We use the built-in `SupportLang` grammars from ast-grep-language instead
//! of depending on individual tree-sitter grammar crates. The JavaScript
//! grammar includes JSX, so `.jsx` maps onto it directly.

use ast_grep_language::SupportLang;
use std::path::Path;

/// The source languages the profiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLang {
    JavaScript,
    TypeScript,
    Tsx,
}

impl SourceLang {
    /// Map a file path onto a language by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "js" | "jsx" | "mjs" | "cjs" => Some(SourceLang::JavaScript),
            "ts" | "mts" | "cts" => Some(SourceLang::TypeScript),
            "tsx" => Some(SourceLang::Tsx),
            _ => None,
        }
    }

    /// The ast-grep language carrying the tree-sitter grammar.
    pub fn support_lang(self) -> SupportLang {
        match self {
            SourceLang::JavaScript => SupportLang::JavaScript,
            SourceLang::TypeScript => SupportLang::TypeScript,
            SourceLang::Tsx => SupportLang::Tsx,
        }
    }

    /// Extensions eligible for discovery.
    pub fn extensions() -> &'static [&'static str] {
        &["js", "jsx", "mjs", "cjs", "ts", "mts", "cts", "tsx"]
    }
}
