//! Restyler: statistical style profiling and layout-preserving rewrites
//!
//! Learns a codebase's stylistic conventions from its tree-sitter syntax
//! trees and can rewrite other files' text to match, for style dimensions a
//! generic formatter cannot express, without changing program behavior.
//!
//! # Architecture
//!
//! Two independent pipelines share one rewrite primitive:
//!
//! - **Learning**: per-file signal extraction ([`signals`]) → aggregation →
//!   confidence-gated rule inference ([`infer`]) → a [`profile::StyleProfile`].
//! - **Applying**: structural pairing of constructs across parses
//!   ([`signature`]) → per-dimension layout normalizers ([`normalize`]) →
//!   disjoint byte-span replacements ([`edit`]).
//!
//! All rewrite operations compile down to a single primitive:
//! [`edit::Replacement`], a byte-span substitution applied in descending
//! offset order against the original string. Intelligence lives in span
//! acquisition, not in application.
//!
//! # Safety
//!
//! - A rule is only enforced past evidence and confidence floors
//! - Normalizers are best-effort, idempotent, and non-throwing
//! - Rewrites that would introduce parse errors are rolled back
//! - Atomic file writes (tempfile + fsync + rename)
//! - Workspace boundary enforcement
//!
//! # Example
//!
//! ```no_run
//! use restyler::infer::Thresholds;
//! use restyler::parse::{SourceLang, SourceParser};
//! use restyler::signals::{extract, AggregateSignals};
//!
//! let mut parser = SourceParser::new(SourceLang::JavaScript)?;
//! let source = "const greeting = \"hello\";\n";
//! let parsed = parser.parse_with_source(source)?;
//!
//! let mut aggregate = AggregateSignals::new();
//! aggregate.merge(&extract(&parsed));
//!
//! let profile = restyler::infer::infer_all(&aggregate, &Thresholds::default());
//! println!("{}", profile.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod discover;
pub mod edit;
pub mod infer;
pub mod normalize;
pub mod parse;
pub mod pool;
pub mod profile;
pub mod safety;
pub mod signals;
pub mod signature;
pub mod validate;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, ToolConfig};
pub use edit::{apply_replacements, Replacement};
pub use infer::{
    apply_suggestions, infer_all, Dimension, InferredRule, Provenance, RuleStatus, RuleSuggestion,
    RuleValue, Thresholds,
};
pub use normalize::{normalize_all, IndentKind, IndentOptions};
pub use parse::{ParseError, ParsedSource, SourceLang, SourceParser};
pub use profile::{ProfileError, StyleProfile};
pub use safety::{SafetyError, WorkspaceGuard};
pub use signals::{extract, AggregateSignals, FileSignals};
pub use signature::{signature_of, NodeSignature, SignatureQueue};
