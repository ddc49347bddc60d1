//! Post-rewrite validation.
//!
//! Hard rule: after computing a rewritten source, re-parse it and compare
//! ERROR nodes against the input. If the rewrite introduced a parse error
//! that was not already present, the rewrite is discarded and the input
//! returned unchanged.

use crate::parse::{ParseError, ParsedSource, SourceLang};
use crate::pool;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("parse error introduced: found {count} new ERROR nodes")]
    ParseErrorIntroduced { count: usize },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Check that `edited` does not introduce parse errors absent from
/// `original`. Pre-existing errors are tolerated.
pub fn validate_edit(original: &str, edited: &str, lang: SourceLang) -> Result<(), ValidationError> {
    pool::with_parser(lang, |parser| {
        let original_parsed = parser.parse_with_source(original)?;
        let original_errors = error_positions(&original_parsed);

        let edited_parsed = parser.parse_with_source(edited)?;
        let edited_errors = error_positions(&edited_parsed);

        let new_errors = edited_errors.difference(&original_errors).count();
        if new_errors > 0 {
            return Err(ValidationError::ParseErrorIntroduced { count: new_errors });
        }
        Ok(())
    })?
}

/// Convenience predicate for the normalizers' keep-or-revert decision.
pub fn edit_is_clean(original: &str, edited: &str, lang: SourceLang) -> bool {
    validate_edit(original, edited, lang).is_ok()
}

fn error_positions(parsed: &ParsedSource<'_>) -> HashSet<(usize, usize)> {
    parsed
        .error_nodes()
        .into_iter()
        .map(|e| (e.byte_start, e.byte_end))
        .collect()
}
