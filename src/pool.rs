//! Thread-local parser pooling.
//!
//! Eliminates redundant parser creation by maintaining one reusable parser
//! per language per thread. Creates a parser on first use, reuses it for
//! subsequent operations.

use crate::parse::{ParseError, SourceLang, SourceParser};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static PARSERS: RefCell<HashMap<SourceLang, SourceParser>> = RefCell::new(HashMap::new());
}

/// Execute a function with a pooled parser for `lang`.
///
/// On first call per thread and language, creates a new parser. Subsequent
/// calls reuse the same instance, avoiding grammar re-initialization.
pub fn with_parser<F, R>(lang: SourceLang, f: F) -> Result<R, ParseError>
where
    F: FnOnce(&mut SourceParser) -> R,
{
    PARSERS.with(|cell| {
        let mut pool = cell.borrow_mut();
        if !pool.contains_key(&lang) {
            pool.insert(lang, SourceParser::new(lang)?);
        }
        Ok(f(pool
            .get_mut(&lang)
            .expect("parser was just inserted above")))
    })
}
