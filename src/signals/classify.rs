//! Pure classification predicates used by the signal extractor.
//!
//! Each predicate answers one question about a token or a text fragment and
//! is independently unit-testable. Tree traversal stays in `extract`; the
//! string-level pattern logic lives here.

/// Directive and pragma prefixes that disqualify a line comment from the
/// comment-spacing dimension.
const DIRECTIVE_PREFIXES: &[&str] = &[
    "eslint-disable",
    "eslint-enable",
    "eslint-env",
    "eslint ",
    "prettier-ignore",
    "jshint",
    "jslint",
    "globals ",
    "global ",
    "exported",
    "noinspection",
    "istanbul ignore",
    "c8 ignore",
    "@ts-ignore",
    "@ts-expect-error",
    "@ts-nocheck",
    "@ts-check",
    "#region",
    "#endregion",
    "#sourceMappingURL",
];

/// Outcome of classifying a line comment for the comment-spacing dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSpacing {
    /// Text starts with whitespace after the marker.
    Spaced,
    /// Text starts immediately after the marker.
    Unspaced,
    /// Empty, separator-only, or directive comment; not evidence.
    Excluded,
}

/// Classify a comment node's full text (`//...`) for the spacing dimension.
///
/// Block comments and excluded line comments yield `Excluded`.
pub fn classify_comment_spacing(comment_text: &str) -> CommentSpacing {
    let Some(content) = comment_text.strip_prefix("//") else {
        return CommentSpacing::Excluded;
    };
    // `///` and `//!` style markers: strip repeated marker characters so the
    // spacing judgment is about the text, not the marker.
    let content = content.trim_start_matches(['/', '!']);

    if content.trim().is_empty() {
        return CommentSpacing::Excluded;
    }
    if is_separator_text(content.trim()) {
        return CommentSpacing::Excluded;
    }
    if is_directive_text(content.trim_start()) {
        return CommentSpacing::Excluded;
    }

    if content.starts_with(char::is_whitespace) {
        CommentSpacing::Spaced
    } else {
        CommentSpacing::Unspaced
    }
}

/// True if the text is purely punctuation/separator characters
/// (`-----`, `====`, `****`, boxes, etc.).
pub fn is_separator_text(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_punctuation() || c.is_whitespace())
}

/// True if the text begins with a known directive/pragma prefix.
pub fn is_directive_text(text: &str) -> bool {
    DIRECTIVE_PREFIXES
        .iter()
        .any(|prefix| text.starts_with(prefix))
}

/// Count the words in an identifier, splitting on case changes and
/// separator characters.
///
/// `getUserName` → 3, `HTTPServer` → 2, `max_value` → 2, `x` → 1.
pub fn identifier_words(name: &str) -> usize {
    let mut words = 0;
    for segment in name.split(|c: char| !c.is_alphanumeric()) {
        if segment.is_empty() {
            continue;
        }
        words += camel_words(segment);
    }
    words
}

fn camel_words(segment: &str) -> usize {
    let chars: Vec<char> = segment.chars().collect();
    let mut words = 1;
    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let cur = chars[i];
        // lower/digit → Upper starts a word
        if cur.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()) {
            words += 1;
        }
        // end of an acronym run: UPPERUpperlower splits before the last capital
        if i + 1 < chars.len()
            && prev.is_uppercase()
            && cur.is_uppercase()
            && chars[i + 1].is_lowercase()
        {
            words += 1;
        }
    }
    words
}

/// True if the comment text is a doc-style block comment (`/**`).
pub fn is_doc_block_comment(comment_text: &str) -> bool {
    comment_text.starts_with("/**") && !comment_text.starts_with("/***")
}

/// True for node kinds that read as literal values in a comparison.
///
/// Template strings only qualify when they contain no substitutions; that is
/// checked by the caller, which passes `has_substitution`.
pub fn is_literal_kind(kind: &str, has_substitution: bool) -> bool {
    match kind {
        "string" | "number" | "true" | "false" | "null" | "undefined" | "regex" => true,
        "template_string" => !has_substitution,
        _ => false,
    }
}

/// Comparison operators eligible for the yoda dimension.
pub fn is_comparison_operator(op: &str) -> bool {
    matches!(op, "==" | "===" | "!=" | "!==" | "<" | ">" | "<=" | ">=")
}

/// True if the code to the left of a trailing comment looks alignment-worthy:
/// an assignment, an object key, an array/bracket opener, or a
/// comma-terminated expression.
pub fn alignment_worthy(code: &str) -> bool {
    let t = code.trim_end();
    if t.is_empty() {
        return false;
    }
    if t.ends_with('[') || t.ends_with('{') || t.ends_with('(') || t.ends_with(',') {
        return true;
    }
    if has_plain_assignment(t) {
        return true;
    }
    looks_like_object_key(t)
}

/// Detect a single `=` that is not part of `==`, `=>`, `<=`, `>=`, `!=`.
fn has_plain_assignment(code: &str) -> bool {
    let bytes = code.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'=' {
            continue;
        }
        let prev = i.checked_sub(1).map(|j| bytes[j]);
        let next = bytes.get(i + 1);
        let part_of_comparison = matches!(prev, Some(b'=') | Some(b'<') | Some(b'>') | Some(b'!'))
            || matches!(next, Some(b'=') | Some(b'>'));
        if !part_of_comparison {
            return true;
        }
    }
    false
}

/// `key: value` shapes inside object literals.
fn looks_like_object_key(code: &str) -> bool {
    let t = code.trim_start();
    let Some(colon) = t.find(':') else {
        return false;
    };
    let key = &t[..colon];
    !key.is_empty()
        && key.chars().all(|c| {
            c.is_alphanumeric() || c == '_' || c == '$' || c == '\'' || c == '"' || c == '`'
        })
}

/// Case-insensitive lexicographic sortedness check for a module list.
pub fn is_sorted_case_insensitive(names: &[String]) -> bool {
    names
        .windows(2)
        .all(|w| w[0].to_lowercase() <= w[1].to_lowercase())
}
