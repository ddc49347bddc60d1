//! Style normalizers: rewriting formatted source to replay layout decisions.
//!
//! Every normalizer shares the same contract: best-effort, idempotent,
//! non-throwing. A rule that is undetermined, a source that fails to parse
//! cleanly, or a rewrite that would introduce a parse error all degrade to
//! returning the input unchanged. Replacements are minimal: operators,
//! separators, and whitespace move, while expression content is only ever
//! copied verbatim from the original text.

pub mod braces;
pub mod calls;
pub mod chains;
pub mod commas;
pub mod layout;
pub mod switch_breaks;
pub mod ternary;
pub mod trailing;

pub use layout::{render_column, IndentKind, IndentOptions};

use crate::infer::Dimension;
use crate::parse::{ParsedSource, SourceLang};
use crate::pool;
use crate::profile::StyleProfile;
use tree_sitter::Node;

/// Run every enforced, auto-fix-safe normalizer from `profile` over
/// `current`, threading each dimension's output into the next.
///
/// `reference` is a prior version of the same file, consulted only to
/// recover layout decisions a formatter may have discarded.
pub fn normalize_all(
    current: &str,
    reference: Option<&str>,
    profile: &StyleProfile,
    lang: SourceLang,
) -> String {
    let indent = IndentOptions::from_profile(profile);
    let mut text = current.to_string();

    if fix_safe_keyword(profile, Dimension::SingleLineIfBraces) == Some("omit") {
        text = braces::apply(&text, lang);
    }
    if fix_safe_keyword(profile, Dimension::CallCompactness) == Some("compact") {
        text = calls::apply(&text, lang);
    }
    if let Some(style) = fix_safe_keyword(profile, Dimension::ChainIndent) {
        let style = chains::ChainStyle::from_keyword(style);
        text = chains::apply(&text, style, indent, lang);
    }
    if let Some(style) = fix_safe_keyword(profile, Dimension::TernaryPlacement) {
        let leading = style == "leading";
        text = ternary::apply(&text, reference, leading, lang);
    }
    if let Some(style) = fix_safe_keyword(profile, Dimension::SwitchBreakIndent) {
        let indented = style == "indent";
        text = switch_breaks::apply(&text, indented, indent, lang);
    }
    if let Some(style) = fix_safe_keyword(profile, Dimension::DeclarationCommas) {
        let leading = style == "leading";
        text = commas::apply(&text, leading, lang);
    }
    if let Some(style) = fix_safe_keyword(profile, Dimension::TrailingCommentAlignment) {
        let aligned = style == "aligned";
        text = trailing::apply(&text, reference, aligned, lang);
    }

    text
}

fn fix_safe_keyword(profile: &StyleProfile, dim: Dimension) -> Option<&str> {
    let rule = profile.rule(dim)?;
    if !rule.auto_fix_safe {
        return None;
    }
    profile.enforced_keyword(dim)
}

/// Passes a normalizer may take to reach a stable rewrite. Nested
/// constructs can need a second pass; anything beyond a handful means the
/// computation is oscillating and gets cut off as-is.
const MAX_PASSES: usize = 8;

/// Drive one normalizer's replacement computation to a fixpoint.
///
/// Each pass parses the current text, computes a replacement set, applies
/// it in one descending-offset sweep, and keeps the result only if the
/// rewrite introduces no parse errors. The fixpoint guarantees idempotence:
/// running the normalizer on its own output is a no-op.
pub(crate) fn run_to_fixpoint(
    current: &str,
    lang: SourceLang,
    compute: impl Fn(&ParsedSource<'_>) -> Vec<crate::edit::Replacement>,
) -> String {
    let mut text = current.to_string();
    for _ in 0..MAX_PASSES {
        let Some(replacements) = with_clean_parse(&text, lang, &compute) else {
            return text;
        };
        if replacements.is_empty() {
            return text;
        }
        let next = crate::edit::apply_replacements(&text, replacements);
        if next == text {
            return text;
        }
        if !crate::validate::edit_is_clean(&text, &next, lang) {
            return text;
        }
        text = next;
    }
    text
}

/// Parse `source` and hand a clean tree to `f`. Returns None when the
/// source does not parse, or parses with ERROR nodes. Normalizers never
/// touch files they cannot fully understand.
pub(crate) fn with_clean_parse<R>(
    source: &str,
    lang: SourceLang,
    f: impl FnOnce(&ParsedSource<'_>) -> R,
) -> Option<R> {
    pool::with_parser(lang, |parser| {
        let parsed = parser.parse_with_source(source).ok()?;
        if parsed.has_errors() {
            return None;
        }
        Some(f(&parsed))
    })
    .ok()
    .flatten()
}

/// Preorder collection of all nodes with the given kind.
pub(crate) fn collect_kind<'t>(root: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    collect_kind_into(root, kind, &mut out);
    out
}

fn collect_kind_into<'t>(node: Node<'t>, kind: &str, out: &mut Vec<Node<'t>>) {
    if node.kind() == kind {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_kind_into(child, kind, out);
    }
}

/// True if any descendant (or the node itself) is a comment.
pub(crate) fn contains_comment(node: Node<'_>) -> bool {
    if node.kind() == "comment" {
        return true;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if contains_comment(child) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::{InferredRule, Provenance, RuleStatus, RuleValue};

    fn enforced_fixable(value: &str) -> InferredRule<RuleValue> {
        InferredRule {
            value: Some(RuleValue::keyword(value)),
            status: RuleStatus::Enforced,
            confidence: 1.0,
            evidence_count: 10,
            provenance: Provenance::Deterministic,
            auto_fix_safe: true,
        }
    }

    #[test]
    fn normalize_all_without_enforced_rules_is_identity() {
        let profile = StyleProfile::new(0);
        let src = "if (a) {\n  f();\n}\n";
        assert_eq!(
            normalize_all(src, None, &profile, SourceLang::JavaScript),
            src
        );
    }

    #[test]
    fn normalize_all_skips_unsafe_rules() {
        let mut profile = StyleProfile::new(1);
        let mut rule = enforced_fixable("require");
        rule.auto_fix_safe = false;
        profile.insert(Dimension::SingleLineIfBraces, rule);

        let src = "if (a) doThing();\n";
        assert_eq!(
            normalize_all(src, None, &profile, SourceLang::JavaScript),
            src
        );
    }

    #[test]
    fn normalize_all_applies_safe_rules() {
        let mut profile = StyleProfile::new(1);
        profile.insert(Dimension::SingleLineIfBraces, enforced_fixable("omit"));

        let src = "if (a)\n  doThing();\n";
        let out = normalize_all(src, None, &profile, SourceLang::JavaScript);
        assert_eq!(out, "if (a) doThing();\n");
    }

    #[test]
    fn unparsable_source_is_returned_unchanged() {
        let mut profile = StyleProfile::new(1);
        profile.insert(Dimension::SingleLineIfBraces, enforced_fixable("omit"));

        let src = "if (a\n  doThing();\n";
        assert_eq!(
            normalize_all(src, None, &profile, SourceLang::JavaScript),
            src
        );
    }
}
