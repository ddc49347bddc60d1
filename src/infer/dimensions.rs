//! The closed set of style dimensions.
//!
//! Every dimension name, its enumerated valid values, its auto-fix safety,
//! and its threshold tier live in one exhaustively-matched enum. The
//! augmentation validator and the normalizer dispatch both consume this
//! table; adding a dimension without updating them is a compile error.

use crate::infer::{RuleValue, ThresholdTier, Thresholds};

/// Every style dimension the profiler knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    CommentSpacing,
    QuoteStyle,
    DocComments,
    GuardClauses,
    SingleLineIfBraces,
    YodaConditions,
    TernaryPlacement,
    SwitchCaseIndent,
    SwitchBreakIndent,
    ChainIndent,
    CallCompactness,
    DeclarationCommas,
    BlankBeforeReturn,
    TrailingCommentAlignment,
    ImportOrder,
    IndentStyle,
    IndentWidth,
    LineWidth,
    BlankLineDensity,
}

/// The valid values for a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSet {
    Keywords(&'static [&'static str]),
    PositiveNumber,
}

impl Dimension {
    pub fn all() -> &'static [Dimension] {
        use Dimension::*;
        &[
            CommentSpacing,
            QuoteStyle,
            DocComments,
            GuardClauses,
            SingleLineIfBraces,
            YodaConditions,
            TernaryPlacement,
            SwitchCaseIndent,
            SwitchBreakIndent,
            ChainIndent,
            CallCompactness,
            DeclarationCommas,
            BlankBeforeReturn,
            TrailingCommentAlignment,
            ImportOrder,
            IndentStyle,
            IndentWidth,
            LineWidth,
            BlankLineDensity,
        ]
    }

    /// Stable document key for this dimension.
    pub fn name(self) -> &'static str {
        match self {
            Dimension::CommentSpacing => "comment-spacing",
            Dimension::QuoteStyle => "quote-style",
            Dimension::DocComments => "doc-comments",
            Dimension::GuardClauses => "guard-clauses",
            Dimension::SingleLineIfBraces => "single-line-if-braces",
            Dimension::YodaConditions => "yoda-conditions",
            Dimension::TernaryPlacement => "ternary-placement",
            Dimension::SwitchCaseIndent => "switch-case-indent",
            Dimension::SwitchBreakIndent => "switch-break-indent",
            Dimension::ChainIndent => "chain-indent",
            Dimension::CallCompactness => "call-compactness",
            Dimension::DeclarationCommas => "declaration-commas",
            Dimension::BlankBeforeReturn => "blank-before-return",
            Dimension::TrailingCommentAlignment => "trailing-comment-alignment",
            Dimension::ImportOrder => "import-order",
            Dimension::IndentStyle => "indent-style",
            Dimension::IndentWidth => "indent-width",
            Dimension::LineWidth => "line-width",
            Dimension::BlankLineDensity => "blank-line-density",
        }
    }

    /// Reverse lookup; unknown names yield None.
    pub fn from_name(name: &str) -> Option<Self> {
        Dimension::all().iter().copied().find(|d| d.name() == name)
    }

    /// Short human description for reporting.
    pub fn description(self) -> &'static str {
        match self {
            Dimension::CommentSpacing => "space after the line-comment marker",
            Dimension::QuoteStyle => "double vs single string quotes",
            Dimension::DocComments => "doc comments on multi-word top-level functions",
            Dimension::GuardClauses => "early-return guard clauses at function entry",
            Dimension::SingleLineIfBraces => "braces around single-line conditionals",
            Dimension::YodaConditions => "literal operand placed left of comparisons",
            Dimension::TernaryPlacement => "line-leading vs trailing ?/: in multiline ternaries",
            Dimension::SwitchCaseIndent => "case labels indented relative to switch",
            Dimension::SwitchBreakIndent => "break indented relative to its case label",
            Dimension::ChainIndent => "member-chain continuation alignment",
            Dimension::CallCompactness => "first argument on the callee line in multiline calls",
            Dimension::DeclarationCommas => "leading vs trailing commas in declaration lists",
            Dimension::BlankBeforeReturn => "blank line before return/conditional",
            Dimension::TrailingCommentAlignment => "column alignment of trailing comments",
            Dimension::ImportOrder => "lexicographic ordering of import groups",
            Dimension::IndentStyle => "spaces vs tabs for indentation",
            Dimension::IndentWidth => "indentation unit width",
            Dimension::LineWidth => "maximum line width",
            Dimension::BlankLineDensity => "blank-line density between statements",
        }
    }

    /// The enumerated valid values for this dimension.
    pub fn valid_values(self) -> ValueSet {
        match self {
            Dimension::CommentSpacing => ValueSet::Keywords(&["always", "never"]),
            Dimension::QuoteStyle => ValueSet::Keywords(&["double", "single"]),
            Dimension::DocComments => ValueSet::Keywords(&["required", "omitted"]),
            Dimension::GuardClauses => ValueSet::Keywords(&["prefer", "avoid"]),
            Dimension::SingleLineIfBraces => ValueSet::Keywords(&["require", "omit"]),
            Dimension::YodaConditions => ValueSet::Keywords(&["always", "never"]),
            Dimension::TernaryPlacement => ValueSet::Keywords(&["leading", "trailing"]),
            Dimension::SwitchCaseIndent => ValueSet::Keywords(&["indented", "aligned"]),
            Dimension::SwitchBreakIndent => ValueSet::Keywords(&["indent", "match-case"]),
            Dimension::ChainIndent => ValueSet::Keywords(&["aligned", "indented"]),
            Dimension::CallCompactness => ValueSet::Keywords(&["compact", "expanded"]),
            Dimension::DeclarationCommas => ValueSet::Keywords(&["leading", "trailing"]),
            Dimension::BlankBeforeReturn => ValueSet::Keywords(&["always", "never"]),
            Dimension::TrailingCommentAlignment => {
                ValueSet::Keywords(&["aligned", "single-space"])
            }
            Dimension::ImportOrder => ValueSet::Keywords(&["alphabetical", "unordered"]),
            Dimension::IndentStyle => ValueSet::Keywords(&["space", "tab"]),
            Dimension::IndentWidth => ValueSet::PositiveNumber,
            Dimension::LineWidth => ValueSet::PositiveNumber,
            Dimension::BlankLineDensity => ValueSet::Keywords(&["compact", "spacious"]),
        }
    }

    /// Whether a given enforced value can be rewritten automatically by one
    /// of the normalizers. Values without a rewriting pass stay config-only.
    pub fn auto_fix_safe(self, value: &RuleValue) -> bool {
        match self {
            Dimension::SingleLineIfBraces => value.as_keyword() == Some("omit"),
            Dimension::CallCompactness => value.as_keyword() == Some("compact"),
            Dimension::TernaryPlacement
            | Dimension::SwitchBreakIndent
            | Dimension::ChainIndent
            | Dimension::DeclarationCommas
            | Dimension::TrailingCommentAlignment => true,
            _ => false,
        }
    }

    /// Validate an externally suggested value against the dimension's
    /// valid set.
    pub fn accepts(self, value: &RuleValue) -> bool {
        match (self.valid_values(), value) {
            (ValueSet::Keywords(keywords), RuleValue::Keyword(k)) => {
                keywords.contains(&k.as_str())
            }
            (ValueSet::PositiveNumber, RuleValue::Number(n)) => *n > 0,
            _ => false,
        }
    }

    /// The evidence tier applied to this dimension. Comment framing, inline
    /// comment alignment, and multiline-ternary placement have naturally low
    /// observation counts and run on the reduced tiers.
    pub fn tier(self, thresholds: &Thresholds) -> ThresholdTier {
        match self {
            Dimension::CommentSpacing | Dimension::DocComments => thresholds.sparse(),
            Dimension::TrailingCommentAlignment | Dimension::TernaryPlacement => {
                thresholds.ultra_sparse()
            }
            _ => thresholds.full(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for dim in Dimension::all() {
            assert_eq!(Dimension::from_name(dim.name()), Some(*dim));
        }
        assert_eq!(Dimension::from_name("no-such-dimension"), None);
    }

    #[test]
    fn value_validation() {
        assert!(Dimension::QuoteStyle.accepts(&RuleValue::keyword("double")));
        assert!(!Dimension::QuoteStyle.accepts(&RuleValue::keyword("backtick")));
        assert!(!Dimension::QuoteStyle.accepts(&RuleValue::Number(2)));
        assert!(Dimension::IndentWidth.accepts(&RuleValue::Number(4)));
        assert!(!Dimension::IndentWidth.accepts(&RuleValue::Number(0)));
        assert!(!Dimension::IndentWidth.accepts(&RuleValue::keyword("4")));
    }

    #[test]
    fn auto_fix_safety_is_value_dependent() {
        assert!(Dimension::SingleLineIfBraces.auto_fix_safe(&RuleValue::keyword("omit")));
        assert!(!Dimension::SingleLineIfBraces.auto_fix_safe(&RuleValue::keyword("require")));
        assert!(Dimension::ChainIndent.auto_fix_safe(&RuleValue::keyword("aligned")));
        assert!(!Dimension::LineWidth.auto_fix_safe(&RuleValue::Number(100)));
    }

    #[test]
    fn sparse_tiers_cover_low_evidence_dimensions() {
        let t = Thresholds {
            min_evidence: 10,
            min_confidence: 0.75,
        };
        assert_eq!(Dimension::CommentSpacing.tier(&t).min_evidence, 3);
        assert_eq!(Dimension::TernaryPlacement.tier(&t).min_evidence, 2);
        assert_eq!(Dimension::QuoteStyle.tier(&t).min_evidence, 10);
    }
}
