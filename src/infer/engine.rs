//! The estimators that turn aggregated counters into rules.
//!
//! None of these functions can fail: absence of data yields an
//! undetermined rule with zero confidence.

use crate::infer::dimensions::Dimension;
use crate::infer::{InferredRule, Provenance, RuleStatus, RuleValue, ThresholdTier, Thresholds};
use crate::profile::StyleProfile;
use crate::signals::AggregateSignals;
use std::collections::BTreeMap;

/// Line-width candidates, ascending.
const LINE_WIDTH_CANDIDATES: &[u32] = &[80, 90, 100, 110, 120, 140, 160];

/// Binary rule: the larger counter wins (ties favor `yes_value`),
/// confidence is the winner's share, and enforcement requires both floors.
pub fn binary_rule(
    yes: u64,
    no: u64,
    yes_value: &'static str,
    no_value: &'static str,
    tier: ThresholdTier,
) -> InferredRule<&'static str> {
    let total = yes + no;
    if total == 0 {
        return InferredRule::undetermined();
    }

    let (winner_count, winner_value) = if yes >= no {
        (yes, yes_value)
    } else {
        (no, no_value)
    };
    let confidence = winner_count as f64 / total as f64;
    let enforced = winner_count >= tier.min_evidence && confidence >= tier.min_confidence;

    InferredRule {
        value: enforced.then_some(winner_value),
        status: if enforced {
            RuleStatus::Enforced
        } else {
            RuleStatus::Undetermined
        },
        confidence,
        evidence_count: winner_count,
        provenance: Provenance::Deterministic,
        auto_fix_safe: false,
    }
}

/// Density rule for blank-line usage: compact when the observed ratio is at
/// most 0.15, spacious otherwise. Confidence decays with distance from the
/// style's target ratio (0.12 compact, 0.25 spacious), floored at 0.8.
pub fn density_rule(blank: u64, total: u64, tier: ThresholdTier) -> InferredRule<&'static str> {
    if total == 0 {
        return InferredRule::undetermined();
    }

    let ratio = blank as f64 / total as f64;
    let (value, target) = if ratio <= 0.15 {
        ("compact", 0.12)
    } else {
        ("spacious", 0.25)
    };
    let confidence = 1.0 - (ratio - target).abs().min(0.2);
    let enforced = total >= tier.min_evidence;

    InferredRule {
        value: enforced.then_some(value),
        status: if enforced {
            RuleStatus::Enforced
        } else {
            RuleStatus::Undetermined
        },
        confidence,
        evidence_count: total,
        provenance: Provenance::Deterministic,
        auto_fix_safe: false,
    }
}

/// Indent-unit estimator over the width histogram.
///
/// The GCD across all observed widths is used when it lands in [2, 8];
/// otherwise the candidate among {2, 4, 8} that evenly divides the most
/// lines wins, falling back to the smallest observed width when no candidate
/// divides anything. Confidence is the share of lines the chosen unit
/// divides evenly.
pub fn indent_unit(
    widths: &BTreeMap<u32, u64>,
    tier: ThresholdTier,
) -> InferredRule<u32> {
    if widths.is_empty() {
        return InferredRule::undetermined();
    }

    let total: u64 = widths.values().sum();
    let overall_gcd = widths.keys().copied().fold(0, gcd);

    let unit = if (2..=8).contains(&overall_gcd) {
        overall_gcd
    } else {
        let divisible = |candidate: u32| -> u64 {
            widths
                .iter()
                .filter(|(w, _)| *w % candidate == 0)
                .map(|(_, count)| count)
                .sum()
        };
        let best = [2u32, 4, 8]
            .into_iter()
            .max_by_key(|c| divisible(*c))
            .unwrap_or(2);
        if divisible(best) > 0 {
            best
        } else {
            // No candidate divides anything; smallest observed width.
            *widths.keys().next().unwrap_or(&2)
        }
    };

    let covered: u64 = widths
        .iter()
        .filter(|(w, _)| *w % unit == 0)
        .map(|(_, count)| count)
        .sum();
    let confidence = covered as f64 / total as f64;
    let enforced = total >= tier.min_evidence && confidence >= tier.min_confidence;

    InferredRule {
        value: enforced.then_some(unit),
        status: if enforced {
            RuleStatus::Enforced
        } else {
            RuleStatus::Undetermined
        },
        confidence,
        evidence_count: total,
        provenance: Provenance::Deterministic,
        auto_fix_safe: false,
    }
}

/// Line-width estimator: the smallest candidate at or above the clamped
/// observed maximum. Confidence is how closely the corpus actually
/// approaches the chosen width.
pub fn line_width(observed_max: u64, code_lines: u64, tier: ThresholdTier) -> InferredRule<u32> {
    if code_lines == 0 || observed_max == 0 {
        return InferredRule::undetermined();
    }

    let target = observed_max.clamp(80, 160) as u32;
    let chosen = LINE_WIDTH_CANDIDATES
        .iter()
        .copied()
        .find(|c| *c >= target)
        .unwrap_or(160);
    let confidence = (observed_max as f64 / chosen as f64).clamp(0.5, 1.0);
    let enforced = code_lines >= tier.min_evidence && confidence >= tier.min_confidence;

    InferredRule {
        value: enforced.then_some(chosen),
        status: if enforced {
            RuleStatus::Enforced
        } else {
            RuleStatus::Undetermined
        },
        confidence,
        evidence_count: code_lines,
        provenance: Provenance::Deterministic,
        auto_fix_safe: false,
    }
}

/// Member-chain indentation prefers file-level majority votes over raw
/// occurrence counts whenever at least one file produced a vote, using
/// relaxed thresholds. One chain-heavy file cannot dominate the corpus.
fn chain_rule(agg: &AggregateSignals, thresholds: &Thresholds) -> InferredRule<&'static str> {
    if agg.chain_votes() >= 1 {
        binary_rule(
            agg.chain_votes_aligned,
            agg.chain_votes_indented,
            "aligned",
            "indented",
            thresholds.sparse(),
        )
    } else {
        binary_rule(
            agg.totals.chain_aligned,
            agg.totals.chain_indented,
            "aligned",
            "indented",
            thresholds.full(),
        )
    }
}

/// Infer one rule per dimension from the aggregate.
pub fn infer_all(agg: &AggregateSignals, thresholds: &Thresholds) -> StyleProfile {
    let mut profile = StyleProfile::new(agg.files);
    let t = &agg.totals;

    for dim in Dimension::all() {
        let tier = dim.tier(thresholds);
        let rule: InferredRule<RuleValue> = match dim {
            Dimension::CommentSpacing => {
                binary_rule(t.comment_spaced, t.comment_unspaced, "always", "never", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::QuoteStyle => {
                binary_rule(t.quote_double, t.quote_single, "double", "single", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::DocComments => {
                binary_rule(t.fn_documented, t.fn_undocumented, "required", "omitted", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::GuardClauses => {
                binary_rule(t.guard_used, t.guard_bypassed, "prefer", "avoid", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::SingleLineIfBraces => {
                binary_rule(t.if_braced, t.if_unbraced, "require", "omit", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::YodaConditions => {
                binary_rule(t.yoda, t.natural_comparison, "always", "never", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::TernaryPlacement => {
                binary_rule(t.ternary_leading, t.ternary_trailing, "leading", "trailing", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::SwitchCaseIndent => {
                binary_rule(t.case_indented, t.case_aligned, "indented", "aligned", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::SwitchBreakIndent => {
                binary_rule(t.break_indented, t.break_aligned, "indent", "match-case", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::ChainIndent => chain_rule(agg, thresholds).map(RuleValue::keyword),
            Dimension::CallCompactness => {
                binary_rule(t.call_compact, t.call_expanded, "compact", "expanded", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::DeclarationCommas => {
                binary_rule(t.comma_leading, t.comma_trailing, "leading", "trailing", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::BlankBeforeReturn => {
                binary_rule(t.blank_before, t.no_blank_before, "always", "never", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::TrailingCommentAlignment => binary_rule(
                t.trailing_aligned,
                t.trailing_unaligned,
                "aligned",
                "single-space",
                tier,
            )
            .map(RuleValue::keyword),
            Dimension::ImportOrder => binary_rule(
                t.imports_sorted,
                t.imports_unsorted,
                "alphabetical",
                "unordered",
                tier,
            )
            .map(RuleValue::keyword),
            Dimension::IndentStyle => {
                binary_rule(t.indent_space_lines, t.indent_tab_lines, "space", "tab", tier)
                    .map(RuleValue::keyword)
            }
            Dimension::IndentWidth => indent_unit(&t.indent_widths, tier).map(RuleValue::Number),
            Dimension::LineWidth => {
                line_width(t.max_line_len, t.code_lines, tier).map(RuleValue::Number)
            }
            Dimension::BlankLineDensity => {
                density_rule(t.blank_lines, t.blank_lines + t.code_lines, tier)
                    .map(RuleValue::keyword)
            }
        };

        profile.insert(*dim, with_fix_safety(*dim, rule));
    }

    profile
}

fn with_fix_safety(dim: Dimension, mut rule: InferredRule<RuleValue>) -> InferredRule<RuleValue> {
    if let Some(value) = &rule.value {
        rule.auto_fix_safe = dim.auto_fix_safe(value);
    }
    rule
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{AggregateSignals, FileSignals};

    fn tier(min_evidence: u64, min_confidence: f64) -> ThresholdTier {
        ThresholdTier {
            min_evidence,
            min_confidence,
        }
    }

    #[test]
    fn binary_rule_zero_observations() {
        let rule = binary_rule(0, 0, "yes", "no", tier(1, 0.5));
        assert_eq!(rule.status, RuleStatus::Undetermined);
        assert_eq!(rule.confidence, 0.0);
        assert!(rule.value.is_none());
    }

    #[test]
    fn binary_rule_single_observation_enforces() {
        // One braced single-line conditional, none unbraced.
        let rule = binary_rule(1, 0, "require", "omit", tier(1, 0.5));
        assert_eq!(rule.status, RuleStatus::Enforced);
        assert_eq!(rule.value, Some("require"));
        assert_eq!(rule.confidence, 1.0);
    }

    #[test]
    fn binary_rule_quote_scenario() {
        // Three double-quoted literals, one single-quoted.
        let rule = binary_rule(3, 1, "double", "single", tier(2, 0.75));
        assert_eq!(rule.status, RuleStatus::Enforced);
        assert_eq!(rule.value, Some("double"));
        assert_eq!(rule.confidence, 0.75);
        assert_eq!(rule.evidence_count, 3);
    }

    #[test]
    fn binary_rule_tie_favors_yes() {
        let rule = binary_rule(4, 4, "yes", "no", tier(2, 0.4));
        assert_eq!(rule.value, Some("yes"));
        assert_eq!(rule.confidence, 0.5);
    }

    #[test]
    fn binary_rule_below_confidence_stays_undetermined() {
        let rule = binary_rule(5, 4, "yes", "no", tier(2, 0.75));
        assert_eq!(rule.status, RuleStatus::Undetermined);
        assert!(rule.value.is_none());
    }

    #[test]
    fn confidence_is_always_in_unit_interval() {
        for (yes, no) in [(0, 0), (1, 0), (0, 1), (7, 3), (1000, 1)] {
            let rule = binary_rule(yes, no, "a", "b", tier(1, 0.5));
            assert!((0.0..=1.0).contains(&rule.confidence));
        }
    }

    #[test]
    fn indent_unit_gcd_in_range() {
        // {4:5, 6:5} → GCD 2, in [2,8].
        let mut widths = BTreeMap::new();
        widths.insert(4, 5);
        widths.insert(6, 5);
        let rule = indent_unit(&widths, tier(1, 0.5));
        assert_eq!(rule.value, Some(2));
    }

    #[test]
    fn indent_unit_single_width() {
        let mut widths = BTreeMap::new();
        widths.insert(2, 10);
        let rule = indent_unit(&widths, tier(1, 0.5));
        assert_eq!(rule.value, Some(2));
        assert_eq!(rule.confidence, 1.0);
    }

    #[test]
    fn indent_unit_large_gcd_uses_divisibility_vote() {
        // GCD 12 is out of range; 4 divides everything.
        let mut widths = BTreeMap::new();
        widths.insert(12, 3);
        widths.insert(24, 2);
        let rule = indent_unit(&widths, tier(1, 0.5));
        assert_eq!(rule.value, Some(4));
    }

    #[test]
    fn indent_unit_fallback_to_smallest_width() {
        let mut widths = BTreeMap::new();
        widths.insert(1, 4);
        widths.insert(3, 4);
        // GCD 1, no candidate divides either width.
        let rule = indent_unit(&widths, tier(1, 0.0));
        assert_eq!(rule.evidence_count, 8);
        assert_eq!(rule.value, Some(1));
    }

    #[test]
    fn indent_unit_empty_histogram() {
        let rule = indent_unit(&BTreeMap::new(), tier(1, 0.5));
        assert_eq!(rule.status, RuleStatus::Undetermined);
    }

    #[test]
    fn line_width_picks_smallest_covering_candidate() {
        let rule = line_width(95, 100, tier(10, 0.5));
        assert_eq!(rule.value, Some(100));

        let rule = line_width(80, 100, tier(10, 0.5));
        assert_eq!(rule.value, Some(80));

        let rule = line_width(200, 100, tier(10, 0.5));
        assert_eq!(rule.value, Some(160));
        assert_eq!(rule.confidence, 1.0);
    }

    #[test]
    fn line_width_short_files_clamp_to_minimum_candidate() {
        let rule = line_width(40, 100, tier(10, 0.0));
        assert_eq!(rule.value, Some(80));
        assert_eq!(rule.confidence, 0.5);
    }

    #[test]
    fn density_rule_compact_and_spacious() {
        let rule = density_rule(10, 100, tier(10, 0.0));
        assert_eq!(rule.value, Some("compact"));
        assert!((rule.confidence - 0.98).abs() < 1e-9);

        let rule = density_rule(30, 100, tier(10, 0.0));
        assert_eq!(rule.value, Some("spacious"));
        assert!((rule.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn chain_rule_prefers_file_votes() {
        let mut agg = AggregateSignals::new();
        // One chain-heavy file voting aligned, two files voting indented.
        let mut heavy = FileSignals::default();
        heavy.chain_aligned = 40;
        agg.merge(&heavy);
        for _ in 0..2 {
            let mut f = FileSignals::default();
            f.chain_indented = 2;
            agg.merge(&f);
        }

        let thresholds = Thresholds {
            min_evidence: 3,
            min_confidence: 0.6,
        };
        let rule = chain_rule(&agg, &thresholds);
        // Votes: 1 aligned vs 2 indented. Raw counts would say aligned 40:4.
        assert_eq!(rule.value, Some("indented"));
    }

    #[test]
    fn infer_all_covers_every_dimension() {
        let agg = AggregateSignals::new();
        let profile = infer_all(&agg, &Thresholds::default());
        for dim in Dimension::all() {
            assert!(profile.rule(*dim).is_some(), "missing rule for {}", dim.name());
        }
    }
}
