//! Optional external augmentation of an inferred profile.
//!
//! A collaborator (typically a slower, deeper analysis) may submit value
//! suggestions keyed by dimension name. Suggestions only ever strengthen a
//! profile: they replace a rule when the current rule is undetermined and
//! the suggestion clears the dimension's thresholds, or when both are
//! enforced and the suggestion is meaningfully more confident. Everything
//! else is rejected silently.

use crate::infer::dimensions::Dimension;
use crate::infer::{Provenance, RuleStatus, RuleValue, Thresholds};
use crate::profile::StyleProfile;
use serde::Deserialize;
use tracing::debug;

/// Margin a suggestion's confidence must exceed the current rule's by.
const CONFIDENCE_MARGIN: f64 = 0.05;

/// One externally suggested rule value.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSuggestion {
    pub dimension: String,
    pub value: RuleValue,
    pub confidence: f64,
    pub evidence_count: u64,
}

/// Apply a batch of suggestions to the profile in order.
///
/// Returns the number of rules replaced. Unknown dimension names, values
/// outside the dimension's valid set, and non-finite or negative confidences
/// are ignored.
pub fn apply_suggestions(
    profile: &mut StyleProfile,
    suggestions: &[RuleSuggestion],
    thresholds: &Thresholds,
) -> usize {
    let mut replaced = 0;
    for suggestion in suggestions {
        if apply_one(profile, suggestion, thresholds) {
            replaced += 1;
        }
    }
    replaced
}

fn apply_one(
    profile: &mut StyleProfile,
    suggestion: &RuleSuggestion,
    thresholds: &Thresholds,
) -> bool {
    let Some(dim) = Dimension::from_name(&suggestion.dimension) else {
        debug!(dimension = %suggestion.dimension, "ignoring unknown dimension");
        return false;
    };
    if !suggestion.confidence.is_finite() || suggestion.confidence < 0.0 {
        return false;
    }
    if !dim.accepts(&suggestion.value) {
        debug!(dimension = %suggestion.dimension, "rejecting out-of-set value");
        return false;
    }

    let tier = dim.tier(thresholds);
    let suggestion_enforced = suggestion.evidence_count >= tier.min_evidence
        && suggestion.confidence >= tier.min_confidence;

    let Some(current) = profile.rule_mut(dim) else {
        return false;
    };

    let replace = match current.status {
        RuleStatus::Undetermined => suggestion_enforced,
        RuleStatus::Enforced => {
            suggestion_enforced && suggestion.confidence > current.confidence + CONFIDENCE_MARGIN
        }
    };
    if !replace {
        return false;
    }

    current.value = Some(suggestion.value.clone());
    current.status = RuleStatus::Enforced;
    current.confidence = suggestion.confidence.min(1.0);
    current.evidence_count = suggestion.evidence_count;
    current.provenance = Provenance::ExternallyAugmented;
    current.auto_fix_safe = dim.auto_fix_safe(&suggestion.value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::InferredRule;

    fn profile_with_undetermined() -> StyleProfile {
        let mut profile = StyleProfile::new(1);
        for dim in Dimension::all() {
            profile.insert(*dim, InferredRule::undetermined());
        }
        profile
    }

    fn suggestion(dimension: &str, value: RuleValue, confidence: f64) -> RuleSuggestion {
        RuleSuggestion {
            dimension: dimension.to_string(),
            value,
            confidence,
            evidence_count: 20,
        }
    }

    #[test]
    fn suggestion_fills_undetermined_rule() {
        let mut profile = profile_with_undetermined();
        let n = apply_suggestions(
            &mut profile,
            &[suggestion("quote-style", RuleValue::keyword("single"), 0.9)],
            &Thresholds::default(),
        );
        assert_eq!(n, 1);

        let rule = profile.rule(Dimension::QuoteStyle).unwrap();
        assert_eq!(rule.value, Some(RuleValue::keyword("single")));
        assert_eq!(rule.provenance, Provenance::ExternallyAugmented);
    }

    #[test]
    fn weak_suggestion_does_not_fill() {
        let mut profile = profile_with_undetermined();
        let n = apply_suggestions(
            &mut profile,
            &[suggestion("quote-style", RuleValue::keyword("single"), 0.4)],
            &Thresholds::default(),
        );
        assert_eq!(n, 0);
        assert!(profile.rule(Dimension::QuoteStyle).unwrap().value.is_none());
    }

    #[test]
    fn stronger_suggestion_overrides_enforced_rule() {
        let mut profile = profile_with_undetermined();
        apply_suggestions(
            &mut profile,
            &[suggestion("quote-style", RuleValue::keyword("double"), 0.80)],
            &Thresholds::default(),
        );

        // Within the 0.05 margin: no change.
        let n = apply_suggestions(
            &mut profile,
            &[suggestion("quote-style", RuleValue::keyword("single"), 0.84)],
            &Thresholds::default(),
        );
        assert_eq!(n, 0);
        assert_eq!(
            profile.enforced_keyword(Dimension::QuoteStyle),
            Some("double")
        );

        // Beyond the margin: replaced.
        let n = apply_suggestions(
            &mut profile,
            &[suggestion("quote-style", RuleValue::keyword("single"), 0.95)],
            &Thresholds::default(),
        );
        assert_eq!(n, 1);
        assert_eq!(
            profile.enforced_keyword(Dimension::QuoteStyle),
            Some("single")
        );
    }

    #[test]
    fn invalid_values_and_unknown_dimensions_rejected() {
        let mut profile = profile_with_undetermined();
        let rejected = [
            suggestion("quote-style", RuleValue::keyword("backtick"), 0.9),
            suggestion("indent-width", RuleValue::Number(0), 0.9),
            suggestion("no-such-dimension", RuleValue::keyword("x"), 0.9),
            suggestion("quote-style", RuleValue::keyword("double"), f64::NAN),
        ];
        let n = apply_suggestions(&mut profile, &rejected, &Thresholds::default());
        assert_eq!(n, 0);
    }

    #[test]
    fn augmented_value_gets_fix_safety_from_dimension() {
        let mut profile = profile_with_undetermined();
        apply_suggestions(
            &mut profile,
            &[suggestion(
                "single-line-if-braces",
                RuleValue::keyword("omit"),
                0.9,
            )],
            &Thresholds::default(),
        );
        assert!(profile.rule(Dimension::SingleLineIfBraces).unwrap().auto_fix_safe);
    }
}
