//! Multiline ternary operator placement.
//!
//! Replays the `?`/`:` placement recorded in a reference version of the
//! file where a structurally matching ternary exists; every other multiline
//! ternary falls back to the enforced canonical placement. Only the
//! whitespace-and-operator gaps between the three sub-expressions move;
//! the sub-expressions themselves are never touched.

use crate::edit::Replacement;
use crate::normalize::{collect_kind, run_to_fixpoint, with_clean_parse};
use crate::parse::{ParsedSource, SourceLang};
use crate::signature::{signature_of, SignatureQueue};
use tree_sitter::Node;

/// Layout fact recorded per reference ternary: were its break-adjacent
/// operators line-leading?
#[derive(Debug, Clone, Copy)]
struct TernaryLayout {
    leading: bool,
}

pub fn apply(current: &str, reference: Option<&str>, leading_rule: bool, lang: SourceLang) -> String {
    run_to_fixpoint(current, lang, |parsed| {
        let mut observations = SignatureQueue::new();
        if let Some(reference) = reference {
            with_clean_parse(reference, lang, |ref_parsed| {
                harvest(ref_parsed, &mut observations)
            });
        }
        compute(parsed, &mut observations, leading_rule)
    })
}

fn harvest(parsed: &ParsedSource<'_>, observations: &mut SignatureQueue<TernaryLayout>) {
    let source = parsed.source;
    for node in collect_kind(parsed.root_node(), "ternary_expression") {
        let Some((question, colon)) = operator_gaps(node, source) else {
            continue;
        };
        if node.start_position().row == node.end_position().row {
            continue;
        }
        let leading = gap_is_leading(question.text, '?') || gap_is_leading(colon.text, ':');
        observations.push(signature_of(node, source), TernaryLayout { leading });
    }
}

fn compute(
    parsed: &ParsedSource<'_>,
    observations: &mut SignatureQueue<TernaryLayout>,
    leading_rule: bool,
) -> Vec<Replacement> {
    let source = parsed.source;
    let mut replacements = Vec::new();

    for node in collect_kind(parsed.root_node(), "ternary_expression") {
        if node.start_position().row == node.end_position().row {
            continue;
        }
        let Some((question, colon)) = operator_gaps(node, source) else {
            continue;
        };

        let target_leading = observations
            .pop(signature_of(node, source))
            .map(|layout| layout.leading)
            .unwrap_or(leading_rule);

        for gap in [question, colon] {
            if let Some(new_text) = rewrite_gap(gap.text, gap.op, target_leading) {
                replacements.push(Replacement::new(gap.start, gap.end, new_text));
            }
        }
    }

    replacements
}

struct Gap<'a> {
    start: usize,
    end: usize,
    op: char,
    text: &'a str,
}

/// The two operator gaps of a ternary, if both are clean: nothing but
/// whitespace and exactly one operator character (no interior comments).
fn operator_gaps<'a>(node: Node<'_>, source: &'a str) -> Option<(Gap<'a>, Gap<'a>)> {
    let condition = node.child_by_field_name("condition")?;
    let consequence = node.child_by_field_name("consequence")?;
    let alternative = node.child_by_field_name("alternative")?;

    let question = Gap {
        start: condition.end_byte(),
        end: consequence.start_byte(),
        op: '?',
        text: source.get(condition.end_byte()..consequence.start_byte())?,
    };
    let colon = Gap {
        start: consequence.end_byte(),
        end: alternative.start_byte(),
        op: ':',
        text: source.get(consequence.end_byte()..alternative.start_byte())?,
    };

    if !clean_gap(question.text, '?') || !clean_gap(colon.text, ':') {
        return None;
    }
    Some((question, colon))
}

fn clean_gap(gap: &str, op: char) -> bool {
    let mut count = 0;
    for c in gap.chars() {
        if c == op {
            count += 1;
        } else if !c.is_whitespace() {
            return false;
        }
    }
    count == 1
}

fn gap_is_leading(gap: &str, op: char) -> bool {
    gap.split(op).next().unwrap_or("").contains('\n')
}

/// Recompute one gap for the target placement. Gaps without a line break
/// keep their operator inline; the break itself is never added or removed,
/// only the operator moves across it.
fn rewrite_gap(gap: &str, op: char, leading: bool) -> Option<String> {
    if !gap.contains('\n') {
        return None;
    }
    let after_break = &gap[gap.rfind('\n')? + 1..];
    let indent: String = after_break
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();

    let new_text = if leading {
        format!("\n{indent}{op} ")
    } else {
        format!(" {op}\n{indent}")
    };
    (new_text != gap).then_some(new_text)
}
