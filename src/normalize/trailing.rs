//! Trailing inline comment alignment.
//!
//! Groups of consecutive alignment-eligible trailing comments are rewritten
//! either to a single shared column (the longest left-hand text plus two
//! spaces) or to exactly one separating space. A pre-pass first reattaches
//! comments that a prior formatting step detached onto their own line, by
//! matching the normalized left-hand code context plus the exact comment
//! text against entries recorded from the reference source.

use crate::edit::{apply_replacements, Replacement};
use crate::normalize::{collect_kind, run_to_fixpoint, with_clean_parse};
use crate::parse::{LineIndex, ParsedSource, SourceLang};
use crate::signals::classify;
use crate::validate;
use std::collections::HashMap;

pub fn apply(current: &str, reference: Option<&str>, aligned: bool, lang: SourceLang) -> String {
    let text = match reference {
        Some(reference) => reattach_pass(current, reference, lang),
        None => current.to_string(),
    };
    run_to_fixpoint(&text, lang, |parsed| compute_alignment(parsed, aligned))
}

// ---------------------------------------------------------------------------
// Alignment pass

struct Candidate {
    row: usize,
    indent: String,
    /// Length of the line's code prefix with trailing whitespace removed;
    /// this is also the column the gap starts at.
    code_len: usize,
    code_end: usize,
    comment_start: usize,
}

fn compute_alignment(parsed: &ParsedSource<'_>, aligned: bool) -> Vec<Replacement> {
    let source = parsed.source;
    let lines = LineIndex::new(source);
    let candidates = collect_candidates(parsed, &lines);
    let mut replacements = Vec::new();

    let mut group: Vec<&Candidate> = Vec::new();
    for cand in &candidates {
        let extends_group = match group.last() {
            Some(prev) => {
                let row_gap = cand.row.saturating_sub(prev.row);
                let blank_between = (prev.row + 1..cand.row).any(|r| lines.is_blank(source, r));
                cand.indent == prev.indent && (1..=3).contains(&row_gap) && !blank_between
            }
            None => true,
        };
        if !extends_group {
            rewrite_group(&group, source, aligned, &mut replacements);
            group.clear();
        }
        group.push(cand);
    }
    rewrite_group(&group, source, aligned, &mut replacements);

    replacements
}

fn collect_candidates(parsed: &ParsedSource<'_>, lines: &LineIndex) -> Vec<Candidate> {
    let source = parsed.source;
    let mut candidates = Vec::new();

    for comment in collect_kind(parsed.root_node(), "comment") {
        let Some(text) = source.get(comment.byte_range()) else {
            continue;
        };
        if !text.starts_with("//") {
            continue;
        }
        let row = comment.start_position().row;
        let Some(line_start) = lines.line_start(row) else {
            continue;
        };
        let Some(code) = source.get(line_start..comment.start_byte()) else {
            continue;
        };
        if code.trim().is_empty() || !classify::alignment_worthy(code) {
            continue;
        }

        let code_len = code.trim_end().len();
        candidates.push(Candidate {
            row,
            indent: lines.indent_text(source, row).to_string(),
            code_len,
            code_end: line_start + code_len,
            comment_start: comment.start_byte(),
        });
    }

    candidates
}

fn rewrite_group(
    group: &[&Candidate],
    source: &str,
    aligned: bool,
    replacements: &mut Vec<Replacement>,
) {
    if group.len() < 2 {
        return;
    }

    let target_col = group.iter().map(|c| c.code_len).max().unwrap_or(0) + 2;
    for cand in group {
        let desired = if aligned {
            " ".repeat(target_col - cand.code_len)
        } else {
            " ".to_string()
        };
        let current_gap = source.get(cand.code_end..cand.comment_start).unwrap_or("");
        if current_gap != desired {
            replacements.push(Replacement::new(cand.code_end, cand.comment_start, desired));
        }
    }
}

// ---------------------------------------------------------------------------
// Reattachment pre-pass

/// Move a comment that sits alone on its own line back onto the previous
/// line, when the reference recorded the same comment trailing the same
/// (whitespace-normalized) code.
fn reattach_pass(current: &str, reference: &str, lang: SourceLang) -> String {
    let mut recorded: HashMap<(String, String), usize> = HashMap::new();
    with_clean_parse(reference, lang, |ref_parsed| {
        let source = ref_parsed.source;
        let lines = LineIndex::new(source);
        for comment in collect_kind(ref_parsed.root_node(), "comment") {
            let Some(text) = source.get(comment.byte_range()) else {
                continue;
            };
            if !text.starts_with("//") {
                continue;
            }
            let row = comment.start_position().row;
            let Some(line_start) = lines.line_start(row) else {
                continue;
            };
            let Some(code) = source.get(line_start..comment.start_byte()) else {
                continue;
            };
            if code.trim().is_empty() {
                continue;
            }
            let key = (normalize_code(code), text.to_string());
            *recorded.entry(key).or_insert(0) += 1;
        }
    });
    if recorded.is_empty() {
        return current.to_string();
    }

    let replacements = with_clean_parse(current, lang, |parsed| {
        let source = parsed.source;
        let lines = LineIndex::new(source);
        let comments = collect_kind(parsed.root_node(), "comment");
        let comment_rows: std::collections::HashSet<usize> = comments
            .iter()
            .map(|c| c.start_position().row)
            .collect();
        let mut replacements = Vec::new();

        for comment in &comments {
            let Some(text) = source.get(comment.byte_range()) else {
                continue;
            };
            if !text.starts_with("//") {
                continue;
            }
            let row = comment.start_position().row;
            if row == 0 {
                continue;
            }
            let Some(line_start) = lines.line_start(row) else {
                continue;
            };
            let Some(before) = source.get(line_start..comment.start_byte()) else {
                continue;
            };
            // Detached: the comment is alone on its line.
            if !before.trim().is_empty() {
                continue;
            }
            let prev_row = row - 1;
            if comment_rows.contains(&prev_row) {
                continue;
            }
            let Some(prev_line) = lines.line_text(source, prev_row) else {
                continue;
            };
            let prev_code = prev_line.trim_end();
            if prev_code.is_empty() {
                continue;
            }

            let key = (normalize_code(prev_code), text.to_string());
            let Some(count) = recorded.get_mut(&key) else {
                continue;
            };
            if *count == 0 {
                continue;
            }
            *count -= 1;

            let prev_start = lines.line_start(prev_row).unwrap_or(line_start);
            replacements.push(Replacement::new(
                prev_start + prev_code.len(),
                comment.end_byte(),
                format!(" {text}"),
            ));
        }
        replacements
    })
    .unwrap_or_default();

    if replacements.is_empty() {
        return current.to_string();
    }
    let rewritten = apply_replacements(current, replacements);
    if rewritten != current && !validate::edit_is_clean(current, &rewritten, lang) {
        return current.to_string();
    }
    rewritten
}

fn normalize_code(code: &str) -> String {
    code.split_whitespace().collect::<Vec<_>>().join(" ")
}
