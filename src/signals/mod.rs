//! Signal extraction: raw style observations per file, and their
//! aggregation across a repository.
//!
//! A [`FileSignals`] record is produced once per successfully parsed file
//! and never mutated afterwards; [`AggregateSignals`] merges many of them
//! through an explicit, pure accumulation step. No global state is involved.

pub mod classify;
pub mod extract;

pub use extract::extract;

use serde::Serialize;
use std::collections::BTreeMap;

/// Per-file style observation counters.
///
/// One counter pair per binary style decision, plus a few single counters
/// and the indentation-width histogram. Counter semantics are defined by
/// the extractor; this type is just the record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileSignals {
    // Comment spacing: `// text` vs `//text`
    pub comment_spaced: u64,
    pub comment_unspaced: u64,

    // String literal quotes
    pub quote_double: u64,
    pub quote_single: u64,

    // Doc comments on multi-word-named top-level functions
    pub fn_documented: u64,
    pub fn_undocumented: u64,

    // Guard clauses: leading no-alternate conditional that returns/throws
    pub guard_used: u64,
    pub guard_bypassed: u64,

    // Single-line conditionals with vs without braces
    pub if_braced: u64,
    pub if_unbraced: u64,

    // Comparisons with exactly one literal operand
    pub yoda: u64,
    pub natural_comparison: u64,

    // Multiline ternaries: line-leading vs line-trailing `?`/`:`
    pub ternary_leading: u64,
    pub ternary_trailing: u64,

    // Case label column vs switch column
    pub case_indented: u64,
    pub case_aligned: u64,

    // Break column vs case label column
    pub break_indented: u64,
    pub break_aligned: u64,

    // Member-chain continuation column vs object column
    pub chain_aligned: u64,
    pub chain_indented: u64,

    // Multiline calls: first argument on the callee line or not
    pub call_compact: u64,
    pub call_expanded: u64,

    // Declaration-list commas: leading vs trailing
    pub comma_leading: u64,
    pub comma_trailing: u64,

    // Blank line before return/conditional inside larger blocks
    pub blank_before: u64,
    pub no_blank_before: u64,

    // Trailing inline comment alignment within groups
    pub trailing_aligned: u64,
    pub trailing_unaligned: u64,

    // Import/inclusion ordering votes, weighted by group size - 1
    pub imports_sorted: u64,
    pub imports_unsorted: u64,

    // Line-oriented text scan
    pub indent_space_lines: u64,
    pub indent_tab_lines: u64,
    pub blank_lines: u64,
    pub code_lines: u64,
    pub max_line_len: u64,

    /// Observed indentation width (in spaces) → number of lines.
    pub indent_widths: BTreeMap<u32, u64>,
}

impl FileSignals {
    /// Total member-chain observations in this file.
    pub fn chain_observations(&self) -> u64 {
        self.chain_aligned + self.chain_indented
    }
}

/// Repository-wide accumulation of [`FileSignals`].
///
/// Counters are element-wise sums; the largest observed line length is a
/// max; the width histogram is merged element-wise. Member-chain
/// indentation additionally gets one file-level majority vote per file with
/// at least two comparable chain observations, so a single chain-heavy file
/// cannot dominate the corpus-wide signal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateSignals {
    pub totals: FileSignals,
    pub files: u64,
    pub chain_votes_aligned: u64,
    pub chain_votes_indented: u64,
}

impl AggregateSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file's signals into the aggregate.
    pub fn merge(&mut self, file: &FileSignals) {
        let t = &mut self.totals;

        t.comment_spaced += file.comment_spaced;
        t.comment_unspaced += file.comment_unspaced;
        t.quote_double += file.quote_double;
        t.quote_single += file.quote_single;
        t.fn_documented += file.fn_documented;
        t.fn_undocumented += file.fn_undocumented;
        t.guard_used += file.guard_used;
        t.guard_bypassed += file.guard_bypassed;
        t.if_braced += file.if_braced;
        t.if_unbraced += file.if_unbraced;
        t.yoda += file.yoda;
        t.natural_comparison += file.natural_comparison;
        t.ternary_leading += file.ternary_leading;
        t.ternary_trailing += file.ternary_trailing;
        t.case_indented += file.case_indented;
        t.case_aligned += file.case_aligned;
        t.break_indented += file.break_indented;
        t.break_aligned += file.break_aligned;
        t.chain_aligned += file.chain_aligned;
        t.chain_indented += file.chain_indented;
        t.call_compact += file.call_compact;
        t.call_expanded += file.call_expanded;
        t.comma_leading += file.comma_leading;
        t.comma_trailing += file.comma_trailing;
        t.blank_before += file.blank_before;
        t.no_blank_before += file.no_blank_before;
        t.trailing_aligned += file.trailing_aligned;
        t.trailing_unaligned += file.trailing_unaligned;
        t.imports_sorted += file.imports_sorted;
        t.imports_unsorted += file.imports_unsorted;
        t.indent_space_lines += file.indent_space_lines;
        t.indent_tab_lines += file.indent_tab_lines;
        t.blank_lines += file.blank_lines;
        t.code_lines += file.code_lines;
        t.max_line_len = t.max_line_len.max(file.max_line_len);

        for (width, count) in &file.indent_widths {
            *t.indent_widths.entry(*width).or_insert(0) += count;
        }

        if file.chain_observations() >= 2 {
            // Majority vote; a tie produces no vote.
            if file.chain_aligned > file.chain_indented {
                self.chain_votes_aligned += 1;
            } else if file.chain_indented > file.chain_aligned {
                self.chain_votes_indented += 1;
            }
        }

        self.files += 1;
    }

    /// Total file-level chain votes cast.
    pub fn chain_votes(&self) -> u64 {
        self.chain_votes_aligned + self.chain_votes_indented
    }
}
