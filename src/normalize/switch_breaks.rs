//! Switch break indentation.
//!
//! Rewrites only the leading whitespace of `break` lines. The target column
//! is the case label's column for "match-case" style, or the case label's
//! column plus one indent step for "indent" style.

use crate::edit::Replacement;
use crate::normalize::layout::{render_column, IndentOptions};
use crate::normalize::{collect_kind, run_to_fixpoint};
use crate::parse::{LineIndex, ParsedSource, SourceLang};
use tree_sitter::Node;

pub fn apply(current: &str, indented: bool, indent: IndentOptions, lang: SourceLang) -> String {
    run_to_fixpoint(current, lang, |parsed| compute(parsed, indented, indent))
}

fn compute(parsed: &ParsedSource<'_>, indented: bool, indent: IndentOptions) -> Vec<Replacement> {
    let source = parsed.source;
    let lines = LineIndex::new(source);
    let mut replacements = Vec::new();

    let mut cases = collect_kind(parsed.root_node(), "switch_case");
    cases.extend(collect_kind(parsed.root_node(), "switch_default"));

    for case in cases {
        let case_col = case.start_position().column as u32;
        let target_col = if indented {
            case_col + indent.width
        } else {
            case_col
        };

        let mut cursor = case.walk();
        for child in case.named_children(&mut cursor) {
            if child.kind() != "break_statement" {
                continue;
            }
            if let Some(replacement) =
                plan_break(child, case, source, &lines, target_col, indent)
            {
                replacements.push(replacement);
            }
        }
    }

    replacements
}

fn plan_break(
    brk: Node<'_>,
    case: Node<'_>,
    source: &str,
    lines: &LineIndex,
    target_col: u32,
    indent: IndentOptions,
) -> Option<Replacement> {
    let row = brk.start_position().row;
    if row == case.start_position().row {
        return None;
    }
    let line_start = lines.line_start(row)?;
    let indent_text = lines.indent_text(source, row);
    // Only breaks that start their own line are rewritable.
    if line_start + indent_text.len() != brk.start_byte() {
        return None;
    }

    let rendered = render_column(target_col, indent);
    if indent_text == rendered {
        return None;
    }
    Some(Replacement::new(line_start, brk.start_byte(), rendered))
}
