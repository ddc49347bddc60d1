//! Member-chain continuation indentation.
//!
//! Every continuation line that starts with an access operator is moved to
//! the canonical column for the enforced style: the object's start column
//! for "aligned", one indent step beyond it for "indented". Only the
//! leading whitespace of the continuation line is rewritten.

use crate::edit::Replacement;
use crate::normalize::layout::{render_column, IndentOptions};
use crate::normalize::{collect_kind, run_to_fixpoint};
use crate::parse::{LineIndex, ParsedSource, SourceLang};
use std::collections::HashSet;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStyle {
    Aligned,
    Indented,
}

impl ChainStyle {
    pub fn from_keyword(keyword: &str) -> Self {
        if keyword == "indented" {
            ChainStyle::Indented
        } else {
            ChainStyle::Aligned
        }
    }
}

pub fn apply(current: &str, style: ChainStyle, indent: IndentOptions, lang: SourceLang) -> String {
    run_to_fixpoint(current, lang, |parsed| compute(parsed, style, indent))
}

fn compute(parsed: &ParsedSource<'_>, style: ChainStyle, indent: IndentOptions) -> Vec<Replacement> {
    let source = parsed.source;
    let lines = LineIndex::new(source);
    let mut replacements = Vec::new();
    let mut seen_rows: HashSet<usize> = HashSet::new();

    for member in collect_kind(parsed.root_node(), "member_expression") {
        let Some(object) = member.child_by_field_name("object") else {
            continue;
        };
        let Some(op) = access_operator(member) else {
            continue;
        };

        let op_row = op.start_position().row;
        if op_row <= object.end_position().row {
            continue;
        }
        let Some(line_start) = lines.line_start(op_row) else {
            continue;
        };
        let indent_text = lines.indent_text(source, op_row);
        if line_start + indent_text.len() != op.start_byte() {
            continue;
        }
        // One rewrite per continuation line; outer chain links win.
        if !seen_rows.insert(op_row) {
            continue;
        }

        let base_col = object.start_position().column as u32;
        let target_col = match style {
            ChainStyle::Aligned => base_col,
            ChainStyle::Indented => base_col + indent.width,
        };
        let rendered = render_column(target_col, indent);
        if indent_text != rendered {
            replacements.push(Replacement::new(line_start, op.start_byte(), rendered));
        }
    }

    replacements
}

fn access_operator<'t>(member: Node<'t>) -> Option<Node<'t>> {
    let mut cursor = member.walk();
    let op = member
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "." | "?." | "optional_chain"));
    op
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::layout::IndentKind;

    fn opts(width: u32) -> IndentOptions {
        IndentOptions {
            kind: IndentKind::Space,
            width,
        }
    }

    #[test]
    fn indented_style_moves_aligned_chain_one_step() {
        // Continuations at the object's column, rewritten to column + 2.
        let src = "promise\n.then(f)\n.catch(g);\n";
        let out = apply(src, ChainStyle::Indented, opts(2), SourceLang::JavaScript);
        assert_eq!(out, "promise\n  .then(f)\n  .catch(g);\n");
    }

    #[test]
    fn aligned_style_moves_indented_chain_to_object_column() {
        let src = "promise\n    .then(f)\n    .catch(g);\n";
        let out = apply(src, ChainStyle::Aligned, opts(2), SourceLang::JavaScript);
        assert_eq!(out, "promise\n.then(f)\n.catch(g);\n");
    }

    #[test]
    fn base_column_follows_the_object_start() {
        let src = "const x = promise\n.then(f);\n";
        let out = apply(src, ChainStyle::Aligned, opts(2), SourceLang::JavaScript);
        // Object starts at column 10.
        assert_eq!(out, "const x = promise\n          .then(f);\n");
    }

    #[test]
    fn single_line_chains_untouched() {
        let src = "promise.then(f).catch(g);\n";
        let out = apply(src, ChainStyle::Indented, opts(2), SourceLang::JavaScript);
        assert_eq!(out, src);
    }

    #[test]
    fn idempotent() {
        let src = "promise\n.then(f)\n.catch(g);\n";
        let once = apply(src, ChainStyle::Indented, opts(2), SourceLang::JavaScript);
        let twice = apply(&once, ChainStyle::Indented, opts(2), SourceLang::JavaScript);
        assert_eq!(once, twice);
    }
}
