//! Single-line conditional brace omission.
//!
//! Rewrites a single-statement conditional (no alternate) whose condition
//! and body each occupy one line, braced or already unbraced but split
//! across two lines, into `if (condition) statement` on the keyword line.
//! Both pieces are reassembled verbatim from the original text; nothing is
//! re-rendered.

use crate::edit::Replacement;
use crate::normalize::{collect_kind, contains_comment, run_to_fixpoint};
use crate::parse::{ParsedSource, SourceLang};
use tree_sitter::Node;

pub fn apply(current: &str, lang: SourceLang) -> String {
    run_to_fixpoint(current, lang, compute)
}

fn compute(parsed: &ParsedSource<'_>) -> Vec<Replacement> {
    let source = parsed.source;
    let mut replacements = Vec::new();

    for node in collect_kind(parsed.root_node(), "if_statement") {
        let Some(replacement) = plan_one(node, source) else {
            continue;
        };
        replacements.push(replacement);
    }

    replacements
}

fn plan_one(node: Node<'_>, source: &str) -> Option<Replacement> {
    if node.child_by_field_name("alternative").is_some() {
        return None;
    }
    if contains_comment(node) {
        return None;
    }

    let condition = node.child_by_field_name("condition")?;
    let consequence = node.child_by_field_name("consequence")?;

    // Keyword and condition must share one line.
    let keyword_row = node.start_position().row;
    if condition.start_position().row != keyword_row
        || condition.end_position().row != keyword_row
    {
        return None;
    }

    let statement = match consequence.kind() {
        "statement_block" => {
            let mut cursor = consequence.walk();
            let inner: Vec<Node<'_>> = consequence
                .named_children(&mut cursor)
                .filter(|c| c.kind() != "comment")
                .collect();
            if inner.len() != 1 {
                return None;
            }
            inner[0]
        }
        _ => consequence,
    };

    // Body on one line, on the keyword line or directly below it.
    if statement.start_position().row != statement.end_position().row {
        return None;
    }
    if statement.start_position().row > keyword_row + 1 {
        return None;
    }
    // Nested conditionals and empty statements are left alone.
    if matches!(statement.kind(), "if_statement" | "empty_statement") {
        return None;
    }

    let head = source.get(node.start_byte()..condition.end_byte())?;
    let body = source.get(statement.byte_range())?;
    let new_text = format!("{head} {body}");

    let old_text = source.get(node.byte_range())?;
    if old_text == new_text {
        return None;
    }

    Some(Replacement::new(node.start_byte(), node.end_byte(), new_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn omit(source: &str) -> String {
        apply(source, SourceLang::JavaScript)
    }

    #[test]
    fn collapses_two_line_unbraced_conditional() {
        assert_eq!(omit("if (a)\n  doThing();\n"), "if (a) doThing();\n");
    }

    #[test]
    fn unwraps_braced_single_statement() {
        assert_eq!(omit("if (a) { doThing(); }\n"), "if (a) doThing();\n");
        assert_eq!(omit("if (a) {\n  doThing();\n}\n"), "if (a) doThing();\n");
    }

    #[test]
    fn leaves_multi_statement_bodies() {
        let src = "if (a) {\n  one();\n  two();\n}\n";
        assert_eq!(omit(src), src);
    }

    #[test]
    fn leaves_conditionals_with_alternates() {
        let src = "if (a) { one(); } else { two(); }\n";
        assert_eq!(omit(src), src);
    }

    #[test]
    fn leaves_commented_conditionals() {
        let src = "if (a) {\n  // why\n  doThing();\n}\n";
        assert_eq!(omit(src), src);
    }

    #[test]
    fn leaves_multiline_bodies() {
        let src = "if (a) {\n  doThing(\n    arg\n  );\n}\n";
        assert_eq!(omit(src), src);
    }

    #[test]
    fn leaves_nested_conditionals() {
        let src = "if (a)\n  if (b) c();\n";
        assert_eq!(omit(src), src);
    }

    #[test]
    fn idempotent() {
        let once = omit("if (a)\n  doThing();\n");
        assert_eq!(omit(&once), once);
    }
}
