//! The signal extractor: one full tree walk plus a line-oriented text scan,
//! producing a [`FileSignals`] record.
//!
//! Traversal carries an explicit ancestor stack; nodes own no parent links.
//! The walk never fails: constructs that cannot be classified (missing
//! fields, broken subtrees) are skipped for that one observation.

use crate::parse::{LineIndex, ParsedSource};
use crate::signals::classify::{self, CommentSpacing};
use crate::signals::FileSignals;
use tree_sitter::Node;

/// Extract style signals from a parsed file.
///
/// Pure and non-throwing; a partially broken tree yields partial signals.
pub fn extract(parsed: &ParsedSource<'_>) -> FileSignals {
    let source = parsed.source;
    let mut signals = FileSignals::default();
    let lines = LineIndex::new(source);

    scan_lines(source, &mut signals);

    let root = parsed.root_node();
    let mut ancestors: Vec<Node<'_>> = Vec::new();
    let mut trailing: Vec<TrailingCandidate> = Vec::new();
    walk(
        root,
        source,
        &lines,
        &mut ancestors,
        &mut signals,
        &mut trailing,
    );

    observe_inclusion_order(root, source, &mut signals);
    observe_trailing_alignment(&trailing, source, &lines, &mut signals);

    signals
}

fn walk<'t>(
    node: Node<'t>,
    source: &str,
    lines: &LineIndex,
    ancestors: &mut Vec<Node<'t>>,
    signals: &mut FileSignals,
    trailing: &mut Vec<TrailingCandidate>,
) {
    observe(node, source, lines, ancestors, signals, trailing);

    ancestors.push(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, lines, ancestors, signals, trailing);
    }
    ancestors.pop();
}

fn observe<'t>(
    node: Node<'t>,
    source: &str,
    lines: &LineIndex,
    ancestors: &[Node<'t>],
    signals: &mut FileSignals,
    trailing: &mut Vec<TrailingCandidate>,
) {
    match node.kind() {
        "comment" => observe_comment(node, source, lines, signals, trailing),
        "string" => observe_quote(node, source, signals),
        "function_declaration" | "generator_function_declaration" => {
            observe_function_doc(node, ancestors, source, signals)
        }
        "variable_declarator" => observe_bound_function_doc(node, ancestors, source, signals),
        "statement_block" => observe_guard(node, ancestors, signals),
        "if_statement" => {
            observe_single_line_if(node, signals);
            observe_blank_before(node, source, lines, ancestors, signals);
        }
        "return_statement" => observe_blank_before(node, source, lines, ancestors, signals),
        "binary_expression" => observe_comparison(node, source, signals),
        "ternary_expression" => observe_ternary(node, source, signals),
        "switch_statement" => observe_switch_cases(node, signals),
        "switch_case" => observe_case_breaks(node, signals),
        "member_expression" => observe_chain(node, source, lines, signals),
        "call_expression" => observe_call(node, signals),
        "lexical_declaration" | "variable_declaration" => {
            observe_declaration_commas(node, signals)
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Text scan

fn scan_lines(source: &str, signals: &mut FileSignals) {
    for line in source.lines() {
        let width = line.chars().count() as u64;
        signals.max_line_len = signals.max_line_len.max(width);

        if line.trim().is_empty() {
            signals.blank_lines += 1;
            continue;
        }
        signals.code_lines += 1;

        if line.starts_with('\t') {
            signals.indent_tab_lines += 1;
        } else if line.starts_with(' ') {
            let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
            if !indent.contains('\t') {
                signals.indent_space_lines += 1;
                let w = indent.len() as u32;
                *signals.indent_widths.entry(w).or_insert(0) += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Comments

struct TrailingCandidate {
    row: usize,
    col: usize,
    indent: String,
    code_len: usize,
    gap: usize,
}

fn observe_comment(
    node: Node<'_>,
    source: &str,
    lines: &LineIndex,
    signals: &mut FileSignals,
    trailing: &mut Vec<TrailingCandidate>,
) {
    let Some(text) = source.get(node.byte_range()) else {
        return;
    };
    if !text.starts_with("//") {
        return;
    }

    match classify::classify_comment_spacing(text) {
        CommentSpacing::Spaced => signals.comment_spaced += 1,
        CommentSpacing::Unspaced => signals.comment_unspaced += 1,
        CommentSpacing::Excluded => {}
    }

    // Trailing candidate: code precedes the comment on its line and the
    // left-hand context is alignment-worthy.
    let row = node.start_position().row;
    let Some(line_start) = lines.line_start(row) else {
        return;
    };
    let Some(code) = source.get(line_start..node.start_byte()) else {
        return;
    };
    if code.trim().is_empty() || !classify::alignment_worthy(code) {
        return;
    }

    let code_len = code.trim_end().len();
    trailing.push(TrailingCandidate {
        row,
        col: node.start_position().column,
        indent: lines.indent_text(source, row).to_string(),
        code_len,
        gap: code.len() - code_len,
    });
}

fn observe_trailing_alignment(
    candidates: &[TrailingCandidate],
    source: &str,
    lines: &LineIndex,
    signals: &mut FileSignals,
) {
    let mut group: Vec<&TrailingCandidate> = Vec::new();

    for cand in candidates {
        let extends_group = match group.last() {
            Some(prev) => {
                let row_gap = cand.row.saturating_sub(prev.row);
                let blank_between =
                    (prev.row + 1..cand.row).any(|r| lines.is_blank(source, r));
                cand.indent == prev.indent && row_gap >= 1 && row_gap <= 3 && !blank_between
            }
            None => true,
        };

        if !extends_group {
            score_trailing_group(&group, signals);
            group.clear();
        }
        group.push(cand);
    }
    score_trailing_group(&group, signals);
}

fn score_trailing_group(group: &[&TrailingCandidate], signals: &mut FileSignals) {
    for pair in group.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        // A one-space gap on both sides with equal left-hand text length is
        // ambiguous: alignment and single-space produce the same column.
        if a.gap == 1 && b.gap == 1 && a.code_len == b.code_len {
            continue;
        }
        if a.col == b.col {
            signals.trailing_aligned += 1;
        } else {
            signals.trailing_unaligned += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Literals

fn observe_quote(node: Node<'_>, source: &str, signals: &mut FileSignals) {
    match source.get(node.byte_range()).and_then(|t| t.chars().next()) {
        Some('"') => signals.quote_double += 1,
        Some('\'') => signals.quote_single += 1,
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Functions: doc comments and guard clauses

fn observe_function_doc<'t>(
    func: Node<'t>,
    ancestors: &[Node<'t>],
    source: &str,
    signals: &mut FileSignals,
) {
    let Some(statement) = enclosing_statement(func, ancestors) else {
        return;
    };

    let Some(name) = func.child_by_field_name("name") else {
        return;
    };
    let Some(name_text) = source.get(name.byte_range()) else {
        return;
    };
    if classify::identifier_words(name_text) < 2 {
        return;
    }

    if has_doc_comment(statement, source) {
        signals.fn_documented += 1;
    } else {
        signals.fn_undocumented += 1;
    }
}

fn observe_bound_function_doc<'t>(
    declarator: Node<'t>,
    ancestors: &[Node<'t>],
    source: &str,
    signals: &mut FileSignals,
) {
    let Some(value) = declarator.child_by_field_name("value") else {
        return;
    };
    if !matches!(
        value.kind(),
        "arrow_function" | "function_expression" | "function"
    ) {
        return;
    }
    let Some(declaration) = ancestors.last() else {
        return;
    };
    if !matches!(
        declaration.kind(),
        "lexical_declaration" | "variable_declaration"
    ) {
        return;
    }
    // ancestors = [..., grandparent, declaration]
    let grandparents = &ancestors[..ancestors.len() - 1];
    let Some(statement) = enclosing_statement(*declaration, grandparents) else {
        return;
    };

    let Some(name) = declarator.child_by_field_name("name") else {
        return;
    };
    let Some(name_text) = source.get(name.byte_range()) else {
        return;
    };
    if classify::identifier_words(name_text) < 2 {
        return;
    }

    if has_doc_comment(statement, source) {
        signals.fn_documented += 1;
    } else {
        signals.fn_undocumented += 1;
    }
}

/// The statement-level node for a top-level declaration: the node itself
/// when its parent is the program, its `export_statement` wrapper when
/// exported at the top level, otherwise None (not top-level).
fn enclosing_statement<'t>(node: Node<'t>, ancestors: &[Node<'t>]) -> Option<Node<'t>> {
    let parent = ancestors.last()?;
    match parent.kind() {
        "program" => Some(node),
        "export_statement" => {
            let grandparent = ancestors.get(ancestors.len().checked_sub(2)?)?;
            (grandparent.kind() == "program").then_some(*parent)
        }
        _ => None,
    }
}

/// A directly preceding `/**` block comment ending within one line of the
/// statement counts as its doc comment.
fn has_doc_comment(statement: Node<'_>, source: &str) -> bool {
    let Some(prev) = statement.prev_sibling() else {
        return false;
    };
    if prev.kind() != "comment" {
        return false;
    }
    let Some(text) = source.get(prev.byte_range()) else {
        return false;
    };
    classify::is_doc_block_comment(text)
        && statement.start_position().row.saturating_sub(prev.end_position().row) <= 1
}

fn observe_guard<'t>(body: Node<'t>, ancestors: &[Node<'t>], signals: &mut FileSignals) {
    let Some(parent) = ancestors.last() else {
        return;
    };
    if !matches!(
        parent.kind(),
        "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "arrow_function"
            | "method_definition"
    ) {
        return;
    }

    let statements = named_non_comment_children(body);
    if statements.len() < 2 {
        return;
    }
    let first = statements[0];
    if first.kind() != "if_statement" || first.child_by_field_name("alternative").is_some() {
        return;
    }
    let Some(consequence) = first.child_by_field_name("consequence") else {
        return;
    };

    if is_guard_consequent(consequence) {
        signals.guard_used += 1;
    } else {
        signals.guard_bypassed += 1;
    }
}

fn is_guard_consequent(node: Node<'_>) -> bool {
    match node.kind() {
        "return_statement" | "throw_statement" => true,
        "statement_block" => {
            let inner = named_non_comment_children(node);
            inner.len() == 1 && is_guard_consequent(inner[0])
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Conditionals

fn observe_single_line_if(node: Node<'_>, signals: &mut FileSignals) {
    if node.child_by_field_name("alternative").is_some() {
        return;
    }
    if node.start_position().row != node.end_position().row {
        return;
    }
    let Some(consequence) = node.child_by_field_name("consequence") else {
        return;
    };

    if consequence.kind() == "statement_block" {
        if named_non_comment_children(consequence).len() == 1 {
            signals.if_braced += 1;
        }
    } else {
        signals.if_unbraced += 1;
    }
}

fn observe_blank_before<'t>(
    node: Node<'t>,
    source: &str,
    lines: &LineIndex,
    ancestors: &[Node<'t>],
    signals: &mut FileSignals,
) {
    let Some(parent) = ancestors.last() else {
        return;
    };
    if !matches!(parent.kind(), "statement_block" | "program") {
        return;
    }
    let statements = named_non_comment_children(*parent);
    if statements.len() < 2 {
        return;
    }
    if statements.first().map(|s| s.id()) == Some(node.id()) {
        return;
    }
    let row = node.start_position().row;
    if row == 0 {
        return;
    }

    if lines.is_blank(source, row - 1) {
        signals.blank_before += 1;
    } else {
        signals.no_blank_before += 1;
    }
}

// ---------------------------------------------------------------------------
// Comparisons and ternaries

fn observe_comparison(node: Node<'_>, source: &str, signals: &mut FileSignals) {
    let Some(op) = node.child_by_field_name("operator") else {
        return;
    };
    let Some(op_text) = source.get(op.byte_range()) else {
        return;
    };
    if !classify::is_comparison_operator(op_text) {
        return;
    }
    let (Some(left), Some(right)) = (
        node.child_by_field_name("left"),
        node.child_by_field_name("right"),
    ) else {
        return;
    };

    let left_literal = is_literal_operand(left);
    let right_literal = is_literal_operand(right);
    if left_literal == right_literal {
        return;
    }

    if left_literal {
        signals.yoda += 1;
    } else {
        signals.natural_comparison += 1;
    }
}

fn is_literal_operand(node: Node<'_>) -> bool {
    let has_substitution = {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|c| c.kind() == "template_substitution");
        found
    };
    classify::is_literal_kind(node.kind(), has_substitution)
}

fn observe_ternary(node: Node<'_>, source: &str, signals: &mut FileSignals) {
    if node.start_position().row == node.end_position().row {
        return;
    }
    let (Some(cond), Some(cons), Some(alt)) = (
        node.child_by_field_name("condition"),
        node.child_by_field_name("consequence"),
        node.child_by_field_name("alternative"),
    ) else {
        return;
    };

    // Locate the branch operators by scanning the raw text between the
    // known sub-expression boundaries.
    let question = source.get(cond.end_byte()..cons.start_byte()).unwrap_or("");
    let colon = source.get(cons.end_byte()..alt.start_byte()).unwrap_or("");
    let question_leading = question.split('?').next().unwrap_or("").contains('\n');
    let colon_leading = colon.split(':').next().unwrap_or("").contains('\n');

    if question_leading || colon_leading {
        signals.ternary_leading += 1;
    } else {
        signals.ternary_trailing += 1;
    }
}

// ---------------------------------------------------------------------------
// Switch statements

fn observe_switch_cases(node: Node<'_>, signals: &mut FileSignals) {
    let switch_col = node.start_position().column;
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };

    let mut cursor = body.walk();
    for case in body.named_children(&mut cursor) {
        if !matches!(case.kind(), "switch_case" | "switch_default") {
            continue;
        }
        // Only cases that start their own line are comparable.
        if case.start_position().row == node.start_position().row {
            continue;
        }
        let col = case.start_position().column;
        if col > switch_col {
            signals.case_indented += 1;
        } else if col == switch_col {
            signals.case_aligned += 1;
        }
    }
}

fn observe_case_breaks(node: Node<'_>, signals: &mut FileSignals) {
    let case_col = node.start_position().column;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "break_statement" {
            continue;
        }
        if child.start_position().row == node.start_position().row {
            continue;
        }
        let col = child.start_position().column;
        if col == case_col {
            signals.break_aligned += 1;
        } else if col > case_col {
            signals.break_indented += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Member chains and calls

fn observe_chain(node: Node<'_>, source: &str, lines: &LineIndex, signals: &mut FileSignals) {
    let Some(object) = node.child_by_field_name("object") else {
        return;
    };
    let Some(op) = access_operator(node) else {
        return;
    };

    let op_row = op.start_position().row;
    if op_row <= object.end_position().row {
        return;
    }
    // The continuation line must start with the access operator.
    let Some(line_start) = lines.line_start(op_row) else {
        return;
    };
    let indent = lines.indent_text(source, op_row);
    if line_start + indent.len() != op.start_byte() {
        return;
    }

    if op.start_position().column == object.start_position().column {
        signals.chain_aligned += 1;
    } else {
        signals.chain_indented += 1;
    }
}

fn access_operator<'t>(member: Node<'t>) -> Option<Node<'t>> {
    let mut cursor = member.walk();
    let op = member
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "." | "?." | "optional_chain"));
    op
}

fn observe_call(node: Node<'_>, signals: &mut FileSignals) {
    if node.start_position().row == node.end_position().row {
        return;
    }
    let Some(callee) = node.child_by_field_name("function") else {
        return;
    };
    let Some(args) = node.child_by_field_name("arguments") else {
        return;
    };
    if args.kind() != "arguments" {
        return;
    }
    let named = named_non_comment_children(args);
    let Some(first) = named.first() else {
        return;
    };

    if first.start_position().row == callee.end_position().row {
        signals.call_compact += 1;
    } else {
        signals.call_expanded += 1;
    }
}

// ---------------------------------------------------------------------------
// Declaration lists

fn observe_declaration_commas(node: Node<'_>, signals: &mut FileSignals) {
    let declarators: Vec<Node<'_>> = {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() == "variable_declarator")
            .collect()
    };
    if declarators.len() < 2 {
        return;
    }

    let commas: Vec<Node<'_>> = {
        let mut cursor = node.walk();
        node.children(&mut cursor).filter(|c| c.kind() == ",").collect()
    };
    let comments: Vec<Node<'_>> = {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|c| c.kind() == "comment")
            .collect()
    };

    for pair in declarators.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.start_position().row <= prev.end_position().row {
            continue;
        }
        let gap = prev.end_byte()..next.start_byte();
        if comments
            .iter()
            .any(|c| c.start_byte() >= gap.start && c.end_byte() <= gap.end)
        {
            continue;
        }
        let Some(comma) = commas
            .iter()
            .find(|c| c.start_byte() >= gap.start && c.end_byte() <= gap.end)
        else {
            continue;
        };

        if comma.start_position().row == prev.end_position().row {
            signals.comma_trailing += 1;
        } else if comma.start_position().row > prev.end_position().row {
            signals.comma_leading += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Import / inclusion ordering

fn observe_inclusion_order(root: Node<'_>, source: &str, signals: &mut FileSignals) {
    let mut import_run: Vec<String> = Vec::new();
    let mut require_run: Vec<String> = Vec::new();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "comment" {
            continue;
        }
        if child.kind() == "import_statement" {
            flush_inclusion_run(&mut require_run, signals);
            if let Some(name) = import_source(child, source) {
                import_run.push(name);
            }
            continue;
        }
        if let Some(name) = require_module(child, source) {
            flush_inclusion_run(&mut import_run, signals);
            require_run.push(name);
            continue;
        }
        flush_inclusion_run(&mut import_run, signals);
        flush_inclusion_run(&mut require_run, signals);
    }
    flush_inclusion_run(&mut import_run, signals);
    flush_inclusion_run(&mut require_run, signals);
}

/// Weight the vote by `count − 1` so large unsorted groups are not dominated
/// by trivially-sorted 2-item groups.
fn flush_inclusion_run(run: &mut Vec<String>, signals: &mut FileSignals) {
    if run.len() >= 2 {
        let weight = (run.len() - 1) as u64;
        if classify::is_sorted_case_insensitive(run) {
            signals.imports_sorted += weight;
        } else {
            signals.imports_unsorted += weight;
        }
    }
    run.clear();
}

fn import_source(node: Node<'_>, source: &str) -> Option<String> {
    let src = node.child_by_field_name("source")?;
    let text = source.get(src.byte_range())?;
    Some(strip_quotes(text).to_string())
}

/// `const x = require('mod')` (or `var`/`let`) as a call-style inclusion.
fn require_module(node: Node<'_>, source: &str) -> Option<String> {
    if !matches!(node.kind(), "lexical_declaration" | "variable_declaration") {
        return None;
    }
    let mut cursor = node.walk();
    let declarator = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "variable_declarator")?;
    let value = declarator.child_by_field_name("value")?;
    if value.kind() != "call_expression" {
        return None;
    }
    let callee = value.child_by_field_name("function")?;
    if source.get(callee.byte_range())? != "require" {
        return None;
    }
    let args = value.child_by_field_name("arguments")?;
    let first = named_non_comment_children(args).first().copied()?;
    if first.kind() != "string" {
        return None;
    }
    Some(strip_quotes(source.get(first.byte_range())?).to_string())
}

fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

// ---------------------------------------------------------------------------
// Shared helpers

fn named_non_comment_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{SourceLang, SourceParser};
    use crate::signals::FileSignals;

    fn signals_for(source: &str) -> FileSignals {
        let mut parser = SourceParser::new(SourceLang::JavaScript).unwrap();
        let parsed = parser.parse_with_source(source).unwrap();
        extract(&parsed)
    }

    #[test]
    fn comment_spacing_counts() {
        let sig = signals_for("// good\n//bad\n//----\n// eslint-disable\nlet x = 1;\n");
        assert_eq!(sig.comment_spaced, 1);
        assert_eq!(sig.comment_unspaced, 1);
    }

    #[test]
    fn quote_counts() {
        let sig = signals_for("const a = \"x\";\nconst b = \"y\";\nconst c = 'z';\n");
        assert_eq!(sig.quote_double, 2);
        assert_eq!(sig.quote_single, 1);
    }

    #[test]
    fn single_line_if_braces() {
        let sig = signals_for("if (a) { doThing(); }\nif (b) doOther();\n");
        assert_eq!(sig.if_braced, 1);
        assert_eq!(sig.if_unbraced, 1);
    }

    #[test]
    fn multi_line_if_is_not_counted() {
        let sig = signals_for("if (a) {\n  doThing();\n}\n");
        assert_eq!(sig.if_braced, 0);
        assert_eq!(sig.if_unbraced, 0);
    }

    #[test]
    fn yoda_detection() {
        let sig = signals_for("if (1 === a) f();\nif (b === 2) g();\nif (c === d) h();\n");
        assert_eq!(sig.yoda, 1);
        assert_eq!(sig.natural_comparison, 1);
    }

    #[test]
    fn guard_clause_detection() {
        let guarded = "function processOrder(o) {\n  if (!o) return;\n  ship(o);\n}\n";
        let sig = signals_for(guarded);
        assert_eq!(sig.guard_used, 1);
        assert_eq!(sig.guard_bypassed, 0);

        let unguarded = "function processOrder(o) {\n  if (o) { ship(o); log(o); }\n  done();\n}\n";
        let sig = signals_for(unguarded);
        assert_eq!(sig.guard_used, 0);
        assert_eq!(sig.guard_bypassed, 1);
    }

    #[test]
    fn doc_comment_on_multiword_function() {
        let documented = "/** Ships an order. */\nfunction shipOrder(o) {\n  return o;\n}\n";
        let sig = signals_for(documented);
        assert_eq!(sig.fn_documented, 1);
        assert_eq!(sig.fn_undocumented, 0);

        let undocumented = "function shipOrder(o) {\n  return o;\n}\n";
        let sig = signals_for(undocumented);
        assert_eq!(sig.fn_undocumented, 1);
    }

    #[test]
    fn single_word_functions_are_excluded_from_doc_dimension() {
        let sig = signals_for("function ship(o) {\n  return o;\n}\n");
        assert_eq!(sig.fn_documented, 0);
        assert_eq!(sig.fn_undocumented, 0);
    }

    #[test]
    fn ternary_placement() {
        let leading = "const x = cond\n  ? yes\n  : no;\n";
        let sig = signals_for(leading);
        assert_eq!(sig.ternary_leading, 1);

        let trailing = "const x = cond ?\n  yes :\n  no;\n";
        let sig = signals_for(trailing);
        assert_eq!(sig.ternary_trailing, 1);

        let single_line = "const x = cond ? yes : no;\n";
        let sig = signals_for(single_line);
        assert_eq!(sig.ternary_leading + sig.ternary_trailing, 0);
    }

    #[test]
    fn switch_and_break_indentation() {
        let src = "switch (x) {\n  case 1:\n    f();\n    break;\n  case 2:\n    g();\n    break;\n}\n";
        let sig = signals_for(src);
        assert_eq!(sig.case_indented, 2);
        assert_eq!(sig.break_indented, 2);

        let aligned = "switch (x) {\ncase 1:\n  f();\n  break;\n}\n";
        let sig = signals_for(aligned);
        assert_eq!(sig.case_aligned, 1);
        assert_eq!(sig.break_indented, 1);
    }

    #[test]
    fn chain_indentation() {
        let aligned = "promise\n.then(f)\n.catch(g);\n";
        let sig = signals_for(aligned);
        assert_eq!(sig.chain_aligned, 2);
        assert_eq!(sig.chain_indented, 0);

        let indented = "promise\n  .then(f)\n  .catch(g);\n";
        let sig = signals_for(indented);
        assert_eq!(sig.chain_indented, 2);
        assert_eq!(sig.chain_aligned, 0);
    }

    #[test]
    fn call_compactness() {
        let compact = "register(first,\n  second);\n";
        let sig = signals_for(compact);
        assert_eq!(sig.call_compact, 1);

        let expanded = "register(\n  first,\n  second\n);\n";
        let sig = signals_for(expanded);
        assert_eq!(sig.call_expanded, 1);
    }

    #[test]
    fn declaration_comma_placement() {
        let trailing = "var a = 1,\n    b = 2;\n";
        let sig = signals_for(trailing);
        assert_eq!(sig.comma_trailing, 1);
        assert_eq!(sig.comma_leading, 0);

        let leading = "var a = 1\n  , b = 2;\n";
        let sig = signals_for(leading);
        assert_eq!(sig.comma_leading, 1);
        assert_eq!(sig.comma_trailing, 0);
    }

    #[test]
    fn blank_line_before_return() {
        let with_blank = "function computeTotal(x) {\n  const y = f(x);\n\n  return y;\n}\n";
        let sig = signals_for(with_blank);
        assert_eq!(sig.blank_before, 1);

        let without = "function computeTotal(x) {\n  const y = f(x);\n  return y;\n}\n";
        let sig = signals_for(without);
        assert_eq!(sig.no_blank_before, 1);
    }

    #[test]
    fn import_ordering_votes() {
        let sorted = "import a from 'alpha';\nimport b from 'beta';\nimport c from 'gamma';\n";
        let sig = signals_for(sorted);
        assert_eq!(sig.imports_sorted, 2);
        assert_eq!(sig.imports_unsorted, 0);

        let unsorted = "import z from 'zeta';\nimport a from 'alpha';\n";
        let sig = signals_for(unsorted);
        assert_eq!(sig.imports_unsorted, 1);
    }

    #[test]
    fn require_ordering_votes() {
        let src = "const alpha = require('alpha');\nconst beta = require('beta');\n";
        let sig = signals_for(src);
        assert_eq!(sig.imports_sorted, 1);
    }

    #[test]
    fn trailing_comment_alignment() {
        let aligned = "const a = 1;   // one\nconst bb = 2;  // two\n";
        let sig = signals_for(aligned);
        assert_eq!(sig.trailing_aligned, 1);
        assert_eq!(sig.trailing_unaligned, 0);

        let unaligned = "const a = 1; // one\nconst bbbb = 2; // two\n";
        let sig = signals_for(unaligned);
        assert_eq!(sig.trailing_unaligned, 1);
    }

    #[test]
    fn ambiguous_single_space_pairs_are_excluded() {
        // Equal left-hand lengths, one-space gaps on both: excluded entirely.
        let src = "const a = 1; // one\nconst b = 2; // two\n";
        let sig = signals_for(src);
        assert_eq!(sig.trailing_aligned, 0);
        assert_eq!(sig.trailing_unaligned, 0);
    }

    #[test]
    fn line_scan_counters() {
        let src = "const a = 1;\n\n    indented();\n\ttabbed();\n";
        let sig = signals_for(src);
        assert_eq!(sig.blank_lines, 1);
        assert_eq!(sig.code_lines, 3);
        assert_eq!(sig.indent_space_lines, 1);
        assert_eq!(sig.indent_tab_lines, 1);
        assert_eq!(sig.indent_widths.get(&4), Some(&1));
    }

    #[test]
    fn broken_source_yields_partial_signals() {
        let sig = signals_for("function ( { // nope\nconst a = \"x\";\n");
        // No panic; whatever parsed still counts.
        assert!(sig.quote_double <= 1);
    }
}
