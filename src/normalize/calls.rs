//! Multiline call-argument compaction.
//!
//! A call whose argument list is "expanded" (a line break after the open
//! paren, between arguments, or before the close paren) is rejoined onto
//! the callee line: arguments separated by `, `, a pre-existing trailing
//! comma preserved, and any argument that itself spans multiple lines
//! dedented by the indentation the expansion added.

use crate::edit::Replacement;
use crate::normalize::{collect_kind, run_to_fixpoint};
use crate::parse::{LineIndex, ParsedSource, SourceLang};
use tree_sitter::Node;

pub fn apply(current: &str, lang: SourceLang) -> String {
    run_to_fixpoint(current, lang, compute)
}

fn compute(parsed: &ParsedSource<'_>) -> Vec<Replacement> {
    let source = parsed.source;
    let lines = LineIndex::new(source);
    let mut replacements = Vec::new();

    for call in collect_kind(parsed.root_node(), "call_expression") {
        let Some(replacement) = plan_one(call, source, &lines) else {
            continue;
        };
        replacements.push(replacement);
    }

    replacements
}

fn plan_one(call: Node<'_>, source: &str, lines: &LineIndex) -> Option<Replacement> {
    let args = call.child_by_field_name("arguments")?;
    if args.kind() != "arguments" {
        // Tagged template call; nothing to compact.
        return None;
    }
    if args.start_position().row == args.end_position().row {
        return None;
    }

    // No comments may interleave between the arguments themselves.
    let mut cursor = args.walk();
    if args.children(&mut cursor).any(|c| c.kind() == "comment") {
        return None;
    }

    let arguments: Vec<Node<'_>> = {
        let mut cursor = args.walk();
        args.named_children(&mut cursor).collect()
    };
    if arguments.is_empty() {
        return None;
    }

    if !is_expanded(args, &arguments) {
        return None;
    }

    // One indentation level to strip from multiline argument bodies: the
    // difference between the call's own indentation and the original
    // first-argument indentation.
    let call_indent = lines
        .indent_text(source, call.start_position().row)
        .len();
    let first_indent = lines
        .indent_text(source, arguments[0].start_position().row)
        .len();
    let delta = first_indent.saturating_sub(call_indent);

    let trailing_comma = {
        let last_end = arguments.last()?.end_byte();
        let mut cursor = args.walk();
        let has_trailing = args
            .children(&mut cursor)
            .any(|c| c.kind() == "," && c.start_byte() >= last_end);
        has_trailing
    };

    let mut new_text = String::from("(");
    for (i, arg) in arguments.iter().enumerate() {
        if i > 0 {
            new_text.push_str(", ");
        }
        let text = source.get(arg.byte_range())?;
        new_text.push_str(&dedent_continuations(text, delta));
    }
    if trailing_comma {
        new_text.push(',');
    }
    new_text.push(')');

    let old_text = source.get(args.byte_range())?;
    if old_text == new_text {
        return None;
    }

    Some(Replacement::new(args.start_byte(), args.end_byte(), new_text))
}

/// Expanded means a line break sits at one of the joints: open paren to
/// first argument, between adjacent arguments, or last argument to close
/// paren.
fn is_expanded(args: Node<'_>, arguments: &[Node<'_>]) -> bool {
    let open_row = args.start_position().row;
    let close_row = args.end_position().row;

    if arguments[0].start_position().row > open_row {
        return true;
    }
    for pair in arguments.windows(2) {
        if pair[1].start_position().row > pair[0].end_position().row {
            return true;
        }
    }
    arguments
        .last()
        .map(|last| close_row > last.end_position().row)
        .unwrap_or(false)
}

/// Strip up to `delta` leading space characters from each continuation line.
fn dedent_continuations(text: &str, delta: usize) -> String {
    if delta == 0 || !text.contains('\n') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            let strip = line
                .char_indices()
                .take_while(|(idx, c)| *idx < delta && *c == ' ')
                .count();
            out.push_str(&line[strip..]);
            continue;
        }
        out.push_str(line);
    }
    out
}
