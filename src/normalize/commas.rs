//! Declaration-list comma placement.
//!
//! Converts between trailing commas (comma after the previous declarator,
//! value on the next line) and leading commas (comma at the start of the
//! next declarator's continuation line), preserving the next item's
//! existing indentation text.

use crate::edit::Replacement;
use crate::normalize::{collect_kind, run_to_fixpoint};
use crate::parse::{ParsedSource, SourceLang};
use tree_sitter::Node;

pub fn apply(current: &str, leading: bool, lang: SourceLang) -> String {
    run_to_fixpoint(current, lang, |parsed| compute(parsed, leading))
}

fn compute(parsed: &ParsedSource<'_>, leading: bool) -> Vec<Replacement> {
    let source = parsed.source;
    let mut replacements = Vec::new();

    let mut declarations = collect_kind(parsed.root_node(), "lexical_declaration");
    declarations.extend(collect_kind(parsed.root_node(), "variable_declaration"));

    for declaration in declarations {
        let declarators: Vec<Node<'_>> = {
            let mut cursor = declaration.walk();
            declaration
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "variable_declarator")
                .collect()
        };
        if declarators.len() < 2 {
            continue;
        }

        for pair in declarators.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.start_position().row <= prev.end_position().row {
                continue;
            }
            let Some(gap) = source.get(prev.end_byte()..next.start_byte()) else {
                continue;
            };
            // The gap must be exactly one comma, whitespace, and one line
            // break; anything else (a comment, a blank line) is left alone.
            if !clean_gap(gap) {
                continue;
            }

            let after_break = &gap[gap.find('\n').map(|i| i + 1).unwrap_or(0)..];
            let indent: String = after_break
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect();

            let new_text = if leading {
                format!("\n{indent}, ")
            } else {
                format!(",\n{indent}")
            };
            if new_text != gap {
                replacements.push(Replacement::new(prev.end_byte(), next.start_byte(), new_text));
            }
        }
    }

    replacements
}

fn clean_gap(gap: &str) -> bool {
    let mut commas = 0;
    let mut breaks = 0;
    for c in gap.chars() {
        match c {
            ',' => commas += 1,
            '\n' => breaks += 1,
            c if c.is_whitespace() => {}
            _ => return false,
        }
    }
    commas == 1 && breaks == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_to_leading() {
        let src = "var a = 1,\n    b = 2;\n";
        let out = apply(src, true, SourceLang::JavaScript);
        assert_eq!(out, "var a = 1\n    , b = 2;\n");
    }

    #[test]
    fn leading_to_trailing() {
        let src = "var a = 1\n  , b = 2;\n";
        let out = apply(src, false, SourceLang::JavaScript);
        assert_eq!(out, "var a = 1,\n  b = 2;\n");
    }

    #[test]
    fn single_line_lists_untouched() {
        let src = "var a = 1, b = 2;\n";
        assert_eq!(apply(src, true, SourceLang::JavaScript), src);
        assert_eq!(apply(src, false, SourceLang::JavaScript), src);
    }

    #[test]
    fn commented_gaps_untouched() {
        let src = "var a = 1, // first\n    b = 2;\n";
        assert_eq!(apply(src, true, SourceLang::JavaScript), src);
    }

    #[test]
    fn three_declarators() {
        let src = "var a = 1,\n    b = 2,\n    c = 3;\n";
        let out = apply(src, true, SourceLang::JavaScript);
        assert_eq!(out, "var a = 1\n    , b = 2\n    , c = 3;\n");
    }

    #[test]
    fn idempotent() {
        let once = apply("var a = 1,\n    b = 2;\n", true, SourceLang::JavaScript);
        assert_eq!(apply(&once, true, SourceLang::JavaScript), once);
    }
}
