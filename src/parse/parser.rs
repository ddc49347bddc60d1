use crate::parse::errors::ParseError;
use crate::parse::lang::SourceLang;
use ast_grep_language::LanguageExt;
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper for one source language.
pub struct SourceParser {
    parser: Parser,
    lang: SourceLang,
}

impl SourceParser {
    /// Create a parser for the given language.
    pub fn new(lang: SourceLang) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let ts_lang = lang.support_lang().get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| ParseError::LanguageSet)?;

        Ok(Self { parser, lang })
    }

    /// The configured language.
    pub fn lang(&self) -> SourceLang {
        self.lang
    }

    /// Parse source code into a tree-sitter Tree.
    ///
    /// The tree may contain ERROR nodes; that is not a failure here.
    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)
    }

    /// Parse source code and return the tree along with the source.
    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, ParseError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource { source, tree })
    }
}

/// A parsed source file with its tree-sitter tree.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> ParsedSource<'a> {
    /// Get the root node of the tree.
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        has_error_nodes(self.tree.root_node())
    }

    /// Get all ERROR nodes in the tree.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }

    /// Extract text for a node's byte range.
    pub fn node_text(&self, node: tree_sitter::Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }
}

/// Information about an ERROR node in the parse tree.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
    pub end_point: tree_sitter::Point,
}

fn has_error_nodes(node: tree_sitter::Node<'_>) -> bool {
    if node.is_error() || node.is_missing() {
        return true;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if has_error_nodes(child) {
            return true;
        }
    }

    false
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
            end_point: node.end_position(),
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_javascript() {
        let mut parser = SourceParser::new(SourceLang::JavaScript).unwrap();
        let source = "function main() { console.log('hello'); }";
        let parsed = parser.parse_with_source(source).unwrap();

        assert!(!parsed.has_errors());
        assert_eq!(parsed.root_node().kind(), "program");
    }

    #[test]
    fn parse_broken_javascript_recovers() {
        let mut parser = SourceParser::new(SourceLang::JavaScript).unwrap();
        let source = "function main( { }";
        let parsed = parser.parse_with_source(source).unwrap();

        assert!(parsed.has_errors());
        assert!(!parsed.error_nodes().is_empty());
    }

    #[test]
    fn parse_typescript() {
        let mut parser = SourceParser::new(SourceLang::TypeScript).unwrap();
        let source = "const x: number = 1;";
        let parsed = parser.parse_with_source(source).unwrap();

        assert!(!parsed.has_errors());
    }

    #[test]
    fn node_text_slices_source() {
        let mut parser = SourceParser::new(SourceLang::JavaScript).unwrap();
        let source = "const a = 1;\nconst b = 2;\n";
        let parsed = parser.parse_with_source(source).unwrap();

        let root = parsed.root_node();
        let second = root.child(1).unwrap();
        assert_eq!(parsed.node_text(second), "const b = 2;");
    }
}
