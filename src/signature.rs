//! Position-independent structural fingerprints for syntax-tree nodes.
//!
//! Two nodes with equal signatures are treated as the same logical construct
//! even when their source positions, surrounding whitespace, or line breaks
//! differ. The signature covers node kind, child shapes, and leaf token text
//! (identifiers, literals, operators); it excludes positions, ranges, and
//! attached comments. Any change to an operator, a literal value, or the
//! structural shape changes the signature, so pairing fails closed rather
//! than matching different constructs.

use std::collections::{HashMap, VecDeque};
use xxhash_rust::xxh3::xxh3_64;

/// An opaque canonical digest of a node's shape.
///
/// Ephemeral: recomputed per comparison, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeSignature(u64);

impl NodeSignature {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Compute the signature of `node` within `source`.
pub fn signature_of(node: tree_sitter::Node<'_>, source: &str) -> NodeSignature {
    let mut buf = String::new();
    write_shape(node, source, &mut buf);
    NodeSignature(xxh3_64(buf.as_bytes()))
}

fn write_shape(node: tree_sitter::Node<'_>, source: &str, buf: &mut String) {
    if node.kind() == "comment" {
        return;
    }

    buf.push_str(node.kind());

    let mut cursor = node.walk();
    let children: Vec<_> = node
        .children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect();

    if children.is_empty() {
        // Leaf token: identifier, literal, operator, punctuation. The text
        // is part of the shape; the position is not.
        buf.push('=');
        buf.push_str(source.get(node.byte_range()).unwrap_or(""));
    } else {
        buf.push('(');
        for (i, child) in children.into_iter().enumerate() {
            if i > 0 {
                buf.push('|');
            }
            write_shape(child, source, buf);
        }
        buf.push(')');
    }
}

/// FIFO queues of values keyed by signature.
///
/// Duplicate-shaped constructs are paired in source order. This is an
/// explicit approximation: when a construct is legitimately duplicated in
/// the same scope, pairing follows traversal order, not semantics.
#[derive(Debug)]
pub struct SignatureQueue<T> {
    queues: HashMap<u64, VecDeque<T>>,
    len: usize,
}

impl<T> SignatureQueue<T> {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
            len: 0,
        }
    }

    /// Enqueue a value under `sig`.
    pub fn push(&mut self, sig: NodeSignature, value: T) {
        self.queues.entry(sig.0).or_default().push_back(value);
        self.len += 1;
    }

    /// Dequeue the oldest value recorded under `sig`, if any.
    pub fn pop(&mut self, sig: NodeSignature) -> Option<T> {
        let value = self.queues.get_mut(&sig.0)?.pop_front();
        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for SignatureQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{SourceLang, SourceParser};

    fn first_statement_signature(source: &str) -> NodeSignature {
        let mut parser = SourceParser::new(SourceLang::JavaScript).unwrap();
        let parsed = parser.parse_with_source(source).unwrap();
        let root = parsed.root_node();
        let stmt = root.named_child(0).unwrap();
        signature_of(stmt, source)
    }

    #[test]
    fn formatting_does_not_change_signature() {
        let compact = first_statement_signature("foo(a, b);");
        let expanded = first_statement_signature("foo(\n  a,\n  b\n);");
        assert_eq!(compact, expanded);
    }

    #[test]
    fn literal_change_changes_signature() {
        let one = first_statement_signature("const x = 1;");
        let two = first_statement_signature("const x = 2;");
        assert_ne!(one, two);
    }

    #[test]
    fn operator_change_changes_signature() {
        let loose = first_statement_signature("if (a == b) f();");
        let strict = first_statement_signature("if (a === b) f();");
        assert_ne!(loose, strict);
    }

    #[test]
    fn comments_are_excluded_from_shape() {
        let plain = first_statement_signature("foo(a, b);");
        let commented = first_statement_signature("foo(/* inline */ a, b);");
        assert_eq!(plain, commented);
    }

    #[test]
    fn fifo_pairing_order() {
        let mut queue = SignatureQueue::new();
        let sig = NodeSignature(42);
        queue.push(sig, "first");
        queue.push(sig, "second");

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(sig), Some("first"));
        assert_eq!(queue.pop(sig), Some("second"));
        assert_eq!(queue.pop(sig), None);
        assert!(queue.is_empty());
    }
}
