use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// The fundamental rewrite primitive: a byte-span replacement against one
/// specific source string.
///
/// Every normalizer compiles its layout decision down to a set of these.
/// Intelligence lives in span acquisition (signature matching, layout
/// observation), not in application.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a Replacement does nothing until applied"]
pub struct Replacement {
    /// Starting byte offset (inclusive)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
    /// New text for [start, end)
    pub text: String,
}

impl Replacement {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// A replacement with an inverted or empty span can never be applied.
    pub fn is_degenerate(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Apply a set of replacements to `source` in one pass.
///
/// Replacements are sorted by descending `start` and spliced bottom-to-top,
/// so every offset stays valid against the original string and the result is
/// independent of the order the set was produced in. Degenerate spans,
/// out-of-bounds spans, spans that split a UTF-8 character, and spans that
/// overlap an already-accepted replacement are dropped rather than applied;
/// a partial rewrite is always preferred over a wrong one.
pub fn apply_replacements(source: &str, mut replacements: Vec<Replacement>) -> String {
    replacements.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut out = source.to_string();
    // Lowest start accepted so far; a later (lower-offset) replacement must
    // end at or before it to stay disjoint.
    let mut accepted_floor = source.len() + 1;

    for rep in replacements {
        if rep.is_degenerate() || rep.end > source.len() {
            continue;
        }
        if rep.end > accepted_floor {
            continue;
        }
        if !source.is_char_boundary(rep.start) || !source.is_char_boundary(rep.end) {
            continue;
        }

        out.replace_range(rep.start..rep.end, &rep.text);
        accepted_floor = rep.start;
    }

    out
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the file is untouched. The mtime is
/// bumped afterwards so downstream watchers and incremental tooling notice
/// the rewrite.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), WriteError> {
    let parent = path.parent().ok_or_else(|| {
        WriteError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        ))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    let now = filetime::FileTime::now();
    filetime::set_file_mtime(path, now)?;

    Ok(())
}

/// Rewrite a file in place if the content changed.
///
/// Returns true if the file was written.
pub fn write_if_changed(path: &Path, original: &str, rewritten: &str) -> Result<bool, WriteError> {
    if original == rewritten {
        return Ok(false);
    }
    atomic_write(path, rewritten)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn apply_single_replacement() {
        let out = apply_replacements("hello world", vec![Replacement::new(0, 5, "goodbye")]);
        assert_eq!(out, "goodbye world");
    }

    #[test]
    fn apply_multiple_disjoint() {
        let src = "line1\nline2\nline3\n";
        let reps = vec![
            Replacement::new(0, 5, "LINE1"),
            Replacement::new(6, 11, "LINE2"),
            Replacement::new(12, 17, "LINE3"),
        ];
        assert_eq!(apply_replacements(src, reps), "LINE1\nLINE2\nLINE3\n");
    }

    #[test]
    fn order_of_production_is_irrelevant() {
        let src = "aaa bbb ccc";
        let forward = vec![Replacement::new(0, 3, "x"), Replacement::new(8, 11, "y")];
        let backward = vec![Replacement::new(8, 11, "y"), Replacement::new(0, 3, "x")];
        assert_eq!(
            apply_replacements(src, forward),
            apply_replacements(src, backward)
        );
    }

    #[test]
    fn degenerate_spans_are_dropped() {
        let src = "abc";
        let reps = vec![
            Replacement::new(1, 1, "zzz"),
            Replacement::new(2, 1, "zzz"),
        ];
        assert_eq!(apply_replacements(src, reps), "abc");
    }

    #[test]
    fn out_of_bounds_spans_are_dropped() {
        let src = "abc";
        let reps = vec![Replacement::new(1, 10, "zzz")];
        assert_eq!(apply_replacements(src, reps), "abc");
    }

    #[test]
    fn overlapping_span_is_dropped_not_misapplied() {
        let src = "abcdef";
        // [2,5) wins (higher start applied first); [0,3) overlaps it and is dropped.
        let reps = vec![Replacement::new(0, 3, "X"), Replacement::new(2, 5, "Y")];
        assert_eq!(apply_replacements(src, reps), "abYf");
    }

    #[test]
    fn char_boundary_spans_are_dropped() {
        let src = "a\u{00e9}b"; // é is two bytes
        let reps = vec![Replacement::new(2, 3, "X")];
        assert_eq!(apply_replacements(src, reps), src);
    }

    #[test]
    fn atomic_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.js");
        std::fs::write(&path, "before").unwrap();

        atomic_write(&path, "after").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "after");
    }

    #[test]
    fn write_if_changed_skips_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.js");
        std::fs::write(&path, "same").unwrap();

        assert!(!write_if_changed(&path, "same", "same").unwrap());
        assert!(write_if_changed(&path, "same", "different").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "different");
    }

    proptest! {
        /// For disjoint spans over ASCII input, applying in any production
        /// order yields the same string.
        #[test]
        fn disjoint_application_is_order_independent(
            src in "[a-z ]{20,60}",
            cut_a in 0usize..10,
            cut_b in 12usize..19,
        ) {
            let reps = vec![
                Replacement::new(cut_a, cut_a + 2, "X"),
                Replacement::new(cut_b, cut_b + 1, "YY"),
            ];
            let mut reversed = reps.clone();
            reversed.reverse();
            prop_assert_eq!(
                apply_replacements(&src, reps),
                apply_replacements(&src, reversed)
            );
        }
    }
}
