//! The fundamental edit primitive: verified replacement of a span on a line.
//!
//! Planning produces a list of [`Edit`]s; nothing changes until a host (or
//! [`apply_edits`]) splices them into the document text. All spans are
//! computed against the original, pre-edit line text, so application runs
//! right-to-left within a line to keep earlier spans valid.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Half-open byte range within a single line of a document.
///
/// `start` and `end` are byte columns into the line's text, which carries no
/// line terminator. A span never crosses a line boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// 0-based line index within the document
    pub line: usize,
    /// Starting byte column (inclusive)
    pub start: usize,
    /// Ending byte column (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    /// An empty span marks a position with nothing written between the
    /// delimiters yet.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single planned text replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an Edit does nothing until it is applied"]
pub struct Edit {
    pub span: Span,
    /// Replacement text for the span
    pub new_text: String,
    /// Text the span covered when the edit was planned; application verifies
    /// this still holds before splicing.
    pub expected_before: String,
}

impl Edit {
    /// Build an edit replacing `span` within `line_text`.
    ///
    /// Captures the current span contents for before-text verification.
    /// The span must lie within `line_text` (always true for spans produced
    /// by the extractor on that same line).
    pub fn replacing(span: Span, line_text: &str, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
            expected_before: line_text[span.start..span.end].to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("edit targets line {line} but document has {line_count} lines")]
    LineOutOfBounds { line: usize, line_count: usize },

    #[error("invalid span {start}..{end} on line {line} of length {line_len}")]
    SpanOutOfBounds {
        line: usize,
        start: usize,
        end: usize,
        line_len: usize,
    },

    #[error("before-text mismatch on line {line}: expected {expected:?}, found {found:?}")]
    BeforeTextMismatch {
        line: usize,
        expected: String,
        found: String,
    },

    #[error(
        "overlapping spans on line {line}: {first_start}..{first_end} and {second_start}..{second_end}"
    )]
    OverlappingSpans {
        line: usize,
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Apply a batch of edits to a document's full text.
///
/// Edits may arrive in any order; within a line they are applied
/// right-to-left so span columns stay valid. Line terminators (`\n` or
/// `\r\n`) are preserved untouched. Overlapping spans on one line are a
/// configuration problem and are rejected rather than silently resolved.
pub fn apply_edits(text: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(text.to_string());
    }

    let mut by_line: BTreeMap<usize, Vec<&Edit>> = BTreeMap::new();
    for edit in edits {
        by_line.entry(edit.span.line).or_default().push(edit);
    }

    // Sort each line's edits rightmost-first and reject overlap up front.
    for (line, list) in by_line.iter_mut() {
        list.sort_by(|a, b| b.span.start.cmp(&a.span.start));
        for pair in list.windows(2) {
            let (later, earlier) = (&pair[0], &pair[1]);
            if earlier.span.end > later.span.start {
                return Err(EditError::OverlappingSpans {
                    line: *line,
                    first_start: earlier.span.start,
                    first_end: earlier.span.end,
                    second_start: later.span.start,
                    second_end: later.span.end,
                });
            }
        }
    }

    let mut out = String::with_capacity(text.len() + 64);
    let mut line_idx = 0usize;

    for raw in text.split_inclusive('\n') {
        match by_line.get(&line_idx) {
            None => out.push_str(raw),
            Some(list) => {
                let (content, terminator) = split_line_terminator(raw);
                let mut line = content.to_string();
                for edit in list {
                    let Span { start, end, .. } = edit.span;
                    if start > end
                        || end > line.len()
                        || !line.is_char_boundary(start)
                        || !line.is_char_boundary(end)
                    {
                        return Err(EditError::SpanOutOfBounds {
                            line: line_idx,
                            start,
                            end,
                            line_len: line.len(),
                        });
                    }
                    // Prior splices were strictly to the right, so this slice
                    // still reflects the original text.
                    let found = &line[start..end];
                    if found != edit.expected_before {
                        return Err(EditError::BeforeTextMismatch {
                            line: line_idx,
                            expected: edit.expected_before.clone(),
                            found: found.to_string(),
                        });
                    }
                    line.replace_range(start..end, &edit.new_text);
                }
                out.push_str(&line);
                out.push_str(terminator);
            }
        }

        line_idx += 1;
    }

    if let Some((&line, _)) = by_line.range(line_idx..).next() {
        return Err(EditError::LineOutOfBounds {
            line,
            line_count: line_idx,
        });
    }

    Ok(out)
}

fn split_line_terminator(raw: &str) -> (&str, &str) {
    if let Some(stripped) = raw.strip_suffix("\r\n") {
        (stripped, "\r\n")
    } else if let Some(stripped) = raw.strip_suffix('\n') {
        (stripped, "\n")
    } else {
        (raw, "")
    }
}

/// Write new document contents atomically: tempfile + fsync + rename,
/// followed by an mtime touch so downstream watchers see the change.
///
/// Either the full write succeeds or the original file is left intact.
pub fn write_document(path: &Path, contents: &str) -> Result<(), EditError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    let now = filetime::FileTime::now();
    filetime::set_file_mtime(path, now)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(line: usize, start: usize, end: usize, text: &str, before: &str) -> Edit {
        Edit {
            span: Span::new(line, start, end),
            new_text: text.to_string(),
            expected_before: before.to_string(),
        }
    }

    #[test]
    fn empty_edit_list_is_identity() {
        assert_eq!(apply_edits("a\nb\n", &[]).unwrap(), "a\nb\n");
    }

    #[test]
    fn replaces_span_on_one_line() {
        let text = "Created: \nbody\n";
        let edits = vec![edit(0, 9, 9, "2020/01/01 10:00:00", "")];
        assert_eq!(
            apply_edits(text, &edits).unwrap(),
            "Created: 2020/01/01 10:00:00\nbody\n"
        );
    }

    #[test]
    fn applies_multiple_edits_on_one_line_in_any_order() {
        let text = "aa bb cc";
        let edits = vec![
            edit(0, 0, 2, "XX", "aa"),
            edit(0, 6, 8, "ZZ", "cc"),
            edit(0, 3, 5, "YY", "bb"),
        ];
        assert_eq!(apply_edits(text, &edits).unwrap(), "XX YY ZZ");
    }

    #[test]
    fn preserves_crlf_terminators() {
        let text = "Created: \r\nnext\r\n";
        let edits = vec![edit(0, 9, 9, "now", "")];
        assert_eq!(apply_edits(text, &edits).unwrap(), "Created: now\r\nnext\r\n");
    }

    #[test]
    fn preserves_missing_final_newline() {
        let text = "one\ntwo";
        let edits = vec![edit(1, 0, 3, "TWO", "two")];
        assert_eq!(apply_edits(text, &edits).unwrap(), "one\nTWO");
    }

    #[test]
    fn rejects_overlapping_spans() {
        let text = "abcdef";
        let edits = vec![edit(0, 0, 4, "x", "abcd"), edit(0, 2, 6, "y", "cdef")];
        assert!(matches!(
            apply_edits(text, &edits),
            Err(EditError::OverlappingSpans { line: 0, .. })
        ));
    }

    #[test]
    fn rejects_before_text_mismatch() {
        let text = "hello world";
        let edits = vec![edit(0, 0, 5, "howdy", "jello")];
        assert!(matches!(
            apply_edits(text, &edits),
            Err(EditError::BeforeTextMismatch { line: 0, .. })
        ));
    }

    #[test]
    fn rejects_line_out_of_bounds() {
        let edits = vec![edit(5, 0, 0, "x", "")];
        assert!(matches!(
            apply_edits("only\n", &edits),
            Err(EditError::LineOutOfBounds { line: 5, .. })
        ));
    }

    #[test]
    fn rejects_span_past_line_end() {
        let edits = vec![edit(0, 2, 10, "x", "")];
        assert!(matches!(
            apply_edits("abc\n", &edits),
            Err(EditError::SpanOutOfBounds { line: 0, .. })
        ));
    }

    #[test]
    fn replacing_captures_expected_before_text() {
        let line = "Last-Modified: old stamp";
        let e = Edit::replacing(Span::new(0, 15, 24), line, "new stamp");
        assert_eq!(e.expected_before, "old stamp");
        assert_eq!(e.new_text, "new stamp");
    }

    #[test]
    fn write_document_replaces_contents_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "before").unwrap();

        write_document(&path, "after").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "after");
    }
}
