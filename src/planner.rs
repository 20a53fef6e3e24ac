//! One planning pass: decide which timestamp fields on which lines get
//! rewritten, and produce the ordered edit list for the host to apply.
//!
//! The three field kinds run as independent checks per scanned line. Birth
//! stamps are write-once (only an empty delimited range is filled), the TeX
//! creation directive is a one-shot placeholder substitution, and modified
//! stamps are refreshed on every pass. A failure confined to one field -
//! a disabled pattern, missing creation metadata - never blocks the others.

use crate::config::{DelimitedField, ResolvedConfig};
use crate::document::{DocumentKind, DocumentView};
use crate::edit::Edit;
use crate::extract;
use crate::format::TimestampFormat;
use crate::time::TimeSource;
use crate::window;
use chrono::{DateTime, Local};
use regex::Regex;

/// The timestamp-bearing field kinds, in per-line check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Birth,
    TexCreation,
    Modified,
}

impl FieldKind {
    /// Whether an existing value between the delimiters is replaced.
    /// Birth stamps never clobber what is already written.
    fn overwrites_existing(self) -> bool {
        !matches!(self, FieldKind::Birth)
    }

    /// Whether the field stamps the file-creation instant (as opposed to
    /// the current wall clock).
    fn uses_creation_instant(self) -> bool {
        !matches!(self, FieldKind::Modified)
    }
}

enum Lookup<'c> {
    Delimited(&'c DelimitedField),
    Pattern(&'c Regex),
}

/// One field check of the pass: kind, span lookup, and rendering.
struct FieldCheck<'c> {
    kind: FieldKind,
    lookup: Lookup<'c>,
    format: &'c TimestampFormat,
    suffix: &'c str,
}

/// Build the field table for a pass. Fields whose patterns or formats were
/// disabled at resolution drop out here; the TeX check only exists for
/// TeX-family documents.
fn field_checks<'c>(config: &'c ResolvedConfig, kind: DocumentKind) -> Vec<FieldCheck<'c>> {
    let mut checks = Vec::with_capacity(3);

    if let (Some(field), Some(format)) = (config.birth.as_ref(), config.stamp_format.as_ref()) {
        checks.push(FieldCheck {
            kind: FieldKind::Birth,
            lookup: Lookup::Delimited(field),
            format,
            suffix: &config.suffix,
        });
    }

    if kind.is_tex() {
        if let (Some(pattern), Some(format)) =
            (config.tex_placeholder.as_ref(), config.tex_format.as_ref())
        {
            checks.push(FieldCheck {
                kind: FieldKind::TexCreation,
                lookup: Lookup::Pattern(pattern),
                format,
                suffix: "",
            });
        }
    }

    if let (Some(field), Some(format)) = (config.modified.as_ref(), config.stamp_format.as_ref()) {
        checks.push(FieldCheck {
            kind: FieldKind::Modified,
            lookup: Lookup::Delimited(field),
            format,
            suffix: &config.suffix,
        });
    }

    checks
}

/// Run one planning pass over a document.
///
/// Returns the ordered edits for the host to apply atomically before the
/// save completes; an empty list means nothing to stamp. The document is
/// only read - all spans refer to the original, pre-edit line text.
pub fn plan(doc: &DocumentView<'_>, config: &ResolvedConfig, time: &dyn TimeSource) -> Vec<Edit> {
    let Some(filter) = config.filename_pattern.as_ref() else {
        // Malformed filename pattern: scanning is disabled for the pass.
        return Vec::new();
    };
    if !filter.is_match(&doc.file_name.to_string_lossy()) {
        return Vec::new();
    }

    let checks = field_checks(config, doc.kind);
    if checks.is_empty() {
        return Vec::new();
    }

    // Wall clock read once per pass so every modified stamp agrees.
    let now = time.now();
    // Creation metadata read lazily and at most once per pass.
    let mut created: Option<Option<DateTime<Local>>> = None;

    let mut edits = Vec::new();
    for line in window::select(config.line_limit, doc.lines.len()) {
        let text = doc.lines[line];

        for check in &checks {
            let span = match check.lookup {
                Lookup::Delimited(field) => extract::between(line, text, &field.start, &field.end),
                Lookup::Pattern(pattern) => extract::first_match(line, text, pattern),
            };
            let Some(span) = span else { continue };

            if !check.kind.overwrites_existing() && !span.is_empty() {
                continue;
            }

            let instant = if check.kind.uses_creation_instant() {
                match *created.get_or_insert_with(|| time.created(doc.file_name)) {
                    Some(instant) => instant,
                    // Metadata unavailable: skip the field, never fault.
                    None => continue,
                }
            } else {
                now
            };

            let mut stamp = check.format.render(instant);
            stamp.push_str(check.suffix);
            edits.push(Edit::replacing(span, text, stamp));
        }
    }

    edits
}
