//! Read-only view of the document a host hands to one planning pass.

use std::path::Path;

/// Language kind of a document, as far as stamping cares: TeX-family
/// documents additionally get the creation-date directive check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Tex,
    Latex,
    DocTex,
    Plain,
}

impl DocumentKind {
    pub fn is_tex(self) -> bool {
        !matches!(self, DocumentKind::Plain)
    }

    /// Guess the kind from a file extension, for hosts without a richer
    /// language id (the CLI). Editors should map their own language ids.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("tex" | "ltx" | "latex") => DocumentKind::Latex,
            Some("dtx") => DocumentKind::DocTex,
            Some("sty" | "cls") => DocumentKind::Tex,
            _ => DocumentKind::Plain,
        }
    }
}

/// Borrowed document view for one pass: the planner only reads it and never
/// holds it past the end of the pass.
#[derive(Debug)]
pub struct DocumentView<'a> {
    pub file_name: &'a Path,
    pub kind: DocumentKind,
    pub lines: Vec<&'a str>,
}

impl<'a> DocumentView<'a> {
    pub fn new(file_name: &'a Path, kind: DocumentKind, lines: Vec<&'a str>) -> Self {
        Self {
            file_name,
            kind,
            lines,
        }
    }

    /// View over a full document text, split into lines. Terminators are
    /// stripped, so spans computed on these lines are valid columns for
    /// [`crate::apply_edits`].
    pub fn over(file_name: &'a Path, kind: DocumentKind, text: &'a str) -> Self {
        Self::new(file_name, kind, text.lines().collect())
    }
}
