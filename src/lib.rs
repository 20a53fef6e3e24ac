//! Autostamp: timestamp placeholder stamping for text documents on save
//!
//! Rewrites timestamp placeholders in a document immediately before it is
//! persisted: a creation stamp written once, a last-modified stamp refreshed
//! on every save, and an optional creation-date directive for TeX documents.
//!
//! # Architecture
//!
//! Every stamping operation compiles down to a single primitive: [`Edit`],
//! a verified replacement of a [`Span`] on one line. Intelligence lives in
//! span acquisition - a bounded line window ([`window::select`]), regex
//! delimiter lookups ([`extract`]) and per-field overwrite policy
//! ([`plan`]) - not in the application logic.
//!
//! The host (an editor integration, or the bundled CLI) supplies a
//! [`DocumentView`] and a [`TimeSource`], receives the edit list from
//! [`plan`], and commits it before the save proceeds. Configuration is a
//! lazily compiled, wholesale-invalidated snapshot held by
//! [`ConfigResolver`].
//!
//! # Safety
//!
//! - Every edit verifies its expected before-text when applied
//! - Atomic file writes (tempfile + fsync + rename)
//! - A bad setting disables its field for the pass, never the save
//! - Overlapping spans from pathological patterns are rejected
//!
//! # Example
//!
//! ```
//! use autostamp::{apply_edits, plan, ConfigResolver, DocumentKind, DocumentView, SystemTimeSource};
//! use std::path::Path;
//!
//! let text = "Created: \nLast-Modified: \nbody\n";
//! let doc = DocumentView::over(Path::new("notes.txt"), DocumentKind::Plain, text);
//!
//! let mut resolver = ConfigResolver::default();
//! let config = resolver.snapshot();
//!
//! let edits = plan(&doc, &config, &SystemTimeSource);
//! let stamped = apply_edits(text, &edits).unwrap();
//! # let _ = stamped;
//! ```

pub mod config;
pub mod document;
pub mod edit;
pub mod extract;
pub mod format;
pub mod planner;
pub mod time;
pub mod window;

// Re-exports
pub use config::{
    load_from_path, load_from_str, ConfigError, ConfigResolver, ConfigWarning, ResolvedConfig,
    Settings,
};
pub use document::{DocumentKind, DocumentView};
pub use edit::{apply_edits, write_document, Edit, EditError, Span};
pub use format::{FormatError, TimestampFormat};
pub use planner::plan;
pub use time::{SystemTimeSource, TimeSource};
