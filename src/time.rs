//! The two blocking external reads a pass performs: the wall clock and the
//! file-creation instant. Kept behind a trait so hosts and tests can supply
//! their own clocks.

use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

pub trait TimeSource {
    /// Current wall-clock instant. Read once per planning pass so every
    /// modified-time field in the pass carries the same stamp.
    fn now(&self) -> DateTime<Local>;

    /// Creation instant of the file backing a document, or `None` when the
    /// metadata is unavailable (no backing file yet, or a filesystem that
    /// records no birth time). Absence disables creation-time fields for
    /// the pass; it is never an error.
    fn created(&self, path: &Path) -> Option<DateTime<Local>>;
}

/// [`TimeSource`] backed by the system clock and filesystem metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn created(&self, path: &Path) -> Option<DateTime<Local>> {
        let metadata = fs::metadata(path).ok()?;
        metadata.created().ok().map(DateTime::<Local>::from)
    }
}
