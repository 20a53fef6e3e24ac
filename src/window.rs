//! Line window selection - bounds how much of a document one pass scans.
//!
//! The window limit is signed: a positive limit scans that many lines from
//! the top of the document, a non-positive limit scans `|limit|` lines from
//! the bottom upward. Either way the result is clamped to the document, so
//! callers can index lines without further checks.

/// Select the line indices one pass visits, in scan order.
///
/// * `limit > 0`: `[0, min(limit, line_count))` ascending.
/// * `limit <= 0`: `[max(line_count + limit, 0), line_count)` descending.
///   A limit of zero produces an empty window.
pub fn select(limit: i64, line_count: usize) -> Vec<usize> {
    if limit > 0 {
        let upper = line_count.min(usize::try_from(limit).unwrap_or(usize::MAX));
        (0..upper).collect()
    } else {
        let lower = usize::try_from((line_count as i64).saturating_add(limit).max(0))
            .unwrap_or(line_count);
        (lower..line_count).rev().collect()
    }
}
