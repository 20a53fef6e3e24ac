//! Locating substitutable spans within a line using configured regexes.
//!
//! Two lookup modes, both pure functions of the line text: a delimited span
//! bounded by a start pattern and an end pattern, and the exact span of a
//! single pattern match. Both use leftmost-match semantics, so at most one
//! span per line per field is ever produced.

use crate::edit::Span;
use regex::Regex;

/// Find the span between the first `start` match and the first `end` match
/// after it.
///
/// The span begins where the start match ends; the end pattern is searched
/// only in the remainder of the line. Returns `None` when either pattern
/// fails to match. With the default end pattern `$` the end always matches
/// at the line's length, so an empty tail yields an empty span.
pub fn between(line: usize, text: &str, start: &Regex, end: &Regex) -> Option<Span> {
    let start_match = start.find(text)?;
    let span_start = start_match.end();
    let end_match = end.find(&text[span_start..])?;
    Some(Span::new(line, span_start, span_start + end_match.start()))
}

/// Find the exact span of the first `pattern` match on the line.
pub fn first_match(line: usize, text: &str, pattern: &Regex) -> Option<Span> {
    let m = pattern.find(text)?;
    Some(Span::new(line, m.start(), m.end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[test]
    fn empty_tail_yields_empty_span_at_line_end() {
        let span = between(0, "Created: ", &re("Created: "), &re("$")).unwrap();
        assert_eq!(span, Span::new(0, 9, 9));
        assert!(span.is_empty());
    }

    #[test]
    fn filled_tail_yields_span_over_existing_value() {
        let text = "Created: 2020/01/01 10:00:00 by alice";
        let span = between(0, text, &re("[cC]reated *: "), &re("$")).unwrap();
        assert_eq!(&text[span.start..span.end], "2020/01/01 10:00:00 by alice");
        assert!(!span.is_empty());
    }

    #[test]
    fn missing_start_pattern_yields_none() {
        assert_eq!(between(0, "no marker here", &re("Created: "), &re("$")), None);
    }

    #[test]
    fn custom_end_pattern_searched_after_start_only() {
        // The `|` before the marker must not terminate the span.
        let text = "| Created: stamp | trailing";
        let span = between(0, text, &re("Created: "), &re(" \\|")).unwrap();
        assert_eq!(&text[span.start..span.end], "stamp");
    }

    #[test]
    fn custom_end_pattern_without_match_yields_none() {
        let text = "Created: stamp with no terminator";
        assert_eq!(between(0, text, &re("Created: "), &re(" \\|")), None);
    }

    #[test]
    fn first_match_returns_exact_leftmost_span() {
        let text = "x XXX-DATE-WHEN-CREATED-XXX y XXX-DATE-WHEN-CREATED-XXX";
        let span = first_match(3, text, &re("XXX-DATE-WHEN-CREATED-XXX")).unwrap();
        assert_eq!(span, Span::new(3, 2, 27));
    }

    #[test]
    fn first_match_absent_yields_none() {
        assert_eq!(first_match(0, "plain text", &re("XXX-DATE-WHEN-CREATED-XXX")), None);
    }

    proptest! {
        #[test]
        fn spans_always_lie_within_the_line(text in ".{0,80}") {
            let start = re("[cC]reated *: ");
            let end = re("$");
            if let Some(span) = between(0, &text, &start, &end) {
                prop_assert!(span.start <= span.end);
                prop_assert!(span.end <= text.len());
                prop_assert!(text.is_char_boundary(span.start));
                prop_assert!(text.is_char_boundary(span.end));
            }
            if let Some(span) = first_match(0, &text, &start) {
                prop_assert!(span.start <= span.end);
                prop_assert!(span.end <= text.len());
            }
        }
    }
}
