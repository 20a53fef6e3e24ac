//! Timestamp rendering for stamped fields.
//!
//! Format strings use a small token mini-language (`yyyy`, `MM`, `dd`,
//! `HH`, `mm`, `ss`, ...) with single-quoted literal runs for non-token
//! text, e.g. the TeX directive `'\DTMdate{'yyyy-MM-dd'}'`. A doubled
//! quote `''` produces a literal quote character. Format strings are
//! compiled once at configuration-resolution time; rendering itself cannot
//! fail. An empty format string selects the ISO-8601 fallback.

use chrono::{DateTime, Local, SecondsFormat};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unknown format token {token:?}")]
    UnknownToken { token: String },

    #[error("unterminated quoted literal in format string")]
    UnterminatedLiteral,
}

/// A compiled timestamp format, ready to render instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampFormat {
    /// ISO-8601 with millisecond precision and local offset
    Iso,
    /// Token format lowered to a chrono strftime string
    Tokens(String),
}

impl TimestampFormat {
    /// Compile a token format string. Empty selects the ISO fallback;
    /// unknown tokens and unterminated literals are configuration errors.
    pub fn compile(spec: &str) -> Result<Self, FormatError> {
        if spec.is_empty() {
            return Ok(TimestampFormat::Iso);
        }

        let mut out = String::with_capacity(spec.len() + 8);
        let mut chars = spec.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    out.push('\'');
                    continue;
                }
                // Quoted literal run; `''` inside it is an escaped quote.
                let mut closed = false;
                while let Some(lc) = chars.next() {
                    if lc == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            push_literal(&mut out, '\'');
                        } else {
                            closed = true;
                            break;
                        }
                    } else {
                        push_literal(&mut out, lc);
                    }
                }
                if !closed {
                    return Err(FormatError::UnterminatedLiteral);
                }
            } else if c.is_ascii_alphabetic() {
                let mut token = String::new();
                token.push(c);
                while chars.peek() == Some(&c) {
                    chars.next();
                    token.push(c);
                }
                out.push_str(lower_token(&token)?);
            } else {
                push_literal(&mut out, c);
            }
        }

        Ok(TimestampFormat::Tokens(out))
    }

    /// Render an instant. Suffixes are appended by the caller; the format
    /// itself never carries one.
    pub fn render(&self, instant: DateTime<Local>) -> String {
        match self {
            TimestampFormat::Iso => instant.to_rfc3339_opts(SecondsFormat::Millis, false),
            TimestampFormat::Tokens(strftime) => instant.format(strftime).to_string(),
        }
    }
}

fn push_literal(out: &mut String, c: char) {
    // `%` starts a specifier in the lowered form, so escape it.
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

fn lower_token(token: &str) -> Result<&'static str, FormatError> {
    Ok(match token {
        "y" | "yyyy" => "%Y",
        "yy" => "%y",
        "M" => "%-m",
        "MM" => "%m",
        "MMM" => "%b",
        "MMMM" => "%B",
        "d" => "%-d",
        "dd" => "%d",
        "E" | "EEE" => "%a",
        "EEEE" => "%A",
        "H" => "%-H",
        "HH" => "%H",
        "h" => "%-I",
        "hh" => "%I",
        "m" => "%-M",
        "mm" => "%M",
        "s" => "%-S",
        "ss" => "%S",
        "SSS" => "%3f",
        "a" => "%p",
        "Z" | "ZZ" => "%:z",
        "ZZZ" => "%z",
        _ => {
            return Err(FormatError::UnknownToken {
                token: token.to_string(),
            })
        }
    })
}
