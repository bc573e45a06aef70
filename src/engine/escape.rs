//! ICU literal escaping.
//!
//! ICU rule syntax only requires quoting whitespace and ASCII characters that
//! are not letters or digits. Runs of such characters share one `'...'`
//! span, and a quote met inside a span is doubled. Outside a span, input that
//! is already escaped (`\x`, `'x`) is passed through untouched, as are
//! fixed-width Unicode escapes (`\uXXXX`, `\UXXXXXXXX`), so that re-escaping
//! compiled data is stable.

use once_cell::sync::Lazy;
use regex::Regex;

const LONG_ESCAPE_LEN: usize = 10; // backslash, U, 8 hex digits

/// Either escape form; the eight-digit form wins at the same offset.
static UNICODE_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\\u(?:([0-9a-f]{8})|([0-9a-f]{4}))").unwrap());

/// Whether `ch` must be quoted in ICU rule text.
pub(crate) fn needs_escaping(ch: char) -> bool {
    ((ch as u32) < 0x7F && !ch.is_ascii_alphanumeric()) || ch.is_whitespace()
}

/// Escape arbitrary text for use as an ICU rule literal.
pub fn escape_for_icu(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    let mut quoting = false;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !quoting && matches!(ch, '\\' | '\'') {
            if let Some(&(_, next)) = chars.peek() {
                if needs_escaping(next) {
                    out.push(ch);
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }

        if let Some(len) = unicode_escape_len(&text[idx..]) {
            out.push_str(&text[idx..idx + len]);
            // Escape sequences are pure ASCII, so `len` bytes is `len` chars.
            for _ in 1..len {
                chars.next();
            }
            continue;
        }

        escape_scalar(ch, &mut quoting, &mut out);
    }

    if quoting {
        out.push('\'');
    }
    out
}

/// Escape a single scalar value as a self-contained literal.
pub(crate) fn escape_char(ch: char) -> String {
    let mut out = String::with_capacity(4);
    let mut quoting = false;
    escape_scalar(ch, &mut quoting, &mut out);
    if quoting {
        out.push('\'');
    }
    out
}

fn escape_scalar(ch: char, quoting: &mut bool, out: &mut String) {
    if needs_escaping(ch) {
        if *quoting {
            // Inside a span a quote is written twice; the span stays open.
            if ch == '\'' {
                out.push('\'');
            }
        } else {
            // A lone quote is doubled rather than opening a span.
            if ch != '\'' {
                *quoting = true;
            }
            out.push('\'');
        }
        out.push(ch);
    } else {
        if *quoting {
            *quoting = false;
            out.push('\'');
        }
        out.push(ch);
    }
}

/// Length of the Unicode escape starting at the beginning of `rest`, if any.
fn unicode_escape_len(rest: &str) -> Option<usize> {
    let mut end = rest.len().min(LONG_ESCAPE_LEN);
    while !rest.is_char_boundary(end) {
        end -= 1;
    }
    UNICODE_ESCAPE.find(&rest[..end]).filter(|m| m.start() == 0).map(|m| m.end())
}

/// Replace `\UXXXXXXXX` and `\uXXXX` escapes with the characters they name.
///
/// Both forms are matched in a single pass. Escapes that do not name a
/// Unicode scalar value are left as written and never re-read as a shorter
/// escape.
pub fn replace_unicode_escapes(rules: &str) -> String {
    UNICODE_ESCAPE.replace_all(rules, decode_escape).into_owned()
}

fn decode_escape(caps: &regex::Captures<'_>) -> String {
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok())
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_else(|| caps[0].to_string())
}
