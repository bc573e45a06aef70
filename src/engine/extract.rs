//! Rule payload extraction.
//!
//! Turns a [`Payload`] into either raw text (code points decoded) or ICU-ready
//! data (escaped text, or a bracketed indirect position).

use super::escape::escape_for_icu;
use crate::error::{CollationError, Result};
use crate::tree::Payload;

/// Decode one hexadecimal code point reference. An empty reference decodes to
/// nothing.
pub(crate) fn decode_code_point(element: &str, hex: &str) -> Result<String> {
    if hex.is_empty() {
        return Ok(String::new());
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CollationError::InvalidHex { element: element.to_string(), hex: hex.to_string() });
    }
    let value = u32::from_str_radix(hex, 16)
        .map_err(|_| CollationError::InvalidHex { element: element.to_string(), hex: hex.to_string() })?;
    char::from_u32(value)
        .map(String::from)
        .ok_or_else(|| CollationError::InvalidCodePoint { element: element.to_string(), value })
}

/// Raw text of a payload, with code point references decoded.
pub(crate) fn text_data(element: &str, payload: &Payload) -> Result<String> {
    match payload {
        Payload::Text(text) => Ok(text.clone()),
        Payload::CodePoints(hex) => {
            let mut text = String::with_capacity(hex.len() * 2);
            for h in hex {
                text.push_str(&decode_code_point(element, h)?);
            }
            Ok(text)
        }
        Payload::Anchor(name) => {
            Err(CollationError::UnexpectedElement { element: element.to_string(), name: name.clone() })
        }
    }
}

/// ICU-ready data for a payload: an indirect position, or escaped text.
pub(crate) fn icu_data(element: &str, payload: &Payload) -> Result<String> {
    match payload {
        Payload::Anchor(name) => Ok(indirect_position(name)),
        Payload::Text(text) if text.is_empty() => Err(CollationError::EmptyRule { element: element.to_string() }),
        Payload::CodePoints(hex) if hex.is_empty() => {
            Err(CollationError::EmptyRule { element: element.to_string() })
        }
        _ => Ok(escape_for_icu(&text_data(element, payload)?)),
    }
}

/// Render an indirect position anchor, e.g. `first_non_ignorable` as
/// `[first regular]`.
pub(crate) fn indirect_position(name: &str) -> String {
    match name {
        "first_non_ignorable" => "[first regular]".to_string(),
        "last_non_ignorable" => "[last regular]".to_string(),
        other => format!("[{}]", other.replace('_', " ")),
    }
}

/// Decode a `variableTop` setting: `u`-separated hexadecimal code points.
pub(crate) fn decode_variable_top(value: &str) -> Result<String> {
    let mut text = String::new();
    for hex in value.split('u').filter(|h| !h.is_empty()) {
        text.push_str(&decode_code_point("settings", hex)?);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_code_points() {
        assert_eq!(decode_code_point("cp", "41").unwrap(), "A");
        assert_eq!(decode_code_point("cp", "1d11e").unwrap(), "\u{1D11E}");
        assert_eq!(decode_code_point("cp", "").unwrap(), "");
    }

    #[test]
    fn rejects_malformed_hex() {
        for hex in ["zz", "+41", "0x41", " 41"] {
            let err = decode_code_point("cp", hex).unwrap_err();
            assert!(matches!(err, CollationError::InvalidHex { .. }), "{hex}");
        }
        let err = decode_code_point("cp", "123456789").unwrap_err();
        assert!(matches!(err, CollationError::InvalidHex { .. }));
    }

    #[test]
    fn rejects_non_scalar_values() {
        let err = decode_code_point("pc", "D800").unwrap_err();
        assert!(matches!(err, CollationError::InvalidCodePoint { value: 0xD800, ref element } if element == "pc"));
        let err = decode_code_point("pc", "110000").unwrap_err();
        assert!(matches!(err, CollationError::InvalidCodePoint { value: 0x110000, .. }));
    }

    #[test]
    fn text_data_concatenates_code_points() {
        let payload = Payload::code_points(["61", "", "300"]);
        assert_eq!(text_data("p", &payload).unwrap(), "a\u{300}");
        assert_eq!(text_data("p", &Payload::text("a b")).unwrap(), "a b");
    }

    #[test]
    fn icu_data_escapes_text_and_renders_anchors() {
        assert_eq!(icu_data("p", &Payload::text("a b")).unwrap(), "a' 'b");
        assert_eq!(icu_data("p", &Payload::code_points(["26"])).unwrap(), "'&'");
        assert_eq!(icu_data("reset", &Payload::anchor("first_non_ignorable")).unwrap(), "[first regular]");
        assert_eq!(icu_data("reset", &Payload::anchor("last_non_ignorable")).unwrap(), "[last regular]");
        assert_eq!(icu_data("reset", &Payload::anchor("last_trailing")).unwrap(), "[last trailing]");
    }

    #[test]
    fn icu_data_rejects_empty_payloads() {
        let err = icu_data("t", &Payload::text("")).unwrap_err();
        assert!(matches!(err, CollationError::EmptyRule { element } if element == "t"));
        let err = icu_data("t", &Payload::CodePoints(Vec::new())).unwrap_err();
        assert!(matches!(err, CollationError::EmptyRule { .. }));
    }

    #[test]
    fn decodes_variable_top() {
        assert_eq!(decode_variable_top("u41u300").unwrap(), "A\u{300}");
        assert_eq!(decode_variable_top("20").unwrap(), " ");
        assert!(decode_variable_top("uzz").is_err());
    }
}
