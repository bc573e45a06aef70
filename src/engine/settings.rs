//! Settings and option directives.
//!
//! `<settings>` attributes become bracketed ICU directives, one per line, in
//! document order. Unknown attributes are skipped. `variableTop` emits no
//! directive of its own; it yields the escaped target the compiler later
//! looks for in the rule body.

use super::escape::escape_for_icu;
use super::extract::decode_variable_top;
use crate::error::{CollationError, Result};
use crate::tree::Settings;

/// Output of [`settings_directives`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SettingsBlock {
    pub directives: String,
    /// Escaped variable-top text, if `variableTop` was given.
    pub variable_top: Option<String>,
}

pub(crate) fn settings_directives(settings: &Settings, line_break: &str) -> Result<SettingsBlock> {
    let mut block = SettingsBlock::default();

    for (name, value) in &settings.attributes {
        let directive = match name.as_str() {
            "alternate" | "normalization" | "caseLevel" | "caseFirst" | "numeric" => format!("[{name} {value}]"),
            "strength" => format!("[strength {}]", strength_level(value)?),
            "backwards" => format!("[backwards {}]", backwards_level(value)?),
            "hiraganaQuaternary" => format!("[hiraganaQ {value}]"),
            "variableTop" => {
                block.variable_top = Some(escape_for_icu(&decode_variable_top(value)?));
                continue;
            }
            _ => continue,
        };
        block.directives.push_str(line_break);
        block.directives.push_str(&directive);
    }

    Ok(block)
}

fn strength_level(value: &str) -> Result<&'static str> {
    match value {
        "primary" => Ok("1"),
        "secondary" => Ok("2"),
        "tertiary" => Ok("3"),
        "quaternary" => Ok("4"),
        "identical" => Ok("I"),
        _ => Err(CollationError::InvalidStrength { value: value.to_string() }),
    }
}

fn backwards_level(value: &str) -> Result<&'static str> {
    match value {
        "off" => Ok("1"),
        "on" => Ok("2"),
        _ => Err(CollationError::InvalidBackwards { value: value.to_string() }),
    }
}

/// `[suppress_contractions ..]` / `[optimize ..]` directive.
pub(crate) fn option_directive(name: &str, value: &str, line_break: &str) -> String {
    format!("{line_break}[{name} {value}]")
}
