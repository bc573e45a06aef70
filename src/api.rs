use crate::engine;
use crate::error::Result;
use crate::tree::{Collation, Element};

/// Line terminator used between directives, resets and simple-rule primaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreak {
    #[default]
    Lf,
    CrLf,
}

impl LineBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreak::Lf => "\n",
            LineBreak::CrLf => "\r\n",
        }
    }
}

/// Options that affect rule rendering.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub line_break: LineBreak,
}

/// Which rule dialect a [`Rules`] value is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Full ICU tailoring syntax.
    Icu,
    /// Operator-free simple rules.
    Simple,
}

/// Result of [`preferred_rules`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub dialect: Dialect,
    pub text: String,
}

/// Compile `collation` into ICU rule text.
///
/// # Example
/// ```
/// use ldml_collation::{Before, Collation, Payload, Relation, RuleItem, icu_rules};
///
/// let collation = Collation {
///     rules: Some(vec![
///         RuleItem::reset_before(Before::Primary, Payload::anchor("first_non_ignorable")),
///         RuleItem::relation(Relation::Primary, Payload::text("a")),
///     ]),
///     ..Default::default()
/// };
/// assert_eq!(icu_rules(&collation).unwrap(), "& [before 1] [first regular] < a");
/// ```
pub fn icu_rules(collation: &Collation) -> Result<String> {
    icu_rules_with(collation, &Options::default())
}

pub fn icu_rules_with(collation: &Collation, options: &Options) -> Result<String> {
    engine::compile(collation, options.line_break.as_str())
}

/// Reduce `collation` to the simple-rules dialect.
///
/// Returns `Ok(None)` when the tailoring cannot be expressed that way; the
/// caller should use [`icu_rules`] instead.
pub fn simple_rules(collation: &Collation) -> Result<Option<String>> {
    simple_rules_with(collation, &Options::default())
}

pub fn simple_rules_with(collation: &Collation, options: &Options) -> Result<Option<String>> {
    engine::reduce(collation, options.line_break.as_str())
}

/// Simple rules when representable, the full ICU rules otherwise.
pub fn preferred_rules(collation: &Collation) -> Result<Rules> {
    preferred_rules_with(collation, &Options::default())
}

pub fn preferred_rules_with(collation: &Collation, options: &Options) -> Result<Rules> {
    if let Some(text) = simple_rules_with(collation, options)? {
        return Ok(Rules { dialect: Dialect::Simple, text });
    }
    Ok(Rules { dialect: Dialect::Icu, text: icu_rules_with(collation, options)? })
}

/// Validate `element` as a `<collation>` and compile it to ICU rules.
pub fn icu_rules_from_element(element: &Element, options: &Options) -> Result<String> {
    icu_rules_with(&Collation::from_element(element)?, options)
}

/// Validate `element` as a `<collation>` and try the simple-rules reduction.
pub fn simple_rules_from_element(element: &Element, options: &Options) -> Result<Option<String>> {
    simple_rules_with(&Collation::from_element(element)?, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollationError;
    use crate::tree::{Before, Payload, Relation, RuleItem, Settings};
    use pretty_assertions::assert_eq;

    fn simple_shaped() -> Collation {
        Collation {
            rules: Some(vec![
                RuleItem::reset_before(Before::Primary, Payload::anchor("first_non_ignorable")),
                RuleItem::relation(Relation::Primary, Payload::text("a")),
                RuleItem::relation(Relation::Tertiary, Payload::text("x")),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn preferred_rules_picks_simple_when_possible() {
        let rules = preferred_rules(&simple_shaped()).unwrap();
        assert_eq!(rules, Rules { dialect: Dialect::Simple, text: "(a x)".to_string() });
    }

    #[test]
    fn preferred_rules_falls_back_to_icu() {
        let mut collation = simple_shaped();
        collation.settings = Some(Settings::new().with("strength", "tertiary"));

        let rules = preferred_rules(&collation).unwrap();
        assert_eq!(rules.dialect, Dialect::Icu);
        assert_eq!(rules.text, "[strength 3]\n& [before 1] [first regular] < a <<< x");
    }

    #[test]
    fn preferred_rules_propagates_structural_errors() {
        let mut collation = simple_shaped();
        collation.settings = Some(Settings::new().with("backwards", "sideways"));
        assert!(matches!(preferred_rules(&collation), Err(CollationError::InvalidBackwards { .. })));
    }

    #[test]
    fn options_select_line_break() {
        let mut collation = simple_shaped();
        collation.rules.as_mut().unwrap().push(RuleItem::relation(Relation::Primary, Payload::text("b")));
        let options = Options { line_break: LineBreak::CrLf };

        assert_eq!(simple_rules_with(&collation, &options).unwrap().as_deref(), Some("(a x)\r\nb"));
        assert_eq!(icu_rules_with(&collation, &options).unwrap(), "& [before 1] [first regular] < a <<< x < b");
    }

    #[test]
    fn element_entry_points_validate_root() {
        let err = icu_rules_from_element(&Element::new("rules"), &Options::default()).unwrap_err();
        assert!(matches!(err, CollationError::NotACollation { .. }));

        let element = Element::new("collation");
        assert_eq!(icu_rules_from_element(&element, &Options::default()).unwrap(), "");
        assert_eq!(simple_rules_from_element(&element, &Options::default()).unwrap().as_deref(), Some(""));
    }
}
