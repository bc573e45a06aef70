//! Simple-rules reducer.
//!
//! The simple dialect has no operators: a line break starts a new primary,
//! a space separates secondaries, and a parenthesised group holds tertiary
//! variants of the token that opened it:
//!
//! ```text
//! & [before 1] [first regular] < a << b <<< B < c     (ICU)
//! a (b B)                                             (simple)
//! c
//! ```
//!
//! Only a narrow shape of rule body can be expressed this way. Anything else
//! yields `Ok(None)` so the caller falls back to the full compiler.
//!
//! Text is emitted raw, without ICU escaping. Data containing separators
//! (spaces, parentheses, line breaks) is not representable faithfully in this
//! dialect and is passed through as is.

use super::extract::{icu_data, text_data};
use crate::error::Result;
use crate::tree::{Before, Collation, Relation, RuleItem};
use tracing::debug;

/// Rendering state: output plus the open-tertiary-group flag.
struct SimpleWriter<'a> {
    line_break: &'a str,
    out: String,
    in_group: bool,
}

impl<'a> SimpleWriter<'a> {
    fn new(line_break: &'a str) -> Self {
        SimpleWriter { line_break, out: String::new(), in_group: false }
    }

    fn end_group(&mut self) {
        if self.in_group {
            self.out.push(')');
            self.in_group = false;
        }
    }

    /// Open a group around the most recent token by inserting `(` right after
    /// the last separator.
    fn begin_group(&mut self) {
        if self.in_group {
            return;
        }
        self.in_group = true;
        let after_line = self.out.rfind(self.line_break).map_or(0, |idx| idx + self.line_break.len());
        let after_space = self.out.rfind(' ').map_or(0, |idx| idx + 1);
        self.out.insert(after_line.max(after_space), '(');
    }

    fn push(&mut self, relation: Relation, text: &str) {
        match relation {
            Relation::Primary => {
                self.end_group();
                self.out.push_str(self.line_break);
            }
            Relation::Secondary => {
                self.end_group();
                self.out.push(' ');
            }
            Relation::Tertiary => {
                self.begin_group();
                self.out.push(' ');
            }
            // Rejected before rendering.
            Relation::Identical => {}
        }
        self.out.push_str(text);
    }

    fn push_each(&mut self, relation: Relation, text: &str) {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.push(relation, ch.encode_utf8(&mut buf));
        }
    }

    fn finish(mut self) -> String {
        self.end_group();
        self.out.trim().to_string()
    }
}

/// Reduce a collation tree to simple rules, or `None` if it cannot be
/// expressed in that dialect.
pub(crate) fn reduce(collation: &Collation, line_break: &str) -> Result<Option<String>> {
    if collation.settings.is_some() {
        debug!("simple rules not representable: collation has settings");
        return Ok(None);
    }

    let Some((first, rest)) = collation.rules.as_deref().and_then(<[RuleItem]>::split_first) else {
        return Ok(Some(String::new()));
    };

    if !is_first_regular_reset(first)? {
        debug!(element = first.element_name(), "simple rules not representable: unsupported first rule");
        return Ok(None);
    }

    let mut writer = SimpleWriter::new(line_break);
    for item in rest {
        let element = item.element_name();
        match item {
            RuleItem::Relation { relation, data } if *relation != Relation::Identical => {
                writer.push(*relation, &text_data(element, data)?);
            }
            RuleItem::Concat { relation, data } if *relation != Relation::Identical => {
                writer.push_each(*relation, &text_data(element, data)?);
            }
            _ => {
                debug!(element, "simple rules not representable: unsupported rule element");
                return Ok(None);
            }
        }
    }

    Ok(Some(writer.finish()))
}

/// The body must open with `& [before 1] [first regular]`.
fn is_first_regular_reset(item: &RuleItem) -> Result<bool> {
    match item {
        RuleItem::Reset { before: Some(Before::Primary), target } => {
            Ok(icu_data(item.element_name(), target)? == "[first regular]")
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ExtendedRule, Payload, Settings};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn first_regular() -> RuleItem {
        RuleItem::reset_before(Before::Primary, Payload::anchor("first_non_ignorable"))
    }

    fn item(relation: Relation, text: &str) -> RuleItem {
        RuleItem::relation(relation, Payload::text(text))
    }

    fn reduce_body(items: Vec<RuleItem>) -> Option<String> {
        reduce(&Collation { rules: Some(items), ..Default::default() }, "\n").unwrap()
    }

    #[test]
    fn missing_or_empty_body_is_empty() {
        assert_eq!(reduce(&Collation::default(), "\n").unwrap(), Some(String::new()));
        assert_eq!(reduce_body(Vec::new()), Some(String::new()));
        assert_eq!(reduce_body(vec![first_regular()]), Some(String::new()));
    }

    #[test]
    fn settings_are_not_representable() {
        let collation = Collation { settings: Some(Settings::new()), ..Default::default() };
        assert_eq!(reduce(&collation, "\n").unwrap(), None);
    }

    #[test]
    fn renders_primary_lines_and_secondaries() {
        let out = reduce_body(vec![
            first_regular(),
            item(Relation::Primary, "a"),
            item(Relation::Secondary, "á"),
            item(Relation::Primary, "b"),
        ]);
        assert_eq!(out.as_deref(), Some("a á\nb"));
    }

    #[test]
    fn tertiary_opens_group_around_previous_token() {
        let out = reduce_body(vec![first_regular(), item(Relation::Primary, "a"), item(Relation::Tertiary, "x")]);
        assert_eq!(out.as_deref(), Some("(a x)"));

        let out = reduce_body(vec![
            first_regular(),
            item(Relation::Primary, "a"),
            item(Relation::Tertiary, "A"),
            item(Relation::Secondary, "á"),
            item(Relation::Tertiary, "Á"),
            item(Relation::Tertiary, "ª"),
            item(Relation::Primary, "b"),
        ]);
        assert_eq!(out.as_deref(), Some("(a A) (á Á ª)\nb"));
    }

    #[test]
    fn concat_items_emit_one_separator_per_scalar() {
        let out = reduce_body(vec![
            first_regular(),
            RuleItem::concat(Relation::Primary, Payload::text("ab")),
            RuleItem::concat(Relation::Secondary, Payload::code_points(["63", "1D11E"])),
            RuleItem::concat(Relation::Tertiary, Payload::text("DE")),
        ]);
        assert_eq!(out.as_deref(), Some("a\nb c (\u{1D11E} D E)"));
    }

    #[test]
    fn crlf_line_breaks_are_searched_for_groups() {
        let collation = Collation {
            rules: Some(vec![first_regular(), item(Relation::Primary, "a"), item(Relation::Tertiary, "A")]),
            ..Default::default()
        };
        assert_eq!(reduce(&collation, "\r\n").unwrap().as_deref(), Some("(a A)"));
    }

    #[test]
    fn rejects_wrong_first_item() {
        assert_eq!(reduce_body(vec![item(Relation::Primary, "a")]), None);
        assert_eq!(reduce_body(vec![RuleItem::reset(Payload::anchor("first_non_ignorable"))]), None);
        assert_eq!(
            reduce_body(vec![RuleItem::reset_before(Before::Primary, Payload::anchor("last_non_ignorable"))]),
            None
        );
        assert_eq!(reduce_body(vec![RuleItem::reset_before(Before::Primary, Payload::text("a"))]), None);
    }

    #[test]
    fn text_is_not_escaped() {
        let out = reduce_body(vec![first_regular(), item(Relation::Primary, "-"), item(Relation::Secondary, "'")]);
        assert_eq!(out.as_deref(), Some("- '"));
    }

    fn disallowed() -> impl Strategy<Value = RuleItem> {
        prop_oneof![
            Just(item(Relation::Identical, "z")),
            Just(RuleItem::concat(Relation::Identical, Payload::text("yz"))),
            Just(RuleItem::Extended(ExtendedRule {
                context: None,
                relation: Relation::Primary,
                data: Payload::text("z"),
                extend: None,
            })),
            Just(RuleItem::reset(Payload::text("z"))),
            Just(first_regular()),
        ]
    }

    fn allowed() -> impl Strategy<Value = RuleItem> {
        let relation = prop_oneof![Just(Relation::Primary), Just(Relation::Secondary), Just(Relation::Tertiary)];
        (relation, "[a-z]{1,3}", any::<bool>()).prop_map(|(relation, text, concat)| {
            if concat {
                RuleItem::concat(relation, Payload::text(text))
            } else {
                RuleItem::relation(relation, Payload::text(text))
            }
        })
    }

    proptest! {
        #[test]
        fn allowed_bodies_always_reduce(items in prop::collection::vec(allowed(), 0..12)) {
            let mut body = vec![first_regular()];
            body.extend(items);
            prop_assert!(reduce_body(body).is_some());
        }

        #[test]
        fn any_disallowed_item_rejects_the_body(
            items in prop::collection::vec(allowed(), 0..8),
            bad in disallowed(),
            at in any::<prop::sample::Index>(),
        ) {
            let mut body = vec![first_regular()];
            body.extend(items);
            let pos = 1 + at.index(body.len());
            body.insert(pos, bad);
            prop_assert_eq!(reduce_body(body), None);
        }
    }
}
