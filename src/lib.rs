//! LDML collation to ICU rule compiler.
//!
//! Takes the `<collation>` subtree of an LDML document and produces either:
//!
//! - full ICU tailoring rules ([`icu_rules`]), or
//! - the operator-free simple-rules dialect ([`simple_rules`]) when the
//!   tailoring is narrow enough to be expressed that way.
//!
//! [`preferred_rules`] tries the simple form first and falls back to ICU.
//!
//! The input is a typed [`Collation`], built either directly or from a
//! generic [`Element`] tree via [`Collation::from_element`]. Parsing XML text
//! is left to the caller; [`parse_collation_xml`] is a thin `roxmltree`
//! adapter for convenience.

mod api;
mod engine;
mod error;
mod tree;
mod xml;

pub use api::{
    Dialect, LineBreak, Options, Rules, icu_rules, icu_rules_from_element, icu_rules_with, preferred_rules,
    preferred_rules_with, simple_rules, simple_rules_from_element, simple_rules_with,
};
pub use engine::{escape_for_icu, replace_unicode_escapes};
pub use error::{CollationError, Result};
pub use tree::{Before, Collation, Element, ExtendedRule, Payload, Relation, RuleItem, Settings};
pub use xml::parse_collation_xml;
