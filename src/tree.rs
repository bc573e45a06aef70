//! Collation element tree.
//!
//! Two shapes live here:
//!
//! - [`Element`]: a generic, already-parsed markup node (name, attributes,
//!   child elements, own text). This is what an XML collaborator hands over;
//!   see `xml.rs` for the `roxmltree` adapter.
//! - The typed model ([`Collation`] and friends): the `<collation>` subtree
//!   after structural validation. The engine only ever walks this shape.
//!
//! `Collation::from_element` is the single bridge between the two and is
//! where unknown rule elements, bad `before` qualifiers and malformed
//! extended rules are rejected.
//!
//! ```text
//! <collation>                          Collation
//!   <settings strength=".."/>    ->      settings: Some(Settings)
//!   <suppress_contractions>..    ->      suppress_contractions: Some(String)
//!   <optimize>..                 ->      optimize: Some(String)
//!   <rules>                      ->      rules: Some(Vec<RuleItem>)
//!     <reset before="primary">           RuleItem::Reset
//!       <first_non_ignorable/>             Payload::Anchor
//!     <p>a</p>                           RuleItem::Relation(Primary, Text)
//!     <tc><cp hex="1D11E"/></tc>         RuleItem::Concat(Tertiary, CodePoints)
//!     <x><context>..<s>..</x>            RuleItem::Extended
//! ```

use crate::error::{CollationError, Result};

// --- Generic element tree ----------------------------------------------------

/// A parsed markup element, independent of any XML library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated text content directly under this element.
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element { name: name.into(), ..Default::default() }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// True when the element has neither text nor child elements.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text.is_empty()
    }
}

// --- Typed model -------------------------------------------------------------

/// A validated `<collation>` subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collation {
    pub settings: Option<Settings>,
    pub suppress_contractions: Option<String>,
    pub optimize: Option<String>,
    pub rules: Option<Vec<RuleItem>>,
}

/// Raw `<settings>` attributes, kept in document order so directives are
/// emitted in the order the author wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub attributes: Vec<(String, String)>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }
}

/// Relation strength of a rule item (`p`, `s`, `t`, `i` and their `*c` forms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Primary,
    Secondary,
    Tertiary,
    Identical,
}

impl Relation {
    /// ICU operator token.
    pub fn operator(self) -> &'static str {
        match self {
            Relation::Primary => "<",
            Relation::Secondary => "<<",
            Relation::Tertiary => "<<<",
            Relation::Identical => "=",
        }
    }

    pub fn element_name(self) -> &'static str {
        match self {
            Relation::Primary => "p",
            Relation::Secondary => "s",
            Relation::Tertiary => "t",
            Relation::Identical => "i",
        }
    }

    pub fn concat_element_name(self) -> &'static str {
        match self {
            Relation::Primary => "pc",
            Relation::Secondary => "sc",
            Relation::Tertiary => "tc",
            Relation::Identical => "ic",
        }
    }

    fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "p" => Some(Relation::Primary),
            "s" => Some(Relation::Secondary),
            "t" => Some(Relation::Tertiary),
            "i" => Some(Relation::Identical),
            _ => None,
        }
    }

    fn from_concat_element_name(name: &str) -> Option<Self> {
        match name {
            "pc" => Some(Relation::Primary),
            "sc" => Some(Relation::Secondary),
            "tc" => Some(Relation::Tertiary),
            "ic" => Some(Relation::Identical),
            _ => None,
        }
    }
}

/// `before` qualifier on a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Before {
    Primary,
    Secondary,
    Tertiary,
}

impl Before {
    pub fn directive(self) -> &'static str {
        match self {
            Before::Primary => "[before 1] ",
            Before::Secondary => "[before 2] ",
            Before::Tertiary => "[before 3] ",
        }
    }

    fn parse(value: Option<&str>) -> Result<Option<Self>> {
        match value {
            None | Some("") => Ok(None),
            Some("primary") => Ok(Some(Before::Primary)),
            Some("secondary") => Ok(Some(Before::Secondary)),
            Some("tertiary") => Ok(Some(Before::Tertiary)),
            Some(other) => Err(CollationError::InvalidBefore { value: other.to_string() }),
        }
    }
}

/// Data carried by a rule item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Literal text.
    Text(String),
    /// Hexadecimal code point references (`<cp hex=".."/>`), decoded lazily.
    CodePoints(Vec<String>),
    /// Indirect position anchor element name, e.g. `first_non_ignorable`.
    Anchor(String),
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        Payload::Text(text.into())
    }

    pub fn code_points<I, S>(hex: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Payload::CodePoints(hex.into_iter().map(Into::into).collect())
    }

    pub fn anchor(name: impl Into<String>) -> Self {
        Payload::Anchor(name.into())
    }
}

/// An `<x>` rule: `context | data / extend` under one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedRule {
    pub context: Option<Payload>,
    pub relation: Relation,
    pub data: Payload,
    pub extend: Option<Payload>,
}

/// One child of `<rules>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleItem {
    Reset { before: Option<Before>, target: Payload },
    Relation { relation: Relation, data: Payload },
    Concat { relation: Relation, data: Payload },
    Extended(ExtendedRule),
}

impl RuleItem {
    pub fn reset(target: Payload) -> Self {
        RuleItem::Reset { before: None, target }
    }

    pub fn reset_before(before: Before, target: Payload) -> Self {
        RuleItem::Reset { before: Some(before), target }
    }

    pub fn relation(relation: Relation, data: Payload) -> Self {
        RuleItem::Relation { relation, data }
    }

    pub fn concat(relation: Relation, data: Payload) -> Self {
        RuleItem::Concat { relation, data }
    }

    /// The LDML element name this item was (or would be) written as.
    pub fn element_name(&self) -> &'static str {
        match self {
            RuleItem::Reset { .. } => "reset",
            RuleItem::Relation { relation, .. } => relation.element_name(),
            RuleItem::Concat { relation, .. } => relation.concat_element_name(),
            RuleItem::Extended(_) => "x",
        }
    }
}

// --- Conversion --------------------------------------------------------------

impl Collation {
    /// Validate an element tree rooted at `<collation>` into the typed model.
    pub fn from_element(element: &Element) -> Result<Self> {
        if element.name != "collation" {
            return Err(CollationError::NotACollation { found: element.name.clone() });
        }

        let settings = element.child("settings").map(|s| Settings { attributes: s.attributes.clone() });
        let suppress_contractions = element.child("suppress_contractions").map(|e| e.text.clone());
        let optimize = element.child("optimize").map(|e| e.text.clone());
        let rules = element
            .child("rules")
            .map(|rules| rules.children.iter().map(rule_item_from_element).collect::<Result<Vec<_>>>())
            .transpose()?;

        Ok(Collation { settings, suppress_contractions, optimize, rules })
    }
}

fn rule_item_from_element(element: &Element) -> Result<RuleItem> {
    let name = element.name.as_str();
    if name == "reset" {
        let before = Before::parse(element.attr("before"))?;
        let target = payload_from_element(element, true)?;
        return Ok(RuleItem::Reset { before, target });
    }
    if let Some(relation) = Relation::from_element_name(name) {
        return Ok(RuleItem::Relation { relation, data: payload_from_element(element, false)? });
    }
    if let Some(relation) = Relation::from_concat_element_name(name) {
        return Ok(RuleItem::Concat { relation, data: payload_from_element(element, false)? });
    }
    if name == "x" {
        return extended_from_element(element).map(RuleItem::Extended);
    }
    Err(CollationError::InvalidRuleElement { name: name.to_string() })
}

fn set_once(slot: &mut Option<Payload>, child: &Element) -> Result<()> {
    if slot.is_some() {
        return Err(CollationError::DuplicateExtendedElement { name: child.name.clone() });
    }
    *slot = Some(payload_from_element(child, false)?);
    Ok(())
}

fn extended_from_element(element: &Element) -> Result<ExtendedRule> {
    if element.children.is_empty() {
        return Err(CollationError::EmptyRule { element: element.name.clone() });
    }

    let mut context = None;
    let mut extend = None;
    let mut relations = Vec::new();
    for child in &element.children {
        match child.name.as_str() {
            "context" => set_once(&mut context, child)?,
            "extend" => set_once(&mut extend, child)?,
            name => match Relation::from_element_name(name) {
                Some(relation) => relations.push((relation, payload_from_element(child, false)?)),
                None => return Err(CollationError::InvalidExtendedElement { name: name.to_string() }),
            },
        }
    }

    if relations.len() != 1 {
        return Err(CollationError::ExtendedRelationCount { found: relations.len() });
    }
    let (relation, data) = relations.remove(0);
    Ok(ExtendedRule { context, relation, data, extend })
}

fn payload_from_element(element: &Element, allow_anchor: bool) -> Result<Payload> {
    if element.is_empty() {
        return Err(CollationError::EmptyRule { element: element.name.clone() });
    }

    let Some(first) = element.children.first() else {
        return Ok(Payload::Text(element.text.clone()));
    };

    if first.name != "cp" {
        if allow_anchor {
            return Ok(Payload::Anchor(first.name.clone()));
        }
        return Err(CollationError::UnexpectedElement { element: element.name.clone(), name: first.name.clone() });
    }

    let mut hex = Vec::with_capacity(element.children.len());
    for child in &element.children {
        if child.name != "cp" {
            return Err(CollationError::UnexpectedElement { element: element.name.clone(), name: child.name.clone() });
        }
        hex.push(child.attr("hex").unwrap_or_default().to_string());
    }
    Ok(Payload::CodePoints(hex))
}
