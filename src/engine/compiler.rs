//! Full ICU rule compiler.
//!
//! Walks a [`Collation`] once and appends to a single output buffer:
//!
//! ```text
//! settings directives   [strength 3]\n[backwards 2]...
//!   <- fallback point   (variable top lands here if never matched)
//! option directives     \n[suppress_contractions ..]\n[optimize ..]
//! rule body             \n& a < b << c <<< d = e ...
//! ```
//!
//! ## Variable top
//!
//! `settings/@variableTop` names a target. The first reset or relation whose
//! escaped data equals the target gets ` < [variable top]` appended right
//! after it, and the target is cleared so no later item can match. If the
//! walk ends with the target still pending, a reset to the target followed
//! by the marker (`& x < [variable top]`) is spliced in at the fallback point
//! recorded right after the settings block.
//!
//! ## Trimming
//!
//! Leading whitespace is always removed. Trailing whitespace is removed unless
//! the output ends in an active two-character escape (`\` plus one char),
//! where the final character may itself be an escaped space.

use super::escape::escape_char;
use super::extract::{icu_data, text_data};
use super::settings::{option_directive, settings_directives};
use crate::error::Result;
use crate::tree::{Collation, ExtendedRule, Relation, RuleItem};
use tracing::{debug, trace};

const VARIABLE_TOP_MARKER: &str = " < [variable top]";

/// Mutable state of one compilation run.
#[derive(Debug)]
struct CompileState<'a> {
    line_break: &'a str,
    out: String,
    /// Pending escaped variable-top target; consumed at most once.
    variable_top: Option<String>,
    /// Output offset right after the settings block.
    fallback_at: usize,
}

impl<'a> CompileState<'a> {
    fn new(line_break: &'a str) -> Self {
        CompileState { line_break, out: String::new(), variable_top: None, fallback_at: 0 }
    }

    fn push_item(&mut self, item: &RuleItem) -> Result<()> {
        let element = item.element_name();
        match item {
            RuleItem::Reset { before, target } => {
                let data = icu_data(element, target)?;
                self.out.push_str(self.line_break);
                self.out.push_str("& ");
                if let Some(before) = before {
                    self.out.push_str(before.directive());
                }
                self.out.push_str(&data);
                self.mark_variable_top(&data);
            }
            RuleItem::Relation { relation, data } => {
                let data = icu_data(element, data)?;
                self.push_relation(*relation, &data);
            }
            RuleItem::Concat { relation, data } => {
                for ch in text_data(element, data)?.chars() {
                    self.push_relation(*relation, &escape_char(ch));
                }
            }
            RuleItem::Extended(rule) => {
                let rendered = render_extended(rule)?;
                self.out.push_str(&rendered);
            }
        }
        trace!(element, len = self.out.len(), "compiled rule item");
        Ok(())
    }

    fn push_relation(&mut self, relation: Relation, data: &str) {
        self.out.push(' ');
        self.out.push_str(relation.operator());
        self.out.push(' ');
        self.out.push_str(data);
        self.mark_variable_top(data);
    }

    fn mark_variable_top(&mut self, data: &str) {
        if self.variable_top.as_deref() == Some(data) {
            debug!(target_text = data, "variable top matched in rule body");
            self.variable_top = None;
            self.out.push_str(VARIABLE_TOP_MARKER);
        }
    }

    fn finish(mut self) -> String {
        if let Some(target) = self.variable_top.take() {
            debug!(at = self.fallback_at, target_text = %target, "variable top not found in rules; using fallback position");
            let marker = format!("{}& {}{}", self.line_break, target, VARIABLE_TOP_MARKER);
            self.out.insert_str(self.fallback_at, &marker);
        }
        trim_unescaped_whitespace(&self.out).to_string()
    }
}

/// Compile a collation tree into ICU rule text.
pub(crate) fn compile(collation: &Collation, line_break: &str) -> Result<String> {
    debug!(
        settings = collation.settings.is_some(),
        items = collation.rules.as_ref().map_or(0, Vec::len),
        "compiling ICU rules"
    );

    let mut state = CompileState::new(line_break);

    if let Some(settings) = &collation.settings {
        let block = settings_directives(settings, line_break)?;
        state.out.push_str(&block.directives);
        state.variable_top = block.variable_top;
        state.fallback_at = state.out.len();
    }
    if let Some(value) = &collation.suppress_contractions {
        state.out.push_str(&option_directive("suppress_contractions", value, line_break));
    }
    if let Some(value) = &collation.optimize {
        state.out.push_str(&option_directive("optimize", value, line_break));
    }
    for item in collation.rules.iter().flatten() {
        state.push_item(item)?;
    }

    Ok(state.finish())
}

fn render_extended(rule: &ExtendedRule) -> Result<String> {
    let mut rendered = format!(" {} ", rule.relation.operator());
    if let Some(context) = &rule.context {
        rendered.push_str(&icu_data("context", context)?);
        rendered.push_str(" | ");
    }
    rendered.push_str(&icu_data(rule.relation.element_name(), &rule.data)?);
    if let Some(extend) = &rule.extend {
        rendered.push_str(" / ");
        rendered.push_str(&icu_data("extend", extend)?);
    }
    Ok(rendered)
}

/// Trim leading whitespace, and trailing whitespace unless the text ends in
/// a backslash escape.
pub(crate) fn trim_unescaped_whitespace(rules: &str) -> &str {
    let ends_in_escape = rules.rfind('\\').is_some_and(|idx| rules[idx + 1..].chars().count() == 1);
    if ends_in_escape { rules.trim_start() } else { rules.trim() }
}
