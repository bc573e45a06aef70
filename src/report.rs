use ldml_collation::{Collation, CollationError, Dialect, Options, icu_rules_with, simple_rules_with};

/// Roles a piece of report text can play; each maps to one SGR sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Title,
    Rule,
    Count,
    Hint,
    Muted,
    Warning,
}

impl Style {
    fn sgr(self) -> &'static str {
        match self {
            Style::Title => "1;36",
            Style::Rule => "32",
            Style::Count | Style::Warning => "33",
            Style::Hint => "90",
            Style::Muted => "2",
        }
    }
}

/// Applies styles when the report goes to a colour-capable sink.
struct Painter {
    color: bool,
}

impl Painter {
    fn style(&self, text: impl AsRef<str>, style: Style) -> String {
        if self.color { format!("\x1b[{}m{}\x1b[0m", style.sgr(), text.as_ref()) } else { text.as_ref().to_string() }
    }
}

/// Print both rule forms for `collation`, marking the one a caller should
/// prefer.
pub fn print_report(source: &str, collation: &Collation, options: &Options, color: bool) -> Result<(), CollationError> {
    let painter = Painter { color };
    let icu = icu_rules_with(collation, options)?;
    let simple = simple_rules_with(collation, options)?;
    let preferred = if simple.is_some() { Dialect::Simple } else { Dialect::Icu };

    println!("\n{}", painter.style(format!("⚙  Collation: {source}"), Style::Title));

    println!("\n{}", painter.style("━━━ Tree ━━━", Style::Hint));
    print_tree_summary(collation, &painter);

    println!("\n{}", painter.style(section_title("ICU rules", preferred == Dialect::Icu), Style::Hint));
    print_block(&icu, &painter);

    println!("\n{}", painter.style(section_title("Simple rules", preferred == Dialect::Simple), Style::Hint));
    match &simple {
        Some(text) => print_block(text, &painter),
        None => {
            println!("{}", painter.style("  Not representable", Style::Muted));
            println!("\n{}", painter.style("Possible reasons:", Style::Warning));
            println!("  • Collation has <settings>");
            println!("  • First rule is not <reset before=\"primary\"><first_non_ignorable/></reset>");
            println!("  • Body uses <i>, <ic>, <x> or a second <reset>");
            println!("\n{}", painter.style("  Tip: Set LDML_COLLATION_LOG=debug to see the rejection reason", Style::Muted));
        }
    }
    println!();
    Ok(())
}

fn section_title(name: &str, preferred: bool) -> String {
    if preferred { format!("━━━ {name} (preferred) ━━━") } else { format!("━━━ {name} ━━━") }
}

fn print_tree_summary(collation: &Collation, painter: &Painter) {
    let settings = collation.settings.as_ref().map_or(0, |s| s.attributes.len());
    let items = collation.rules.as_ref().map_or(0, Vec::len);
    println!(
        "  {} {}  │  {} {}  │  {} {}",
        painter.style("settings:", Style::Muted),
        painter.style(settings.to_string(), Style::Count),
        painter.style("rule items:", Style::Muted),
        painter.style(items.to_string(), Style::Count),
        painter.style("options:", Style::Muted),
        painter.style(option_names(collation), Style::Count),
    );
}

fn option_names(collation: &Collation) -> String {
    let mut names = Vec::new();
    if collation.suppress_contractions.is_some() {
        names.push("suppress_contractions");
    }
    if collation.optimize.is_some() {
        names.push("optimize");
    }
    if names.is_empty() { "-".to_string() } else { names.join(", ") }
}

fn print_block(text: &str, painter: &Painter) {
    if text.is_empty() {
        println!("{}", painter.style("  (empty)", Style::Muted));
        return;
    }
    for line in text.lines() {
        println!("  {}", painter.style(line, Style::Rule));
    }
}
