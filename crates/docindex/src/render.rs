use colored::*;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use rustdoc_index::{Finding, ImplementorEntry, ImplementorTable, Script, Severity, SidebarItems};

/// Format a script's data for the terminal
pub fn format_script(script: &Script) -> String {
    match script {
        Script::Implementors(table) => format_implementors(table),
        Script::Sidebar(items) => format_sidebar(items),
    }
}

pub fn format_implementors(table: &ImplementorTable) -> String {
    let mut output = String::new();

    for (krate, entries) in table.iter() {
        output.push_str(&format!("{}\n", krate.bright_cyan().bold()));
        for entry in entries {
            output.push_str(&format!("  {} {}\n", "•".bright_blue(), format_entry(entry)));
        }
    }

    output.push_str(&format!(
        "{}\n",
        format!(
            "{} implementors in {} crates",
            table.value_count(),
            table.len()
        )
        .dimmed()
    ));
    output
}

fn format_entry(entry: &ImplementorEntry) -> String {
    let types = if entry.types.is_empty() {
        "(no types)".red().to_string()
    } else {
        entry
            .types
            .iter()
            .map(|t| t.bright_white().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    if entry.synthetic {
        format!("{} {}", types, "(auto)".bright_black())
    } else {
        types
    }
}

pub fn format_sidebar(items: &SidebarItems) -> String {
    let mut output = String::new();

    for (category, items) in items.iter() {
        output.push_str(&format!("{}\n", category.bright_green().bold()));

        let width = items.iter().map(|item| item.name.chars().count()).max().unwrap_or(0);
        for item in items {
            if item.summary.is_empty() {
                output.push_str(&format!("  {}\n", item.name.bright_white()));
            } else {
                // Pad before coloring so escape codes don't count toward the width
                output.push_str(&format!(
                    "  {}  {}\n",
                    format!("{:width$}", item.name).bright_white(),
                    format_summary(&item.summary)
                ));
            }
        }
    }

    output
}

/// Render a one-line markdown summary, highlighting inline code
pub fn format_summary(markdown: &str) -> String {
    let mut output = String::new();
    let mut emphasis = false;
    let mut strong = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) => {
                let styled = match (strong, emphasis) {
                    (true, _) => text.bold().to_string(),
                    (false, true) => text.italic().to_string(),
                    (false, false) => text.to_string(),
                };
                output.push_str(&styled);
            }
            Event::Code(code) => output.push_str(&code.yellow().to_string()),
            Event::SoftBreak | Event::HardBreak => output.push(' '),
            Event::Start(Tag::Emphasis) => emphasis = true,
            Event::End(TagEnd::Emphasis) => emphasis = false,
            Event::Start(Tag::Strong) => strong = true,
            Event::End(TagEnd::Strong) => strong = false,
            Event::End(TagEnd::Paragraph) => output.push(' '),
            _ => {}
        }
    }

    output.trim_end().to_string()
}

pub fn format_finding(finding: &Finding) -> String {
    let severity = match finding.severity {
        Severity::Error => finding.severity.as_str().red().bold(),
        Severity::Warning => finding.severity.as_str().yellow(),
    };
    format!("  {}: {}: {}\n", severity, finding.location, finding.message)
}
