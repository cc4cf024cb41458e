//! Data-shape checks for loaded tables.
//!
//! Nothing here looks inside the HTML snippets; only the record structure is
//! checked.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::model::{ImplementorTable, SidebarItems};

/// Categories rustdoc files sidebar items under.
const KNOWN_CATEGORIES: &[&str] = &[
    "mod",
    "struct",
    "enum",
    "trait",
    "fn",
    "macro",
    "type",
    "constant",
    "static",
    "union",
    "primitive",
    "keyword",
    "attr",
    "derive",
    "traitalias",
    "foreigntype",
    "externcrate",
    "import",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One problem found in a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Where in the table, e.g. `bytes[0]` or `struct/Foo`.
    pub location: String,
    pub message: String,
}

impl Finding {
    fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location: location.into(),
            message: message.into(),
        }
    }

    fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity.as_str(), self.location, self.message)
    }
}

pub fn check_implementors(table: &ImplementorTable) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (krate, entries) in table.iter() {
        if krate.is_empty() {
            findings.push(Finding::error("<root>", "empty crate name"));
        }
        if entries.is_empty() {
            findings.push(Finding::warning(krate, "crate lists no implementors"));
        }
        for (i, entry) in entries.iter().enumerate() {
            let location = format!("{krate}[{i}]");
            if entry.types.is_empty() {
                findings.push(Finding::error(&location, "entry has no implementing types"));
            }
            if entry.types.iter().any(|t| t.trim().is_empty()) {
                findings.push(Finding::error(&location, "entry has an empty type path"));
            }
            if entry.text.is_empty() {
                findings.push(Finding::warning(&location, "entry has no text"));
            }
        }
    }

    log_findings(&findings);
    findings
}

pub fn check_sidebar(items: &SidebarItems) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (category, items) in items.iter() {
        if !KNOWN_CATEGORIES.contains(&category) {
            findings.push(Finding::warning(category, "unknown item category"));
        }
        let mut seen = HashSet::new();
        for (i, item) in items.iter().enumerate() {
            if item.name.is_empty() {
                findings.push(Finding::error(format!("{category}[{i}]"), "item has no name"));
            } else if !seen.insert(item.name.as_str()) {
                findings.push(Finding::warning(
                    format!("{category}/{}", item.name),
                    "item listed more than once",
                ));
            }
        }
    }

    log_findings(&findings);
    findings
}

fn log_findings(findings: &[Finding]) {
    for finding in findings {
        match finding.severity {
            Severity::Error => tracing::warn!(location = %finding.location, "{}", finding.message),
            Severity::Warning => tracing::debug!(location = %finding.location, "{}", finding.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_implementors() {
        let table: ImplementorTable = serde_json::from_str(
            r#"{"a":[{"text":"impl A","synthetic":false,"types":["a::A"]}]}"#,
        )
        .unwrap();
        assert!(check_implementors(&table).is_empty());
    }

    #[test]
    fn implementor_problems() {
        let table: ImplementorTable = serde_json::from_str(
            r#"{
                "a": [{"text":"impl A","synthetic":false,"types":[]},
                      {"text":"","synthetic":true,"types":[" "]}],
                "b": []
            }"#,
        )
        .unwrap();
        let findings: Vec<String> = check_implementors(&table)
            .iter()
            .map(ToString::to_string)
            .collect();
        insta::assert_debug_snapshot!(findings, @r#"
        [
            "error: a[0]: entry has no implementing types",
            "error: a[1]: entry has an empty type path",
            "warning: a[1]: entry has no text",
            "warning: b: crate lists no implementors",
        ]
        "#);
    }

    #[test]
    fn sidebar_problems() {
        let items: SidebarItems = serde_json::from_str(
            r#"{"struct":[["Foo",""],["Foo","again"],["",""]],"widget":[["W",""]]}"#,
        )
        .unwrap();
        let findings: Vec<String> = check_sidebar(&items).iter().map(ToString::to_string).collect();
        insta::assert_debug_snapshot!(findings, @r#"
        [
            "warning: struct/Foo: item listed more than once",
            "error: struct[2]: item has no name",
            "warning: widget: unknown item category",
        ]
        "#);
    }
}
