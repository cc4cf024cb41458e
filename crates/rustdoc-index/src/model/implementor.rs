use serde::{Deserialize, Serialize};

use super::KeyedTable;

/// One `impl` block of a trait, as listed on the trait's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryRepr")]
pub struct ImplementorEntry {
    /// Pre-rendered HTML of the impl header.
    pub text: String,
    /// Whether the impl is an auto trait impl rather than one written in source.
    pub synthetic: bool,
    /// Fully-qualified paths of the implementing types.
    pub types: Vec<String>,
}

/// Both shapes rustdoc has written an entry in.
#[derive(Deserialize)]
#[serde(untagged)]
enum EntryRepr {
    Object {
        text: String,
        #[serde(default)]
        synthetic: bool,
        #[serde(default)]
        types: Vec<String>,
    },
    Compact(String, bool, Vec<String>),
}

impl From<EntryRepr> for ImplementorEntry {
    fn from(repr: EntryRepr) -> Self {
        match repr {
            EntryRepr::Object {
                text,
                synthetic,
                types,
            }
            | EntryRepr::Compact(text, synthetic, types) => Self {
                text,
                synthetic,
                types,
            },
        }
    }
}

/// Implementors of one trait, grouped by the crate that documents them.
pub type ImplementorTable = KeyedTable<ImplementorEntry>;

impl KeyedTable<ImplementorEntry> {
    /// All entries, paired with the crate they are listed under.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ImplementorEntry)> {
        self.iter()
            .flat_map(|(krate, entries)| entries.iter().map(move |entry| (krate, entry)))
    }

    /// Entries naming `type_path` among their implementing types.
    pub fn implementors_of_type<'a>(
        &'a self,
        type_path: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a ImplementorEntry)> {
        self.entries()
            .filter(move |(_, entry)| entry.types.iter().any(|t| t == type_path))
    }
}
