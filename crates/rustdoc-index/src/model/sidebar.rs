use serde::{Deserialize, Serialize, Serializer};

use super::KeyedTable;

/// An item in a module sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ItemRepr")]
pub struct SidebarItem {
    pub name: String,
    /// First line of the item's documentation, may be empty.
    pub summary: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRepr {
    Pair(String, String),
    Name(String),
}

impl From<ItemRepr> for SidebarItem {
    fn from(repr: ItemRepr) -> Self {
        match repr {
            ItemRepr::Pair(name, summary) => Self { name, summary },
            ItemRepr::Name(name) => Self {
                name,
                summary: String::new(),
            },
        }
    }
}

// Written as a `[name, summary]` pair, which is what `initSidebarItems` takes.
impl Serialize for SidebarItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.name, &self.summary).serialize(serializer)
    }
}

/// Sidebar items of one module, grouped by item category (`struct`, `enum`, ...).
pub type SidebarItems = KeyedTable<SidebarItem>;

impl KeyedTable<SidebarItem> {
    /// Items named `name`, with the category they are listed under.
    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (&'a str, &'a SidebarItem)> {
        self.iter().flat_map(move |(category, items)| {
            items
                .iter()
                .filter(move |item| item.name == name)
                .map(move |item| (category, item))
        })
    }
}
