mod implementor;
mod sidebar;
mod table;

pub use implementor::{ImplementorEntry, ImplementorTable};
pub use sidebar::{SidebarItem, SidebarItems};
pub use table::{DuplicateKey, KeyedTable};
