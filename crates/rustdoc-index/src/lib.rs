//! Loader for the index data rustdoc writes next to its HTML pages.
//!
//! rustdoc emits two kinds of small JavaScript files that a documentation
//! page picks up at load time:
//! - `implementors/**/trait.*.js`, registering which types of which crates
//!   implement a trait ([`ImplementorTable`]),
//! - `**/sidebar-items.js`, listing the items shown in a module's sidebar
//!   ([`SidebarItems`]).
//!
//! This crate provides:
//! - typed records for both shapes and a reader/writer for the scripts
//!   ([`parse_script`], [`ImplementorTable::to_script`]),
//! - the deferred registration slot pages use to hand the data to a renderer
//!   ([`Registry`], [`Page`]),
//! - data-shape checks ([`check_implementors`], [`check_sidebar`]),
//! - a scanner for a whole documentation output directory ([`DocTree`]).

mod check;
mod model;
mod registry;
mod script;
mod tree;

pub use check::{Finding, Severity, check_implementors, check_sidebar};
pub use model::{
    DuplicateKey, ImplementorEntry, ImplementorTable, KeyedTable, SidebarItem, SidebarItems,
};
pub use registry::{Page, Registry, RegistryError};
pub use script::{Script, ScriptError, ScriptKind, parse_implementors, parse_script, parse_sidebar};
pub use tree::{DocTree, LoadError, LoadedFile, TreeError};
