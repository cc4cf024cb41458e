//! Deferred hand-off of loaded data to a consumer.
//!
//! A page's data scripts can run before or after the renderer is ready.
//! Registration calls the consumer right away when one is installed and
//! otherwise parks the data in a pending slot, which is handed over as soon
//! as a consumer shows up (or picked up explicitly with
//! [`Registry::take_pending`]).

use thiserror::Error;

use crate::model::{ImplementorTable, SidebarItems};
use crate::script::{Script, ScriptError, ScriptKind, parse_script};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0} already registered for this page with different data")]
    AlreadyRegistered(&'static str),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

type Consumer<T> = Box<dyn FnMut(&T)>;

/// A write-once slot for one kind of page data.
pub struct Registry<T> {
    label: &'static str,
    data: Option<T>,
    delivered: bool,
    consumer: Option<Consumer<T>>,
}

impl<T: PartialEq> Registry<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            data: None,
            delivered: false,
            consumer: None,
        }
    }

    /// Register `data`, delivering it now if a consumer is installed.
    ///
    /// The slot is written once. Registering equal data again is a no-op,
    /// registering different data is an error.
    pub fn register(&mut self, data: T) -> Result<(), RegistryError> {
        if let Some(existing) = &self.data {
            if *existing == data {
                tracing::debug!(registry = self.label, "identical data registered again, ignored");
                return Ok(());
            }
            return Err(RegistryError::AlreadyRegistered(self.label));
        }

        let data = self.data.insert(data);
        match self.consumer.as_mut() {
            Some(consumer) => {
                tracing::debug!(registry = self.label, "delivered on registration");
                consumer(&*data);
                self.delivered = true;
            }
            None => tracing::debug!(registry = self.label, "no consumer yet, data pending"),
        }
        Ok(())
    }

    /// Install the consumer. Pending data is delivered immediately.
    pub fn install(&mut self, consumer: impl FnMut(&T) + 'static) {
        let mut consumer: Consumer<T> = Box::new(consumer);
        if let Some(data) = self.data.as_ref().filter(|_| !self.delivered) {
            tracing::debug!(registry = self.label, "delivered pending data on install");
            consumer(data);
            self.delivered = true;
        }
        self.consumer = Some(consumer);
    }

    /// Pick up pending data without a consumer. Returns `None` once delivered.
    pub fn take_pending(&mut self) -> Option<&T> {
        if self.delivered {
            return None;
        }
        let data = self.data.as_ref()?;
        self.delivered = true;
        Some(data)
    }

    pub fn is_pending(&self) -> bool {
        self.data.is_some() && !self.delivered
    }

    /// The registered data, delivered or not.
    pub fn get(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

/// The registries of one documentation page. Dropping it discards the data.
pub struct Page {
    pub implementors: Registry<ImplementorTable>,
    pub sidebar: Registry<SidebarItems>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            implementors: Registry::new("implementors"),
            sidebar: Registry::new("sidebar items"),
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a data script and register its payload in the matching slot.
    pub fn load_script(&mut self, src: &str) -> Result<ScriptKind, RegistryError> {
        let script = parse_script(src)?;
        let kind = script.kind();
        match script {
            Script::Implementors(table) => self.implementors.register(table)?,
            Script::Sidebar(items) => self.sidebar.register(items)?,
        }
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl FnMut(&u32) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |value: &u32| sink.borrow_mut().push(*value))
    }

    #[test]
    fn consumer_first_delivers_immediately() {
        let (seen, consumer) = recorder();
        let mut registry = Registry::new("numbers");
        registry.install(consumer);
        registry.register(7).unwrap();
        assert_eq!(*seen.borrow(), [7]);
        assert!(!registry.is_pending());
        assert_eq!(registry.take_pending(), None);
    }

    #[test]
    fn data_first_is_pending_until_install() {
        let (seen, consumer) = recorder();
        let mut registry = Registry::new("numbers");
        registry.register(7).unwrap();
        assert!(registry.is_pending());
        registry.install(consumer);
        assert_eq!(*seen.borrow(), [7]);
        assert!(!registry.is_pending());
        assert_eq!(registry.get(), Some(&7));
    }

    #[test]
    fn take_pending_reads_once() {
        let mut registry = Registry::new("numbers");
        registry.register(7).unwrap();
        assert_eq!(registry.take_pending(), Some(&7));
        assert_eq!(registry.take_pending(), None);
    }

    #[test]
    fn same_data_twice_is_idempotent() {
        let (seen, consumer) = recorder();
        let mut registry = Registry::new("numbers");
        registry.install(consumer);
        registry.register(7).unwrap();
        registry.register(7).unwrap();
        assert_eq!(*seen.borrow(), [7]);
    }

    #[test]
    fn different_data_is_rejected() {
        let mut registry = Registry::new("numbers");
        registry.register(7).unwrap();
        let err = registry.register(8).unwrap_err();
        assert_eq!(
            err.to_string(),
            "numbers already registered for this page with different data"
        );
        assert_eq!(registry.get(), Some(&7));
    }

    #[test]
    fn page_routes_by_kind() {
        let mut page = Page::new();
        let kind = page
            .load_script(r#"initSidebarItems({"fn":[["f",""]]});"#)
            .unwrap();
        assert_eq!(kind, ScriptKind::Sidebar);
        assert!(page.sidebar.is_pending());
        assert!(page.implementors.get().is_none());
    }

    #[test]
    fn page_reports_script_errors() {
        let mut page = Page::new();
        assert!(matches!(
            page.load_script("alert(1)"),
            Err(RegistryError::Script(ScriptError::Unrecognized))
        ));
    }
}
