//! Registry of dispatchers by name.
//!
//! The registry is an ordinary value: create it once during application
//! setup and hand it (usually behind an `Arc`) to the code that needs to look
//! dispatchers up. Nothing is global.

use crate::builder::{DispatcherBuilder, IntoActionNames};
use crate::dispatcher::Dispatcher;
use actflow_core::{Payload, RegistryError};
use std::{
    collections::HashMap,
    fmt,
    sync::{PoisonError, RwLock, RwLockReadGuard},
};

/// A named collection of dispatchers.
///
/// # Example
/// ```ignore
/// let registry = Registry::<CartAction>::new();
/// let cart = registry.create_with_actions("cart", ["addItem", "removeItem"])?;
///
/// assert!(registry.get("cart").unwrap().ptr_eq(&cart));
/// ```
pub struct Registry<P: Payload> {
    dispatchers: RwLock<HashMap<String, Dispatcher<P>>>,
}

impl<P: Payload> Registry<P> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            dispatchers: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Dispatcher<P>>> {
        self.dispatchers.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a dispatcher and register it under `name`.
    ///
    /// An existing dispatcher with the same name is replaced. It keeps working
    /// for anyone still holding it, but `get` no longer returns it.
    pub fn create(&self, name: &str) -> Result<Dispatcher<P>, RegistryError> {
        self.insert(DispatcherBuilder::new(name))
    }

    /// Like [`create`](Self::create), pre-registering one or more actions.
    pub fn create_with_actions(
        &self,
        name: &str,
        actions: impl IntoActionNames,
    ) -> Result<Dispatcher<P>, RegistryError> {
        self.insert(DispatcherBuilder::new(name).actions(actions))
    }

    /// Build a configured dispatcher and register it under its name.
    pub fn insert(&self, builder: DispatcherBuilder<P>) -> Result<Dispatcher<P>, RegistryError> {
        let dispatcher = builder.build()?;
        let previous = self
            .dispatchers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dispatcher.name().to_owned(), dispatcher.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            dispatcher = %dispatcher.name(),
            replaced = previous.is_some(),
            "registered dispatcher"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = previous;

        Ok(dispatcher)
    }

    /// Look up the dispatcher currently registered under `name`.
    pub fn get(&self, name: &str) -> Option<Dispatcher<P>> {
        self.read().get(name).cloned()
    }

    /// Check whether a dispatcher is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered dispatchers.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<P: Payload> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> fmt::Debug for Registry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("dispatchers", &self.names())
            .finish()
    }
}
