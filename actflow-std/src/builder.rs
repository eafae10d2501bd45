//! Dispatcher configuration.
//!
//! A [`DispatcherBuilder`] collects the name, initial actions, initial stores
//! and [`FailurePolicy`] of a dispatcher, then validates them in `build`.
//!
//! # Example
//! ```ignore
//! let dispatcher = DispatcherBuilder::new("cart")
//!     .actions(["addItem", "removeItem"])
//!     .store(cart_store.clone())
//!     .failure_policy(FailurePolicy::Poison)
//!     .build()?;
//! ```

use crate::dispatcher::Dispatcher;
use actflow_core::{IntoStores, Payload, RegistryError, StoreRef};
use std::sync::Arc;

/// What happens to a dispatcher when a store handler fails mid fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The in-progress flag is always cleared once `dispatch` returns,
    /// whether fan-out completed, a handler returned an error, or a handler
    /// panicked. The next dispatch proceeds normally.
    #[default]
    Release,
    /// A handler error or panic poisons the dispatcher. Every later dispatch
    /// fails with `DispatchError::Poisoned`.
    Poison,
}

/// One action name or an ordered sequence of action names.
pub trait IntoActionNames {
    /// Convert into an ordered list of action names.
    fn into_action_names(self) -> Vec<String>;
}

impl IntoActionNames for &str {
    fn into_action_names(self) -> Vec<String> {
        vec![self.to_owned()]
    }
}

impl IntoActionNames for String {
    fn into_action_names(self) -> Vec<String> {
        vec![self]
    }
}

impl<T: Into<String>> IntoActionNames for Vec<T> {
    fn into_action_names(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<String>, const N: usize> IntoActionNames for [T; N] {
    fn into_action_names(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: AsRef<str>> IntoActionNames for &[T] {
    fn into_action_names(self) -> Vec<String> {
        self.iter().map(|name| name.as_ref().to_owned()).collect()
    }
}

/// Builder for constructing a [`Dispatcher`].
pub struct DispatcherBuilder<P: Payload> {
    name: String,
    actions: Vec<String>,
    stores: Vec<StoreRef<P>>,
    policy: FailurePolicy,
}

impl<P: Payload> DispatcherBuilder<P> {
    /// Start building a dispatcher called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            stores: Vec::new(),
            policy: FailurePolicy::default(),
        }
    }

    /// Pre-register one action.
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.actions.push(name.into());
        self
    }

    /// Pre-register actions, in order.
    pub fn actions(mut self, names: impl IntoActionNames) -> Self {
        self.actions.extend(names.into_action_names());
        self
    }

    /// Connect one or more stores at construction.
    pub fn store(mut self, stores: impl IntoStores<P>) -> Self {
        self.stores.extend(stores.into_stores());
        self
    }

    /// Alias of [`store`](Self::store) that reads better with sequences.
    pub fn stores(self, stores: impl IntoStores<P>) -> Self {
        self.store(stores)
    }

    /// Set the failure policy.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The name the dispatcher will be built with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate the configuration and build the dispatcher.
    ///
    /// Fails with [`RegistryError::InvalidName`] for an empty name and with
    /// [`RegistryError::InvalidAction`] if any initial action name is empty.
    pub fn build(self) -> Result<Dispatcher<P>, RegistryError> {
        if self.name.is_empty() {
            return Err(RegistryError::InvalidName);
        }

        let dispatcher = Dispatcher::with_policy(self.name, self.policy);
        for action in &self.actions {
            dispatcher
                .register_action(action)
                .map_err(|_| RegistryError::InvalidAction {
                    dispatcher: Arc::from(dispatcher.name()),
                })?;
        }
        dispatcher.connect_to(self.stores);
        Ok(dispatcher)
    }
}
