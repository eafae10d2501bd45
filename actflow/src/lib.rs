//! # actflow - Synchronous Action Dispatcher
//!
//! `actflow` is the central primitive of a unidirectional data flow: callers
//! emit named actions, a [`Dispatcher`] fans them out to the stores connected
//! to it, and stores update their own state. A [`Registry`] names dispatchers
//! so that setup code can hand them out.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use actflow::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct CartStore {
//!     items: Mutex<Vec<u32>>,
//! }
//!
//! #[actflow::store]
//! impl CartStore {
//!     fn on_add_item(&self, qty: &u32) {
//!         self.items.lock().unwrap().push(*qty);
//!     }
//! }
//!
//! let registry = Registry::<u32>::new();
//! let cart = registry.create_with_actions("cart", ["addItem"])?;
//! let store = Arc::new(CartStore::default());
//! cart.connect_to(store.clone());
//!
//! cart.dispatch("addItem", &3)?;
//! assert_eq!(*store.items.lock().unwrap(), vec![3]);
//! ```
//!
//! ## Rules
//!
//! - Handlers are looked up by name: action `addItem` → handler `onAddItem`.
//! - Stores without a matching handler are skipped.
//! - Fan-out follows connection order and stops at the first handler error.
//! - A handler must not dispatch on the dispatcher that is notifying it;
//!   doing so returns [`DispatchError::Reentrant`].

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use actflow_core::{
    // Errors
    ActflowError,
    BoxError,
    DispatchError,
    // Stores
    Handler,
    // Naming
    HandlerNameCache,
    HandlerResult,
    IntoHandlerResult,
    IntoStores,
    Payload,
    RegistryError,
    Store,
    StoreRef,
    handler_name,
};

pub use actflow_std::{
    Action, Dispatcher, DispatcherBuilder, FailurePolicy, IntoActionNames, Registry,
};

/// Standard store implementations.
pub mod stores {
    pub use actflow_std::stores::{FnStore, LoggingStore};
}

/// Testing utilities.
pub mod testing {
    pub use actflow_std::testing::{CountingStore, FailingStore, RecordingStore, StoreRefused};
}

/// Prelude module - common imports for actflow.
///
/// # Usage
///
/// ```rust,ignore
/// use actflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Action, BoxError, DispatchError, Dispatcher, DispatcherBuilder, FailurePolicy, Handler,
        Registry, RegistryError, Store, StoreRef,
    };
}

#[cfg(feature = "macros")]
pub use actflow_macros::store;
