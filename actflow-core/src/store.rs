//! # Stores
//!
//! A store is a subscriber that owns its own state and reacts to the actions
//! it cares about. The dispatcher never inspects a store: it only asks,
//! by handler name, whether the store has a handler for the current action,
//! and calls it if so.
//!
//! # Capability Query
//!
//! Handler lookup is explicit. [`Store::handler`] returns `None` for actions
//! the store ignores, which is normal and never an error. Stores are shared
//! and called through `&self`, so any state they mutate lives behind
//! interior mutability (`Mutex`, atomics, ...).

use crate::{
    payload::Payload,
    response::{HandlerResult, IntoHandlerResult},
};
use std::{fmt, sync::Arc};

/// A bound handler returned by [`Store::handler`].
///
/// Calling it consumes the handle; dispatchers look handlers up again for
/// every dispatch.
pub struct Handler<'a, P> {
    call: Box<dyn FnOnce(&P) -> HandlerResult + 'a>,
}

impl<'a, P> Handler<'a, P> {
    /// Wrap a closure as a handler.
    ///
    /// The closure may return anything implementing [`IntoHandlerResult`],
    /// i.e. `()` or `Result<(), E>`.
    pub fn new<F, R>(f: F) -> Self
    where
        F: FnOnce(&P) -> R + 'a,
        R: IntoHandlerResult,
    {
        Self {
            call: Box::new(move |payload: &P| f(payload).into_handler_result()),
        }
    }

    /// Invoke the handler with the dispatched payload.
    pub fn call(self, payload: &P) -> HandlerResult {
        (self.call)(payload)
    }
}

impl<P> fmt::Debug for Handler<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

/// A subscriber to dispatched actions.
///
/// # Example
///
/// ```rust,ignore
/// struct CartStore {
///     items: Mutex<Vec<u32>>,
/// }
///
/// impl Store<u32> for CartStore {
///     fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, u32>> {
///         match handler_name {
///             "onAddItem" => Some(Handler::new(move |qty: &u32| {
///                 self.items.lock().unwrap().push(*qty);
///             })),
///             _ => None,
///         }
///     }
/// }
/// ```
///
/// The `#[actflow::store]` attribute generates this impl from `on_*` methods.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Store<{P}>`",
    label = "missing `Store` implementation",
    note = "Stores must implement `handler` for the payload type `{P}`, or use `#[actflow::store]`."
)]
pub trait Store<P: Payload>: Send + Sync + 'static {
    /// Look up the handler for `handler_name` (e.g. `"onAddItem"`).
    ///
    /// Returns `None` when this store does not react to the action.
    fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, P>>;

    /// Check whether this store reacts to `handler_name`.
    fn has_handler(&self, handler_name: &str) -> bool {
        self.handler(handler_name).is_some()
    }
}

/// A shared handle to a connected store.
///
/// Two handles are the same store when they point at the same allocation;
/// store contents are never compared.
pub struct StoreRef<P: Payload>(Arc<dyn Store<P>>);

impl<P: Payload> StoreRef<P> {
    /// Move `store` into a new shared handle.
    pub fn new<S: Store<P>>(store: S) -> Self {
        Self(Arc::new(store))
    }

    /// Check whether both handles refer to the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// Look up a handler on the underlying store.
    pub fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, P>> {
        self.0.handler(handler_name)
    }

    /// Check whether the underlying store reacts to `handler_name`.
    pub fn has_handler(&self, handler_name: &str) -> bool {
        self.0.has_handler(handler_name)
    }
}

impl<P: Payload> Clone for StoreRef<P> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<P: Payload> fmt::Debug for StoreRef<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StoreRef")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl<P: Payload, S: Store<P>> From<Arc<S>> for StoreRef<P> {
    fn from(store: Arc<S>) -> Self {
        Self(store)
    }
}

/// One store or an ordered sequence of stores, as accepted by `connect_to`.
///
/// Implemented for `Arc<S>`, [`StoreRef`], and `Vec`s or arrays of either.
/// Mixing store types in one sequence requires converting them to
/// [`StoreRef`] first.
pub trait IntoStores<P: Payload> {
    /// Convert into an ordered list of store handles.
    fn into_stores(self) -> Vec<StoreRef<P>>;
}

impl<P: Payload, S: Store<P>> IntoStores<P> for Arc<S> {
    fn into_stores(self) -> Vec<StoreRef<P>> {
        vec![StoreRef::from(self)]
    }
}

impl<P: Payload> IntoStores<P> for StoreRef<P> {
    fn into_stores(self) -> Vec<StoreRef<P>> {
        vec![self]
    }
}

impl<P: Payload, T: Into<StoreRef<P>>> IntoStores<P> for Vec<T> {
    fn into_stores(self) -> Vec<StoreRef<P>> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<P: Payload, T: Into<StoreRef<P>>, const N: usize> IntoStores<P> for [T; N] {
    fn into_stores(self) -> Vec<StoreRef<P>> {
        self.into_iter().map(Into::into).collect()
    }
}
