//! # Dispatcher
//!
//! A dispatcher routes named actions to the stores connected to it.
//!
//! # Fan-out
//!
//! `dispatch("addItem", &payload)` looks up the handler `onAddItem` on every
//! connected store, in connection order, and calls the ones that exist.
//! Fan-out is synchronous and sequential: one handler returns before the next
//! one starts. The first handler error aborts fan-out and is returned to the
//! caller unmodified; later stores are not notified of that action.
//!
//! # Reentrancy
//!
//! Only one dispatch may run on a dispatcher at a time. A store handler that
//! calls `dispatch` on the dispatcher currently notifying it gets
//! [`DispatchError::Reentrant`]. Dispatching on a *different* dispatcher from
//! a handler is allowed.
//!
//! # Snapshot
//!
//! The store list is snapshotted when fan-out starts. Stores connected by a
//! handler during a dispatch are notified from the next dispatch on.

use crate::builder::{DispatcherBuilder, FailurePolicy};
use actflow_core::{DispatchError, HandlerNameCache, IntoStores, Payload, StoreRef};
use indexmap::IndexMap;
use std::{
    fmt,
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// The entry point of one registered action.
#[derive(Debug)]
struct ActionEntry {
    name: Arc<str>,
    handler_name: Arc<str>,
}

struct Inner<P: Payload> {
    id: u64,
    name: Arc<str>,
    policy: FailurePolicy,
    stores: RwLock<Vec<StoreRef<P>>>,
    actions: RwLock<IndexMap<Arc<str>, Arc<ActionEntry>>>,
    handler_names: HandlerNameCache,
    dispatching: AtomicBool,
    poisoned: AtomicBool,
}

impl<P: Payload> Inner<P> {
    fn stores(&self) -> RwLockReadGuard<'_, Vec<StoreRef<P>>> {
        self.stores.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn stores_mut(&self) -> RwLockWriteGuard<'_, Vec<StoreRef<P>>> {
        self.stores.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn actions(&self) -> RwLockReadGuard<'_, IndexMap<Arc<str>, Arc<ActionEntry>>> {
        self.actions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn actions_mut(&self) -> RwLockWriteGuard<'_, IndexMap<Arc<str>, Arc<ActionEntry>>> {
        self.actions.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn poison(&self) {
        if !self.poisoned.swap(true, Ordering::AcqRel) {
            #[cfg(feature = "tracing")]
            tracing::warn!(dispatcher = %self.name, "dispatcher poisoned");
        }
    }
}

/// Holds the in-progress flag for the duration of one dispatch.
struct DispatchGuard<'a, P: Payload> {
    inner: &'a Inner<P>,
    /// Whether the thread was already unwinding when the dispatch started.
    panicking: bool,
}

impl<'a, P: Payload> DispatchGuard<'a, P> {
    fn acquire(inner: &'a Inner<P>, action: &str) -> Result<Self, DispatchError> {
        match inner
            .dispatching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(Self {
                inner,
                panicking: std::thread::panicking(),
            }),
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    dispatcher = %inner.name,
                    action = %action,
                    "rejected dispatch while another dispatch is in progress"
                );
                Err(DispatchError::Reentrant {
                    dispatcher: inner.name.clone(),
                    dispatcher_id: inner.id,
                    action: action.to_owned(),
                })
            }
        }
    }
}

impl<P: Payload> Drop for DispatchGuard<'_, P> {
    fn drop(&mut self) {
        // Only a panic raised inside this dispatch counts as a handler failure.
        if !self.panicking
            && std::thread::panicking()
            && self.inner.policy == FailurePolicy::Poison
        {
            self.inner.poison();
        }
        self.inner.dispatching.store(false, Ordering::Release);
    }
}

/// A named action hub.
///
/// `Dispatcher` is a cheap handle: clones share the same stores, actions and
/// in-progress flag. Stores and actions only ever accumulate; there is no way
/// to disconnect a store or unregister an action.
///
/// # Example
/// ```ignore
/// let dispatcher = Dispatcher::<u32>::new("cart");
/// dispatcher.connect_to(cart_store.clone());
/// dispatcher.dispatch("addItem", &3)?;
/// ```
pub struct Dispatcher<P: Payload> {
    inner: Arc<Inner<P>>,
}

impl<P: Payload> Dispatcher<P> {
    /// Create a dispatcher with the default [`FailurePolicy`].
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_policy(name, FailurePolicy::default())
    }

    /// Create a dispatcher with an explicit [`FailurePolicy`].
    pub fn with_policy(name: impl Into<Arc<str>>, policy: FailurePolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                name: name.into(),
                policy,
                stores: RwLock::new(Vec::new()),
                actions: RwLock::new(IndexMap::new()),
                handler_names: HandlerNameCache::new(),
                dispatching: AtomicBool::new(false),
                poisoned: AtomicBool::new(false),
            }),
        }
    }

    /// Start configuring a dispatcher.
    pub fn builder(name: impl Into<String>) -> DispatcherBuilder<P> {
        DispatcherBuilder::new(name)
    }

    /// The dispatcher's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Process-unique instance id.
    ///
    /// Dispatchers may share a name; the id tells them apart and is carried
    /// by [`DispatchError::Reentrant`]. Clones share the id.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// The failure policy this dispatcher was built with.
    pub fn failure_policy(&self) -> FailurePolicy {
        self.inner.policy
    }

    /// Register an action, creating its entry point if needed.
    ///
    /// Registering a known action is a no-op and returns the existing entry
    /// point. Fails only for an empty action name.
    pub fn register_action(&self, action: &str) -> Result<Action<P>, DispatchError> {
        let entry = self.entry(action)?;
        Ok(Action {
            dispatcher: self.clone(),
            entry,
        })
    }

    /// Get the entry point of a registered action.
    pub fn action(&self, action: &str) -> Option<Action<P>> {
        let entry = self.inner.actions().get(action).cloned()?;
        Some(Action {
            dispatcher: self.clone(),
            entry,
        })
    }

    /// Check whether `action` has been registered.
    pub fn has_action(&self, action: &str) -> bool {
        self.inner.actions().contains_key(action)
    }

    /// Registered action names, in registration order.
    pub fn action_names(&self) -> Vec<String> {
        self.inner
            .actions()
            .keys()
            .map(|name| name.to_string())
            .collect()
    }

    /// Connect one store or an ordered sequence of stores.
    ///
    /// Stores already connected (same allocation) are skipped, so connecting
    /// twice never causes a double notification. Returns how many stores were
    /// newly connected.
    pub fn connect_to(&self, stores: impl IntoStores<P>) -> usize {
        let mut connected = self.inner.stores_mut();
        let mut added = 0;
        for store in stores.into_stores() {
            if connected.iter().any(|existing| existing.ptr_eq(&store)) {
                continue;
            }
            connected.push(store);
            added += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            dispatcher = %self.inner.name,
            added,
            total = connected.len(),
            "connected stores"
        );

        added
    }

    /// Number of connected stores.
    pub fn store_count(&self) -> usize {
        self.inner.stores().len()
    }

    /// Check whether `store` is connected.
    pub fn is_connected(&self, store: &StoreRef<P>) -> bool {
        self.inner
            .stores()
            .iter()
            .any(|existing| existing.ptr_eq(store))
    }

    /// Dispatch an action to every connected store that handles it.
    ///
    /// Unknown actions are registered on the fly. Returns
    /// [`DispatchError::Reentrant`] if this dispatcher is already dispatching,
    /// [`DispatchError::Poisoned`] if it was poisoned, and
    /// [`DispatchError::Handler`] with the handler's own error if a store
    /// handler fails.
    pub fn dispatch(&self, action: &str, payload: &P) -> Result<(), DispatchError> {
        let entry = self.entry(action)?;
        self.run(&entry, payload)
    }

    /// Check whether a dispatch is currently running.
    pub fn is_dispatching(&self) -> bool {
        self.inner.dispatching.load(Ordering::Acquire)
    }

    /// Check whether a handler failure poisoned this dispatcher.
    ///
    /// Always `false` under [`FailurePolicy::Release`].
    pub fn is_poisoned(&self) -> bool {
        self.inner.poisoned.load(Ordering::Acquire)
    }

    /// Check whether both handles refer to the same dispatcher.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn entry(&self, action: &str) -> Result<Arc<ActionEntry>, DispatchError> {
        if action.is_empty() {
            return Err(DispatchError::InvalidAction {
                dispatcher: self.inner.name.clone(),
            });
        }
        if let Some(entry) = self.inner.actions().get(action) {
            return Ok(entry.clone());
        }

        let mut actions = self.inner.actions_mut();
        if let Some(entry) = actions.get(action) {
            return Ok(entry.clone());
        }
        let name: Arc<str> = Arc::from(action);
        let entry = Arc::new(ActionEntry {
            name: name.clone(),
            handler_name: self.inner.handler_names.resolve(action),
        });
        actions.insert(name, entry.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            dispatcher = %self.inner.name,
            action = %entry.name,
            handler = %entry.handler_name,
            "registered action"
        );

        Ok(entry)
    }

    fn run(&self, entry: &ActionEntry, payload: &P) -> Result<(), DispatchError> {
        let inner = &*self.inner;
        let _guard = DispatchGuard::acquire(inner, &entry.name)?;
        if inner.poisoned.load(Ordering::Acquire) {
            return Err(DispatchError::Poisoned {
                dispatcher: inner.name.clone(),
            });
        }

        let stores = inner.stores().clone();
        let mut invoked = 0usize;
        for (index, store) in stores.iter().enumerate() {
            let Some(handler) = store.handler(&entry.handler_name) else {
                continue;
            };

            #[cfg(feature = "tracing")]
            tracing::trace!(
                dispatcher = %inner.name,
                handler = %entry.handler_name,
                store = index,
                "invoking handler"
            );

            if let Err(err) = handler.call(payload) {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    dispatcher = %inner.name,
                    action = %entry.name,
                    store = index,
                    error = %err,
                    "handler failed, aborting fan-out"
                );
                #[cfg(not(feature = "tracing"))]
                let _ = index;

                if inner.policy == FailurePolicy::Poison {
                    inner.poison();
                }
                return Err(DispatchError::Handler(err));
            }
            invoked += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            dispatcher = %inner.name,
            action = %entry.name,
            handlers = invoked,
            "dispatched action"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = invoked;

        Ok(())
    }
}

impl<P: Payload> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Payload> fmt::Debug for Dispatcher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("policy", &self.inner.policy)
            .field("stores", &self.store_count())
            .field("actions", &self.action_names())
            .field("dispatching", &self.is_dispatching())
            .field("poisoned", &self.is_poisoned())
            .finish()
    }
}

/// The callable entry point of one action on one dispatcher.
///
/// Calling it is the same as `dispatcher.dispatch(name, payload)`,
/// reentrancy guard included.
pub struct Action<P: Payload> {
    dispatcher: Dispatcher<P>,
    entry: Arc<ActionEntry>,
}

impl<P: Payload> Action<P> {
    /// The action name.
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// The handler name stores are queried with.
    pub fn handler_name(&self) -> &str {
        &self.entry.handler_name
    }

    /// The dispatcher this entry point belongs to.
    pub fn dispatcher(&self) -> &Dispatcher<P> {
        &self.dispatcher
    }

    /// Fan `payload` out to the dispatcher's stores.
    pub fn call(&self, payload: &P) -> Result<(), DispatchError> {
        self.dispatcher.run(&self.entry, payload)
    }

    /// Check whether both values are the same entry point.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entry, &other.entry)
    }
}

impl<P: Payload> Clone for Action<P> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            entry: self.entry.clone(),
        }
    }
}

impl<P: Payload> fmt::Debug for Action<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("dispatcher", &self.dispatcher.inner.name)
            .field("name", &self.entry.name)
            .field("handler_name", &self.entry.handler_name)
            .finish()
    }
}
