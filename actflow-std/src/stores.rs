//! Standard store implementations.
//!
//! - [`LoggingStore`] - logs every action it sees
//! - [`FnStore`] - a store assembled from closures, one per action

use actflow_core::{Handler, HandlerResult, IntoHandlerResult, Payload, Store, handler_name};
use std::{collections::HashMap, fmt};

/// A store that logs every action dispatched to it.
///
/// It answers every handler name, so connecting it to a dispatcher produces
/// one `info` event per dispatched action when the `tracing` feature is on.
#[derive(Debug, Clone)]
pub struct LoggingStore {
    label: &'static str,
}

impl LoggingStore {
    /// Create a logging store; `label` appears as the `store` field.
    pub const fn new(label: &'static str) -> Self {
        Self { label }
    }

    /// The label used in log events.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Default for LoggingStore {
    fn default() -> Self {
        Self::new("actflow")
    }
}

impl<P: Payload + fmt::Debug> Store<P> for LoggingStore {
    fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, P>> {
        Some(Handler::new(move |payload: &P| {
            #[cfg(feature = "tracing")]
            tracing::info!(store = %self.label, handler = %handler_name, ?payload, "action received");
            #[cfg(not(feature = "tracing"))]
            let _ = (handler_name, payload);
        }))
    }
}

type BoxedHandler<P> = Box<dyn Fn(&P) -> HandlerResult + Send + Sync>;

/// A store built from closures.
///
/// Closures are registered by *action* name; the handler name is derived
/// with the usual convention.
///
/// # Example
///
/// ```rust,ignore
/// let totals = Arc::new(AtomicU32::new(0));
/// let counter = totals.clone();
/// let store = FnStore::new().on("addItem", move |qty: &u32| {
///     counter.fetch_add(*qty, Ordering::SeqCst);
/// });
/// ```
pub struct FnStore<P> {
    handlers: HashMap<String, BoxedHandler<P>>,
}

impl<P: Payload> FnStore<P> {
    /// Create a store with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Handle `action` with `f`, replacing any closure registered for it.
    pub fn on<F, R>(mut self, action: &str, f: F) -> Self
    where
        F: Fn(&P) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        self.handlers.insert(
            handler_name(action),
            Box::new(move |payload: &P| f(payload).into_handler_result()),
        );
        self
    }

    /// Number of handled actions.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no action is handled.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<P: Payload> Default for FnStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for FnStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("FnStore").field("handlers", &names).finish()
    }
}

impl<P: Payload> Store<P> for FnStore<P> {
    fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, P>> {
        let handler = self.handlers.get(handler_name)?;
        Some(Handler::new(move |payload: &P| handler(payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    #[test]
    fn logging_store_answers_everything() {
        let store = LoggingStore::default();
        assert_eq!(store.label(), "actflow");
        assert!(Store::<u32>::has_handler(&store, "onAnything"));
        assert!(Store::<u32>::handler(&store, "onLoad").unwrap().call(&3).is_ok());
    }

    #[test]
    fn fn_store_routes_by_action() {
        let total = Arc::new(AtomicU32::new(0));
        let added = total.clone();
        let removed = total.clone();
        let store = FnStore::new()
            .on("addItem", move |qty: &u32| {
                added.fetch_add(*qty, Ordering::SeqCst);
            })
            .on("removeItem", move |qty: &u32| -> Result<(), String> {
                removed
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(*qty))
                    .map(|_| ())
                    .map_err(|n| format!("cannot remove {qty} from {n}"))
            });
        assert_eq!(store.len(), 2);

        let dispatcher = Dispatcher::<u32>::new("cart");
        dispatcher.connect_to(Arc::new(store));

        dispatcher.dispatch("addItem", &5).unwrap();
        dispatcher.dispatch("removeItem", &2).unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 3);

        let err = dispatcher.dispatch("removeItem", &9).unwrap_err();
        assert_eq!(err.to_string(), "cannot remove 9 from 3");
        dispatcher.dispatch("checkout", &0).unwrap();
    }

    #[test]
    fn fn_store_debug_lists_handlers() {
        let store = FnStore::<u32>::new().on("load", |_: &u32| ()).on("addItem", |_: &u32| ());
        assert_eq!(
            format!("{store:?}"),
            r#"FnStore { handlers: ["onAddItem", "onLoad"] }"#
        );
    }
}
