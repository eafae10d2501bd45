#![allow(dead_code)]

use actflow::{Dispatcher, DispatchError, Handler, Store};
use std::sync::{Arc, Mutex, OnceLock};

// ============================================================================
// Test Payload Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum CartPayload {
    Qty(u32),
    Sku(String),
    Empty,
}

// ============================================================================
// Test Stores
// ============================================================================

/// Appends every `onAddItem` quantity to `log`.
#[derive(Default)]
pub struct CartStore {
    pub log: Mutex<Vec<u32>>,
}

impl Store<u32> for CartStore {
    fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, u32>> {
        match handler_name {
            "onAddItem" => Some(Handler::new(move |qty: &u32| {
                self.log.lock().unwrap().push(*qty);
            })),
            _ => None,
        }
    }
}

/// Pushes `id` to a shared order log for each handler name it answers.
pub struct OrderRecordingStore {
    pub id: usize,
    pub order: Arc<Mutex<Vec<usize>>>,
    pub handles: Vec<&'static str>,
}

impl<P: actflow::Payload> Store<P> for OrderRecordingStore {
    fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, P>> {
        if !self.handles.iter().any(|handled| *handled == handler_name) {
            return None;
        }
        Some(Handler::new(move |_: &P| {
            self.order.lock().unwrap().push(self.id);
        }))
    }
}

/// Re-dispatches `forward` on `target` from its `onTrigger` handler.
///
/// The outcome of the nested dispatch is kept in `outcomes`; with
/// `propagate` set, a failure is also returned from the handler.
pub struct ForwardingStore {
    pub target: OnceLock<Dispatcher<u32>>,
    pub forward: &'static str,
    pub propagate: bool,
    pub outcomes: Mutex<Vec<Result<(), String>>>,
}

impl ForwardingStore {
    pub fn new(forward: &'static str, propagate: bool) -> Self {
        Self {
            target: OnceLock::new(),
            forward,
            propagate,
            outcomes: Mutex::new(Vec::new()),
        }
    }

    pub fn point_at(&self, dispatcher: &Dispatcher<u32>) {
        let _ = self.target.set(dispatcher.clone());
    }

    fn trigger(&self, payload: &u32) -> Result<(), DispatchError> {
        let Some(target) = self.target.get() else {
            return Ok(());
        };
        let result = target.dispatch(self.forward, payload);
        self.outcomes
            .lock()
            .unwrap()
            .push(result.as_ref().map(|_| ()).map_err(|e| e.to_string()));
        match result {
            Err(err) if self.propagate => Err(err),
            _ => Ok(()),
        }
    }
}

impl Store<u32> for ForwardingStore {
    fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, u32>> {
        (handler_name == "onTrigger").then(|| Handler::new(move |payload: &u32| self.trigger(payload)))
    }
}
