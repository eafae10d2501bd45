//! Testing utilities for actflow.
//!
//! This module provides stores that make it easy to observe what a dispatcher
//! does.
//!
//! # Features
//!
//! - [`RecordingStore`]: records every handler call with its payload
//! - [`CountingStore`]: counts handler calls
//! - [`FailingStore`]: a store whose handlers always fail
//!
//! Each store answers every handler name unless built with `only`.

use actflow_core::{Handler, Payload, Store};
use std::{
    collections::HashSet,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};
use thiserror::Error;

/// The set of handler names a test store answers.
#[derive(Debug, Clone, Default)]
enum Answers {
    #[default]
    All,
    Only(HashSet<String>),
}

impl Answers {
    fn only<I, S>(handlers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answers::Only(handlers.into_iter().map(Into::into).collect())
    }

    fn contains(&self, handler_name: &str) -> bool {
        match self {
            Answers::All => true,
            Answers::Only(names) => names.contains(handler_name),
        }
    }
}

// ============================================================================
// Recording Store
// ============================================================================

/// A store that records every handler call it receives.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = Arc::new(RecordingStore::<u32>::new());
/// dispatcher.connect_to(recorder.clone());
///
/// dispatcher.dispatch("addItem", &3)?;
/// assert_eq!(recorder.payloads("onAddItem"), vec![3]);
/// ```
#[derive(Debug)]
pub struct RecordingStore<P> {
    answers: Answers,
    calls: Mutex<Vec<(String, P)>>,
}

impl<P: Clone> RecordingStore<P> {
    /// Create a recording store that answers every handler name.
    pub fn new() -> Self {
        Self {
            answers: Answers::All,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a recording store that only answers the given handler names.
    pub fn only<I, S>(handlers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Answers::only(handlers),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, P)>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a clone of all recorded `(handler name, payload)` pairs.
    pub fn calls(&self) -> Vec<(String, P)> {
        self.lock().clone()
    }

    /// Get the handler names called so far, in call order.
    pub fn handler_names(&self) -> Vec<String> {
        self.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Get the payloads received by one handler, in call order.
    pub fn payloads(&self, handler_name: &str) -> Vec<P> {
        self.lock()
            .iter()
            .filter(|(name, _)| name == handler_name)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<P: Clone> Default for RecordingStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload + Clone> Store<P> for RecordingStore<P> {
    fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, P>> {
        if !self.answers.contains(handler_name) {
            return None;
        }
        Some(Handler::new(move |payload: &P| {
            self.lock().push((handler_name.to_owned(), payload.clone()));
        }))
    }
}

// ============================================================================
// Counting Store
// ============================================================================

/// A store that counts handler calls, for any payload type.
#[derive(Debug, Default)]
pub struct CountingStore {
    answers: Answers,
    count: AtomicUsize,
}

impl CountingStore {
    /// Create a counting store that answers every handler name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counting store that only answers the given handler names.
    pub fn only<I, S>(handlers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Answers::only(handlers),
            count: AtomicUsize::new(0),
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<P: Payload> Store<P> for CountingStore {
    fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, P>> {
        if !self.answers.contains(handler_name) {
            return None;
        }
        Some(Handler::new(move |_: &P| {
            self.count.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

// ============================================================================
// Failing Store
// ============================================================================

/// The error returned by [`FailingStore`] handlers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("store refused `{handler}`")]
pub struct StoreRefused {
    /// The handler that was called.
    pub handler: String,
}

/// A store whose handlers fail with [`StoreRefused`].
#[derive(Debug)]
pub struct FailingStore {
    answers: Answers,
    attempts: AtomicUsize,
}

impl FailingStore {
    /// Create a store that fails on the given handler names.
    pub fn new<I, S>(handlers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Answers::only(handlers),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Create a store that fails on every handler name.
    pub fn always() -> Self {
        Self {
            answers: Answers::All,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Get the number of failed calls.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl<P: Payload> Store<P> for FailingStore {
    fn handler<'a>(&'a self, handler_name: &'a str) -> Option<Handler<'a, P>> {
        if !self.answers.contains(handler_name) {
            return None;
        }
        Some(Handler::new(move |_: &P| -> Result<(), StoreRefused> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StoreRefused {
                handler: handler_name.to_owned(),
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_store_filters_handlers() {
        let store = RecordingStore::<u32>::only(["onLoad"]);
        assert!(Store::<u32>::has_handler(&store, "onLoad"));
        assert!(!Store::<u32>::has_handler(&store, "onSave"));

        store.handler("onLoad").unwrap().call(&1).unwrap();
        store.handler("onLoad").unwrap().call(&2).unwrap();
        assert_eq!(store.payloads("onLoad"), vec![1, 2]);
        assert_eq!(store.handler_names(), vec!["onLoad", "onLoad"]);
        assert_eq!(store.count(), 2);

        store.clear();
        assert!(store.calls().is_empty());
    }

    #[test]
    fn counting_store_counts_any_payload() {
        let store = CountingStore::only(["onTick"]);
        assert!(Store::<String>::handler(&store, "onTock").is_none());

        Store::<String>::handler(&store, "onTick")
            .unwrap()
            .call(&"now".to_string())
            .unwrap();
        Store::<u8>::handler(&store, "onTick").unwrap().call(&1).unwrap();
        assert_eq!(store.count(), 2);

        store.reset();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn failing_store_reports_handler() {
        let store = FailingStore::always();
        let err = Store::<u32>::handler(&store, "onSave")
            .unwrap()
            .call(&1)
            .unwrap_err();

        let refused = err.downcast_ref::<StoreRefused>().unwrap();
        assert_eq!(refused.handler, "onSave");
        assert_eq!(store.attempts(), 1);
    }
}
