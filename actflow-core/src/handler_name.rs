//! Handler name derivation.
//!
//! A store subscribes to action `addItem` by exposing a handler named
//! `onAddItem`: the action name with its first character uppercased,
//! prefixed by `on`.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// Derive the handler name for an action.
///
/// Action names must be non-empty; for `""` this returns the bare `"on"`
/// prefix, which no dispatcher will ever look up.
///
/// ```
/// use actflow_core::handler_name;
///
/// assert_eq!(handler_name("addItem"), "onAddItem");
/// assert_eq!(handler_name("load"), "onLoad");
/// ```
pub fn handler_name(action: &str) -> String {
    let mut chars = action.chars();
    let mut name = String::with_capacity(action.len() + 2);
    name.push_str("on");
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name
}

/// Memoized [`handler_name`].
///
/// Entries are never invalidated; a cached name is always equal to a fresh
/// derivation.
#[derive(Debug, Default)]
pub struct HandlerNameCache {
    names: Mutex<HashMap<Box<str>, Arc<str>>>,
}

impl HandlerNameCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the handler name for `action`, deriving it on first use.
    pub fn resolve(&self, action: &str) -> Arc<str> {
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(name) = names.get(action) {
            return name.clone();
        }
        let name: Arc<str> = handler_name(action).into();
        names.insert(action.into(), name.clone());
        name
    }

    /// Number of cached names.
    pub fn len(&self) -> usize {
        self.names.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_on_prefix_and_capital() {
        assert_eq!(handler_name("addItem"), "onAddItem");
        assert_eq!(handler_name("a"), "onA");
        assert_eq!(handler_name("Load"), "onLoad");
        assert_eq!(handler_name("load_data"), "onLoad_data");
    }

    #[test]
    fn uppercases_non_ascii_first_char() {
        assert_eq!(handler_name("élan"), "onÉlan");
        // Uppercasing may widen the first character.
        assert_eq!(handler_name("ßtraße"), "onSStraße");
    }

    #[test]
    fn empty_action_yields_bare_prefix() {
        assert_eq!(handler_name(""), "on");
    }

    #[test]
    fn cache_matches_fresh_derivation() {
        let cache = HandlerNameCache::new();
        assert!(cache.is_empty());

        for action in ["load", "addItem", "load", "x"] {
            assert_eq!(&*cache.resolve(action), handler_name(action));
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn cache_returns_same_allocation() {
        let cache = HandlerNameCache::new();
        let first = cache.resolve("addItem");
        let second = cache.resolve("addItem");
        assert!(Arc::ptr_eq(&first, &second));
    }
}
