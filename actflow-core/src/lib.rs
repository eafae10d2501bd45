//! # actflow-core
//!
//! Core traits for the actflow action dispatcher.
//!
//! This crate has minimal dependencies and is meant to be imported by store
//! implementations that don't need the dispatcher itself.
//!
//! # Model
//!
//! Callers emit named actions; a dispatcher fans each action out to the
//! stores connected to it; stores react and update their own state.
//!
//! - [`Store`] - a subscriber, queried by handler name for an optional [`Handler`]
//! - [`handler_name`] - the `action` → `onAction` naming convention
//! - [`HandlerNameCache`] - memoized derivation, shared by a dispatcher's actions
//! - [`StoreRef`] - a shared store handle compared by identity
//!
//! # Error Types
//!
//! - [`ActflowError`] - Top-level error type
//! - [`DispatchError`] - Errors raised by `dispatch`
//! - [`RegistryError`] - Errors raised when creating dispatchers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod handler_name;
mod payload;
mod response;
mod store;

// Re-exports
pub use error::{ActflowError, BoxError, DispatchError, RegistryError};
pub use handler_name::{HandlerNameCache, handler_name};
pub use payload::Payload;
pub use response::{HandlerResult, IntoHandlerResult};
pub use store::{Handler, IntoStores, Store, StoreRef};
