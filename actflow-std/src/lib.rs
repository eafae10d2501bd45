//! # actflow-std
//!
//! Standard implementations for the actflow action dispatcher.
//!
//! This crate provides:
//! - **Dispatching**: [`Dispatcher`], [`Action`] entry points, [`DispatcherBuilder`]
//! - **Naming**: [`Registry`] of dispatchers by name
//! - **Standard stores**: [`stores::LoggingStore`]
//! - **Testing**: recording, counting and failing stores in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use actflow_core;

// Modules
pub mod builder;
pub mod dispatcher;
pub mod registry;
pub mod stores;
pub mod testing;

pub use builder::{DispatcherBuilder, FailurePolicy, IntoActionNames};
pub use dispatcher::{Action, Dispatcher};
pub use registry::Registry;
