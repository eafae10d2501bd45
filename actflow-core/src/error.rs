//! Error types for actflow.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`ActflowError`] - Top-level error type for all actflow operations
//! - [`DispatchError`] - Errors raised while dispatching an action
//! - [`RegistryError`] - Errors raised while creating dispatchers

use std::sync::Arc;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all actflow operations.
#[derive(Error, Debug)]
pub enum ActflowError {
    /// An error occurred while creating or registering a dispatcher.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// An error occurred during dispatch.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised when creating dispatchers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The dispatcher name was empty.
    #[error("dispatcher name must not be empty")]
    InvalidName,

    /// An initial action name was empty.
    #[error("dispatcher `{dispatcher}` was given an empty action name")]
    InvalidAction {
        /// Name of the dispatcher being built.
        dispatcher: Arc<str>,
    },
}

/// Errors raised while dispatching an action.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// `dispatch` was called while the same dispatcher was already dispatching.
    ///
    /// This is an architectural violation: a store handler tried to emit a
    /// new action synchronously on the dispatcher that is notifying it.
    #[error(
        "cannot dispatch `{action}` on dispatcher `{dispatcher}` (#{dispatcher_id}) while another dispatch is in progress"
    )]
    Reentrant {
        /// Name of the dispatcher.
        dispatcher: Arc<str>,
        /// Instance id of the dispatcher; tells apart dispatchers sharing a name.
        dispatcher_id: u64,
        /// The action whose dispatch was rejected.
        action: String,
    },

    /// The action name was empty.
    #[error("dispatcher `{dispatcher}` was given an empty action name")]
    InvalidAction {
        /// Name of the dispatcher.
        dispatcher: Arc<str>,
    },

    /// A handler failed earlier and the dispatcher poisons itself on failure.
    #[error("dispatcher `{dispatcher}` is poisoned by an earlier handler failure")]
    Poisoned {
        /// Name of the dispatcher.
        dispatcher: Arc<str>,
    },

    /// A store handler returned an error. The error is passed through unmodified.
    #[error(transparent)]
    Handler(BoxError),
}

impl DispatchError {
    /// Returns `true` for [`DispatchError::Reentrant`].
    pub fn is_reentrant(&self) -> bool {
        matches!(self, DispatchError::Reentrant { .. })
    }

    /// Returns `true` for [`DispatchError::Poisoned`].
    pub fn is_poisoned(&self) -> bool {
        matches!(self, DispatchError::Poisoned { .. })
    }

    /// Find a reentrancy violation in this error.
    ///
    /// A handler that propagates a rejected nested dispatch with `?` makes the
    /// outer dispatch fail with [`DispatchError::Handler`] wrapping the
    /// [`DispatchError::Reentrant`]; this looks through such wrapping.
    pub fn reentrancy(&self) -> Option<&DispatchError> {
        match self {
            DispatchError::Reentrant { .. } => Some(self),
            DispatchError::Handler(err) => err.downcast_ref::<DispatchError>()?.reentrancy(),
            _ => None,
        }
    }

    /// Recover the error a store handler returned, or give `self` back.
    pub fn into_handler_error(self) -> Result<BoxError, Self> {
        match self {
            DispatchError::Handler(err) => Ok(err),
            other => Err(other),
        }
    }
}

// Convenience conversions
impl From<BoxError> for ActflowError {
    fn from(err: BoxError) -> Self {
        ActflowError::Custom(err)
    }
}

impl From<BoxError> for DispatchError {
    fn from(err: BoxError) -> Self {
        DispatchError::Handler(err)
    }
}
