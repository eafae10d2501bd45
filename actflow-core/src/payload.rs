//! Payload trait for action data.

/// A marker trait for data carried by a dispatched action.
///
/// Payloads must be `Send + Sync + 'static` so that dispatchers and their
/// stores can be shared across threads. Every such type is a payload; use a
/// tuple to forward several positional values to handlers at once.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::<(u32, String)>::new("cart");
/// dispatcher.dispatch("addItem", &(3, "apple".to_string()))?;
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Payload",
    label = "must be `Send + Sync + 'static`",
    note = "Action payloads must be thread-safe and static."
)]
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}
