//! Handler output conversion.

use crate::error::BoxError;

/// What every store handler ultimately returns.
pub type HandlerResult = Result<(), BoxError>;

/// Trait for converting a handler method's output into a [`HandlerResult`].
///
/// # Default Implementations
///
/// - `()` → success
/// - `Result<(), E>` → success, or the error boxed as [`BoxError`]
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a store handler",
    label = "missing `IntoHandlerResult` implementation",
    note = "Store handlers must return `()` or `Result<(), E>` where `E: Into<BoxError>`."
)]
pub trait IntoHandlerResult {
    /// Convert the output into a handler result.
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> HandlerResult {
        Ok(())
    }
}

impl<E> IntoHandlerResult for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map_err(Into::into)
    }
}
