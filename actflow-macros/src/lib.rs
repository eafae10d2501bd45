//! Procedural macros for actflow.
//!
//! - `#[store]` - implements `Store` from an `impl` block of handler methods

use proc_macro::TokenStream;

mod store;

/// Implement `actflow::Store` for a type from its handler methods.
///
/// Every method named `on_<action>` taking `&self` and one `&Payload`
/// argument becomes the handler for the lower camel case action
/// (`on_add_item` handles `addItem`, i.e. handler `onAddItem`). Use
/// `#[action("raw_name")]` on a method to name its action explicitly; such a
/// method does not need the `on_` prefix.
///
/// Handler methods return `()` or `Result<(), E>` with `E: Into<BoxError>`.
///
/// # Arguments
///
/// - `payload = Type`: the payload type. Optional; inferred from the handler
///   methods otherwise.
///
/// # Example
///
/// ```rust,ignore
/// #[actflow::store]
/// impl CartStore {
///     fn on_add_item(&self, qty: &u32) {
///         self.items.lock().unwrap().push(*qty);
///     }
///
///     #[action("reset_all")]
///     fn clear(&self, limit: &u32) -> Result<(), String> {
///         if *limit == 0 {
///             return Err("nothing to clear".into());
///         }
///         self.items.lock().unwrap().clear();
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn store(attr: TokenStream, item: TokenStream) -> TokenStream {
    store::store_impl(attr, item)
}
