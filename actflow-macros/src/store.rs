//! The `#[store]` attribute.

use actflow_core::handler_name;
use heck::ToLowerCamelCase;
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{
    Attribute, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, Token, Type,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[store]` macro.
pub(crate) struct StoreArgs {
    pub payload: Option<Type>,
}

impl Parse for StoreArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut payload = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "payload" => {
                    payload = Some(input.parse()?);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(StoreArgs { payload })
    }
}

/// A method that becomes a store handler.
struct HandlerMethod {
    method: Ident,
    handler_name: String,
    payload: Type,
}

/// Remove `#[action("...")]` from `attrs`, returning its name.
fn take_action_attr(attrs: &mut Vec<Attribute>) -> syn::Result<Option<LitStr>> {
    let mut action = None;
    let mut kept = Vec::with_capacity(attrs.len());
    for attr in attrs.drain(..) {
        if !attr.path().is_ident("action") {
            kept.push(attr);
            continue;
        }
        if action.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[action] attribute"));
        }
        action = Some(attr.parse_args::<LitStr>()?);
    }
    *attrs = kept;
    Ok(action)
}

fn handler_method(method: &mut ImplItemFn) -> syn::Result<Option<HandlerMethod>> {
    let action = match take_action_attr(&mut method.attrs)? {
        Some(lit) => {
            let action = lit.value();
            if action.is_empty() {
                return Err(syn::Error::new_spanned(lit, "action name must not be empty"));
            }
            action
        }
        None => match method.sig.ident.to_string().strip_prefix("on_") {
            Some(rest) if !rest.is_empty() => rest.to_lower_camel_case(),
            _ => return Ok(None),
        },
    };

    let sig = &method.sig;
    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            sig.asyncness,
            "store handlers must be synchronous",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "store handlers cannot be generic",
        ));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                "store handlers must take `&self`",
            ));
        }
    }

    let payload = match inputs.next() {
        Some(FnArg::Typed(pat_type)) => match &*pat_type.ty {
            Type::Reference(type_ref) if type_ref.mutability.is_none() => (*type_ref.elem).clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "store handler payload must be a shared reference (&Payload)",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                "store handlers must take the payload: fn(&self, payload: &Payload)",
            ));
        }
    };

    if let Some(extra) = inputs.next() {
        return Err(syn::Error::new_spanned(
            extra,
            "store handlers take exactly one payload argument; use a tuple payload for more",
        ));
    }

    Ok(Some(HandlerMethod {
        method: sig.ident.clone(),
        handler_name: handler_name(&action),
        payload,
    }))
}

fn same_type(a: &Type, b: &Type) -> bool {
    a.to_token_stream().to_string() == b.to_token_stream().to_string()
}

/// Implementation of the `#[store]` macro.
pub fn store_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as StoreArgs);
    let mut input = parse_macro_input!(item as ItemImpl);

    if let Some((_, path, _)) = &input.trait_ {
        return syn::Error::new_spanned(path, "#[store] goes on an inherent impl block")
            .to_compile_error()
            .into();
    }

    let mut handlers: Vec<HandlerMethod> = Vec::new();
    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        match handler_method(method) {
            Ok(Some(handler)) => {
                if handlers.iter().any(|h| h.handler_name == handler.handler_name) {
                    return syn::Error::new_spanned(
                        &handler.method,
                        format!("another method already handles `{}`", handler.handler_name),
                    )
                    .to_compile_error()
                    .into();
                }
                handlers.push(handler);
            }
            Ok(None) => {}
            Err(err) => return err.to_compile_error().into(),
        }
    }

    let payload = match (&args.payload, handlers.first()) {
        (Some(payload), _) => payload.clone(),
        (None, Some(first)) => {
            if let Some(other) = handlers.iter().find(|h| !same_type(&h.payload, &first.payload)) {
                return syn::Error::new_spanned(
                    &other.method,
                    "store handlers disagree on the payload type; set it with #[store(payload = Type)]",
                )
                .to_compile_error()
                .into();
            }
            first.payload.clone()
        }
        (None, None) => {
            return syn::Error::new_spanned(
                &input.self_ty,
                "no store handlers found; name methods `on_<action>` or mark them #[action(\"name\")]",
            )
            .to_compile_error()
            .into();
        }
    };

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();
    let arms = handlers.iter().map(|handler| {
        let name = &handler.handler_name;
        let method = &handler.method;
        quote! {
            #name => ::core::option::Option::Some(::actflow::Handler::new(
                move |payload: &#payload| Self::#method(self, payload),
            )),
        }
    });

    let expanded = quote! {
        #input

        impl #impl_generics ::actflow::Store<#payload> for #self_ty #where_clause {
            fn handler<'__actflow>(
                &'__actflow self,
                handler_name: &'__actflow str,
            ) -> ::core::option::Option<::actflow::Handler<'__actflow, #payload>> {
                match handler_name {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    TokenStream::from(expanded)
}
