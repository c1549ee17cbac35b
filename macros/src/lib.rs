//! Derive macros for Shoplist
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `shoplist_core::Action` for an action enum
//!
//! # Example
//!
//! ```ignore
//! use shoplist_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum ListAction {
//!     AddShoppingList { name: String },
//!     #[action(rename = "CLEAR")]
//!     ClearAll,
//! }
//!
//! // Generated:
//! assert_eq!(ListAction::ClearAll.action_type(), "CLEAR");
//! assert_eq!(ListAction::ACTION_TYPES, &["ADD_SHOPPING_LIST", "CLEAR"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive macro for Action enums
///
/// Generates:
/// - `impl shoplist_core::Action` whose `action_type()` returns the variant
///   name in `SCREAMING_SNAKE_CASE` (`AddItem` becomes `ADD_ITEM`)
/// - an inherent `ACTION_TYPES` constant listing every tag in declaration order
///
/// # Attributes
///
/// - `#[action(rename = "TAG")]` - Use `TAG` instead of the derived name
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - An `#[action(...)]` attribute is malformed
/// - Two variants end up with the same tag
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut tags: Vec<String> = Vec::new();
    let mut arms = Vec::new();

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;

        let tag = match renamed(&variant.attrs) {
            Ok(Some(tag)) => tag,
            Ok(None) => screaming_snake_case(&variant_name.to_string()),
            Err(error) => return error.to_compile_error().into(),
        };

        if tags.contains(&tag) {
            return syn::Error::new_spanned(
                variant,
                format!("Action type \"{tag}\" is used by more than one variant"),
            )
            .to_compile_error()
            .into();
        }

        arms.push(match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } => #tag, },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) => #tag, },
            Fields::Unit => quote! { Self::#variant_name => #tag, },
        });
        tags.push(tag);
    }

    // An empty enum has no values, so `match *self {}` is exhaustive.
    let body = if arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#arms)*
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Every action type tag of this enum, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#tags),*];
        }

        impl #impl_generics ::shoplist_core::action::Action for #name #ty_generics #where_clause {
            fn action_type(&self) -> &'static str {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}

/// Reads `#[action(rename = "...")]` from a variant's attributes
fn renamed(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut tag = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                tag = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `rename`"))
            }
        })?;
    }

    Ok(tag)
}

/// `AddShoppingList` -> `ADD_SHOPPING_LIST`
fn screaming_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (index, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && index > 0 {
            let prev = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(ch.to_uppercase());
    }

    out
}
