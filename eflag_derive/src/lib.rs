mod flag_attr;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields, Visibility, parse_macro_input};

use crate::flag_attr::{FlagAttr, doc_comment};

/// Derives `eflag::Flags` for a struct with named fields.
///
/// Every `pub` field with a `#[flag(...)]` attribute is described; the
/// attribute gives the comma-separated flag names and, optionally, a
/// description. Without `desc` the field's doc comment is used. Fields that
/// are not `pub` are never bound, whatever their attributes say.
#[proc_macro_derive(Flags, attributes(flag))]
pub fn derive_flags(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input_parsed = parse_macro_input!(input as DeriveInput);
    generate_impl(&input_parsed)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => &named.named,
        Data::Struct(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "`Flags` can only be derived for structs with named fields",
            ));
        }
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "`Flags` can only be derived for structs",
            ));
        }
    };

    let mut field_specs = Vec::new();
    for field in fields {
        let mut flag_attrs = field.attrs.iter().filter(|a| a.path().is_ident("flag"));
        let Some(attr) = flag_attrs.next() else {
            continue;
        };
        if let Some(extra) = flag_attrs.next() {
            return Err(syn::Error::new_spanned(
                extra,
                "duplicate `flag` attribute, list every name in one `#[flag(...)]`",
            ));
        }
        let flag_attr: FlagAttr = attr.parse_args()?;
        if !matches!(field.vis, Visibility::Public(_)) {
            continue;
        }
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let ident = field_ident.to_string();
        let ident = ident.trim_start_matches("r#");
        let names = &flag_attr.names;
        let desc = flag_attr
            .desc
            .or_else(|| doc_comment(&field.attrs))
            .unwrap_or_default();
        field_specs.push(quote! {
            ::eflag::FieldSpec::new(#ident, #names, #desc, &mut self.#field_ident)
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::eflag::Flags for #struct_name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::eflag::FieldSpec<'_>> {
                ::std::vec![#(#field_specs),*]
            }
        }
    })
}
