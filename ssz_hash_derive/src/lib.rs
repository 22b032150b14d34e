extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input, parse_quote};

/// Field names containing this marker are left out of the generated shape.
const RESERVED_FIELD_MARKER: &str = "XXX";

fn is_reserved(name: &str) -> bool {
    name.contains(RESERVED_FIELD_MARKER)
}

/// Derive `SszType` and `SszValue` for a struct with named fields.
///
/// Fields are hashed in declaration order. Every non-reserved field type
/// must itself implement `SszType`.
#[proc_macro_derive(Ssz)]
pub fn derive_ssz(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let named = match &input.data {
        Data::Struct(ds) => match &ds.fields {
            Fields::Named(named) => named.named.clone(),
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Ssz derive requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Ssz derive only supports structs",
            ));
        }
    };

    let mut descs = Vec::new();
    let mut arms = Vec::new();
    let mut field_types = Vec::new();

    for (selector, f) in named.iter().enumerate() {
        let Some(ident) = f.ident.as_ref() else {
            continue;
        };
        let fname = ident.to_string();
        if is_reserved(&fname) {
            continue;
        }
        let ty = &f.ty;
        descs.push(quote! {
            ::ssz_hash::FieldDesc::new(#fname, #selector, <#ty as ::ssz_hash::SszType>::desc())
        });
        arms.push(quote! {
            #selector => ::core::option::Option::Some(&self.#ident as &dyn ::ssz_hash::SszValue),
        });
        field_types.push(ty.clone());
    }

    if !input.generics.params.is_empty() {
        let where_clause = input.generics.make_where_clause();
        for ty in &field_types {
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::ssz_hash::SszType));
        }
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::ssz_hash::SszType for #ident #ty_generics #where_clause {
            fn shape() -> ::ssz_hash::Shape {
                ::ssz_hash::Shape::Container(::std::vec![ #( #descs ),* ])
            }
        }

        impl #impl_generics ::ssz_hash::SszValue for #ident #ty_generics #where_clause {
            fn type_desc(&self) -> ::ssz_hash::TypeDesc {
                ::ssz_hash::TypeDesc::of::<Self>()
            }

            fn field(&self, selector: usize) -> ::core::option::Option<&dyn ::ssz_hash::SszValue> {
                match selector {
                    #( #arms )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
