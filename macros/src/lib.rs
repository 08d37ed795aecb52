//! Procedural macros for the command-bind record contract.
//!
//! This crate provides `#[derive(Bindable)]`, which implements the
//! `command_bind_core::Bindable` trait for a struct with named fields. Each
//! field's `#[bind("...")]` annotation is carried verbatim into the raw
//! field list; the schema analyzer in `command-bind-core` owns the grammar
//! and reports annotation mistakes at registration time.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Type, parse_macro_input};

/// Implements the `Bindable` record contract for a named-fields struct.
///
/// Supported field types: `String`, `bool`, `i8` through `i64`, `u8`
/// through `u32`, `f32`, `f64`, and `Vec<String>`. Narrow integer fields
/// are widened to `i64` in the value model and checked against the
/// destination range when set. Fields without a `#[bind]` attribute get an
/// empty annotation, which the analyzer fills with defaults derived from
/// the field identifier.
///
/// # Example
///
/// ```ignore
/// use command_bind_core::Bindable;
///
/// #[derive(Debug, Default, Bindable)]
/// struct ServeArgs {
///     #[bind("p,port,Listen port,default=8080|env=SERVE_PORT")]
///     port: u16,
///     #[bind("v,verbose,Verbose output,")]
///     verbose: bool,
/// }
/// ```
///
/// Runnable examples live in the `command-bind-core` documentation.
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

enum FieldKind {
    Text,
    Bool,
    Int,
    NarrowInt,
    Float,
    NarrowFloat,
    TextSeq,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Bindable can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &data.fields,
            "Bindable requires a struct with named fields",
        ));
    };

    let value = quote!(::command_bind_core::FieldValue);
    let set_error = quote!(::command_bind_core::SetError);

    let mut raw_fields = Vec::new();
    let mut get_arms = Vec::new();
    let mut set_arms = Vec::new();

    for field in &fields.named {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "Bindable fields must be named"))?;
        let name = ident.to_string();
        let ty = &field.ty;
        let Some(kind) = field_kind(ty) else {
            return Err(syn::Error::new_spanned(
                ty,
                "Bindable fields must be String, bool, i8-i64, u8-u32, f32, f64, or Vec<String>",
            ));
        };
        let annotation = bind_annotation(field)?;

        let kind_token = match kind {
            FieldKind::Text => quote!(::command_bind_core::ValueKind::Text),
            FieldKind::Bool => quote!(::command_bind_core::ValueKind::Bool),
            FieldKind::Int | FieldKind::NarrowInt => quote!(::command_bind_core::ValueKind::Int),
            FieldKind::Float | FieldKind::NarrowFloat => {
                quote!(::command_bind_core::ValueKind::Float)
            }
            FieldKind::TextSeq => quote!(::command_bind_core::ValueKind::TextSeq),
        };

        raw_fields.push(quote! {
            ::command_bind_core::RawField {
                ident: #name,
                kind: #kind_token,
                annotation: #annotation,
            }
        });

        get_arms.push(match kind {
            FieldKind::Text => quote! {
                #name => ::core::option::Option::Some(#value::Text(self.#ident.clone())),
            },
            FieldKind::Bool => quote! {
                #name => ::core::option::Option::Some(#value::Bool(self.#ident)),
            },
            FieldKind::Int => quote! {
                #name => ::core::option::Option::Some(#value::Int(self.#ident)),
            },
            FieldKind::NarrowInt => quote! {
                #name => ::core::option::Option::Some(#value::Int(
                    <i64 as ::core::convert::From<#ty>>::from(self.#ident),
                )),
            },
            FieldKind::Float => quote! {
                #name => ::core::option::Option::Some(#value::Float(self.#ident)),
            },
            FieldKind::NarrowFloat => quote! {
                #name => ::core::option::Option::Some(#value::Float(
                    <f64 as ::core::convert::From<#ty>>::from(self.#ident),
                )),
            },
            FieldKind::TextSeq => quote! {
                #name => ::core::option::Option::Some(#value::TextSeq(self.#ident.clone())),
            },
        });

        set_arms.push(match kind {
            FieldKind::Text => simple_set_arm(&name, ident, &value, &set_error, quote!(Text)),
            FieldKind::Bool => simple_set_arm(&name, ident, &value, &set_error, quote!(Bool)),
            FieldKind::Int => simple_set_arm(&name, ident, &value, &set_error, quote!(Int)),
            FieldKind::NarrowInt => quote! {
                #name => match value {
                    #value::Int(v) => match <#ty as ::core::convert::TryFrom<i64>>::try_from(v) {
                        ::core::result::Result::Ok(v) => {
                            self.#ident = v;
                            ::core::result::Result::Ok(())
                        }
                        ::core::result::Result::Err(_) => {
                            ::core::result::Result::Err(#set_error::OutOfRange)
                        }
                    },
                    _ => ::core::result::Result::Err(#set_error::KindMismatch),
                },
            },
            FieldKind::Float => simple_set_arm(&name, ident, &value, &set_error, quote!(Float)),
            FieldKind::NarrowFloat => quote! {
                #name => match value {
                    #value::Float(v) => {
                        self.#ident = v as f32;
                        ::core::result::Result::Ok(())
                    }
                    _ => ::core::result::Result::Err(#set_error::KindMismatch),
                },
            },
            FieldKind::TextSeq => {
                simple_set_arm(&name, ident, &value, &set_error, quote!(TextSeq))
            }
        });
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::command_bind_core::Bindable for #name #ty_generics #where_clause {
            fn raw_fields() -> &'static [::command_bind_core::RawField] {
                const FIELDS: &[::command_bind_core::RawField] = &[#(#raw_fields),*];
                FIELDS
            }

            fn get(&self, ident: &str) -> ::core::option::Option<::command_bind_core::FieldValue> {
                match ident {
                    #(#get_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set(
                &mut self,
                ident: &str,
                value: ::command_bind_core::FieldValue,
            ) -> ::core::result::Result<(), ::command_bind_core::SetError> {
                match ident {
                    #(#set_arms)*
                    _ => ::core::result::Result::Err(::command_bind_core::SetError::UnknownField),
                }
            }
        }
    })
}

fn simple_set_arm(
    name: &str,
    ident: &syn::Ident,
    value: &TokenStream2,
    set_error: &TokenStream2,
    variant: TokenStream2,
) -> TokenStream2 {
    quote! {
        #name => match value {
            #value::#variant(v) => {
                self.#ident = v;
                ::core::result::Result::Ok(())
            }
            _ => ::core::result::Result::Err(#set_error::KindMismatch),
        },
    }
}

fn field_kind(ty: &Type) -> Option<FieldKind> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    match segment.ident.to_string().as_str() {
        "String" => Some(FieldKind::Text),
        "bool" => Some(FieldKind::Bool),
        "i64" => Some(FieldKind::Int),
        "i8" | "i16" | "i32" | "u8" | "u16" | "u32" => Some(FieldKind::NarrowInt),
        "f64" => Some(FieldKind::Float),
        "f32" => Some(FieldKind::NarrowFloat),
        "Vec" => {
            let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
                return None;
            };
            let mut types = args.args.iter();
            let (Some(syn::GenericArgument::Type(inner)), None) = (types.next(), types.next())
            else {
                return None;
            };
            matches!(field_kind(inner), Some(FieldKind::Text)).then_some(FieldKind::TextSeq)
        }
        _ => None,
    }
}

fn bind_annotation(field: &Field) -> syn::Result<String> {
    let mut found: Option<String> = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("bind") {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[bind] attribute"));
        }
        let literal: LitStr = attr.parse_args()?;
        found = Some(literal.value());
    }
    Ok(found.unwrap_or_default())
}
