//! `#[derive(Record)]` for bytecraft.
//!
//! Each field may carry `#[bytecraft("<directive>")]` (see `bytecraft::directive`)
//! or `#[bytecraft(hidden)]`. The generated impl builds the record's schema
//! once, on first use, and dispatches to fields by position.

extern crate proc_macro;

mod utils;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use crate::utils::{RecordField, get_record_fields, length_field_names};

#[proc_macro_derive(Record, attributes(bytecraft))]
pub fn record_macro_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let output = impl_record_macro(&ast).unwrap_or_else(syn::Error::into_compile_error);
    proc_macro::TokenStream::from(output)
}

fn impl_record_macro(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;

    // the schema lives in a static, which cannot depend on type parameters
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new(
            ast.generics.params.first().map_or(name.span(), |param| {
                syn::spanned::Spanned::span(param)
            }),
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = get_record_fields(ast)?;
    let length_fields = length_field_names(&fields);

    let descriptors = fields.iter().map(
        |RecordField {
             ty,
             name,
             directive,
             hidden,
             ..
         }| {
            if *hidden {
                quote! { ::bytecraft::Field::hidden(#name) }
            } else {
                quote! {
                    ::bytecraft::Field::new(#name, <#ty as ::bytecraft::Codec>::KIND)
                        .with_directive(#directive)
                }
            }
        },
    );

    let decoders = visible(&fields).map(|(index, RecordField { ident, .. })| {
        quote! {
            #index => ::bytecraft::Codec::decode(&mut self.#ident, reader, ctx, len),
        }
    });

    let encoders = visible(&fields).map(|(index, RecordField { ident, .. })| {
        quote! {
            #index => ::bytecraft::Codec::encode(&self.#ident, writer, ctx),
        }
    });

    let lens = visible(&fields).map(|(index, RecordField { ident, .. })| {
        quote! {
            #index => ::bytecraft::Codec::encoded_len(&self.#ident),
        }
    });

    let sources = visible(&fields)
        .filter(|(_, field)| length_fields.contains(&field.name))
        .map(|(index, RecordField { ident, .. })| {
            quote! {
                #index => ::core::option::Option::Some(&self.#ident as &dyn ::bytecraft::LengthSource),
            }
        });

    let tokens = quote! {
        impl ::bytecraft::Record for #name {
            fn schema() -> ::core::result::Result<&'static ::bytecraft::Schema, ::bytecraft::ConfigError> {
                static SCHEMA: ::std::sync::OnceLock<
                    ::core::result::Result<::bytecraft::Schema, ::bytecraft::ConfigError>,
                > = ::std::sync::OnceLock::new();
                SCHEMA
                    .get_or_init(|| ::bytecraft::Schema::compile(&[#(#descriptors),*]))
                    .as_ref()
                    .map_err(::core::clone::Clone::clone)
            }

            #[allow(unused_variables)]
            fn decode_field<R: ::std::io::Read + ?Sized>(
                &mut self,
                index: usize,
                reader: &mut R,
                ctx: &::bytecraft::FieldContext<'_>,
                len: ::core::option::Option<usize>,
            ) -> ::core::result::Result<(), ::bytecraft::Error> {
                match index {
                    #(#decoders)*
                    _ => ::core::result::Result::Ok(()),
                }
            }

            #[allow(unused_variables)]
            fn encode_field<W: ::std::io::Write + ?Sized>(
                &self,
                index: usize,
                writer: &mut W,
                ctx: &::bytecraft::FieldContext<'_>,
            ) -> ::core::result::Result<(), ::bytecraft::Error> {
                match index {
                    #(#encoders)*
                    _ => ::core::result::Result::Ok(()),
                }
            }

            fn field_len(&self, index: usize) -> ::core::option::Option<usize> {
                match index {
                    #(#lens)*
                    _ => ::core::option::Option::None,
                }
            }

            fn length_source(&self, index: usize) -> ::core::option::Option<&dyn ::bytecraft::LengthSource> {
                match index {
                    #(#sources)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::bytecraft::Codec for #name {
            const KIND: ::bytecraft::FieldKind = ::bytecraft::FieldKind::Record;

            fn decode<R: ::std::io::Read + ?Sized>(
                &mut self,
                reader: &mut R,
                ctx: &::bytecraft::FieldContext<'_>,
                _len: ::core::option::Option<usize>,
            ) -> ::core::result::Result<(), ::bytecraft::Error> {
                ::bytecraft::walker::decode_record(self, reader, ctx)
            }

            fn encode<W: ::std::io::Write + ?Sized>(
                &self,
                writer: &mut W,
                ctx: &::bytecraft::FieldContext<'_>,
            ) -> ::core::result::Result<(), ::bytecraft::Error> {
                ::bytecraft::walker::encode_record(self, writer, ctx)
            }
        }
    };

    Ok(tokens)
}

/// Visible fields paired with their schema position.
fn visible<'a, 'b>(
    fields: &'b [RecordField<'a>],
) -> impl Iterator<Item = (usize, &'b RecordField<'a>)> {
    fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.hidden)
}
