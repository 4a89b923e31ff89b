use std::collections::BTreeSet;

use proc_macro2::Ident;
use syn::{
    Data, DeriveInput, Fields, LitStr, Type,
    ext::IdentExt,
    parse::{Parse, ParseStream},
};

/// Contents of one `#[bytecraft(...)]` attribute.
enum FieldAttr {
    Directive(LitStr),
    Hidden,
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(FieldAttr::Directive(input.parse()?));
        }

        let ident: Ident = input.parse()?;
        if ident == "hidden" {
            Ok(FieldAttr::Hidden)
        } else {
            Err(syn::Error::new(
                ident.span(),
                "expected a directive string or `hidden`",
            ))
        }
    }
}

pub struct RecordField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub name: String,
    pub directive: String,
    pub hidden: bool,
}

pub fn get_record_fields(ast: &DeriveInput) -> syn::Result<Vec<RecordField<'_>>> {
    let data_struct = match &ast.data {
        Data::Struct(data_struct) => data_struct,
        _ => {
            return Err(syn::Error::new(
                ast.ident.span(),
                "Record can only be derived for structs",
            ));
        }
    };

    let fields_named = match &data_struct.fields {
        Fields::Named(fields_named) => fields_named,
        _ => {
            return Err(syn::Error::new(
                ast.ident.span(),
                "Record can only be derived for structs with named fields",
            ));
        }
    };

    fields_named
        .named
        .iter()
        .map(|field| {
            // named fields always carry an ident
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new(ast.ident.span(), "unnamed field"))?;

            let mut directive: Option<LitStr> = None;
            let mut hidden = false;
            for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("bytecraft")) {
                match attr.parse_args::<FieldAttr>()? {
                    FieldAttr::Directive(lit) => {
                        if directive.is_some() {
                            return Err(syn::Error::new(lit.span(), "duplicate directive"));
                        }
                        directive = Some(lit);
                    }
                    FieldAttr::Hidden => hidden = true,
                }
            }

            Ok(RecordField {
                ident,
                ty: &field.ty,
                // `r#type` is addressed as `type` in directives
                name: ident.unraw().to_string(),
                directive: directive.map(|lit| lit.value()).unwrap_or_default(),
                hidden,
            })
        })
        .collect()
}

/// Names referenced by `len=` in any visible field's directive.
pub fn length_field_names(fields: &[RecordField<'_>]) -> BTreeSet<String> {
    fields
        .iter()
        .filter(|field| !field.hidden)
        .flat_map(|field| field.directive.split(','))
        .filter_map(|token| match token.split_once('=') {
            Some(("len", name)) if !name.is_empty() => Some(name.to_string()),
            _ => None,
        })
        .collect()
}
