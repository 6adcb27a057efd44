//! Capture derive implementation.

use proc_macro2::TokenStream;
use syn::{parse_quote, Data, DeriveInput, Error, Fields, Generics, Result};

use crate::codegen::{
    display_name, generate_enum_impl, generate_struct_impl, CapturedField, CapturedVariant,
};
use crate::parse::{parse_field_attrs, parse_struct_attrs, parse_variant_name};

/// Derive `Record` and `Field` for a struct, or a choice `Field` for a
/// fieldless enum.
pub fn derive_capture(input: DeriveInput) -> Result<TokenStream> {
    match &input.data {
        Data::Struct(data) => {
            let struct_capture = parse_struct_attrs(&input.attrs)?;
            let fields = match &data.fields {
                Fields::Named(fields) => parse_named_fields(fields)?,
                Fields::Unnamed(_) => {
                    return Err(Error::new_spanned(
                        &input,
                        "Capture does not support tuple structs; use named fields",
                    ));
                }
                Fields::Unit => Vec::new(),
            };
            let generics = bounded_generics(&input)?;
            Ok(generate_struct_impl(&input.ident, &generics, &fields, &struct_capture))
        }
        Data::Enum(data) => {
            let mut variants = Vec::new();
            for variant in &data.variants {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(Error::new_spanned(
                        variant,
                        "Capture can only be derived for enums whose variants have no fields",
                    ));
                }
                let name = parse_variant_name(&variant.attrs)?
                    .unwrap_or_else(|| variant.ident.to_string());
                variants.push(CapturedVariant {
                    ident: variant.ident.clone(),
                    name,
                });
            }
            if !input.generics.params.is_empty() {
                return Err(Error::new_spanned(
                    &input.generics,
                    "Capture does not support generic enums",
                ));
            }
            if variants.is_empty() {
                return Err(Error::new_spanned(
                    &input,
                    "Capture needs at least one enum variant",
                ));
            }
            Ok(generate_enum_impl(&input.ident, &variants))
        }
        Data::Union(_) => Err(Error::new_spanned(
            &input,
            "Capture can only be derived for structs and enums, not unions",
        )),
    }
}

/// The struct's generics with every type parameter bound to be a capturable
/// value. Lifetimes are rejected since captured values are `'static`.
fn bounded_generics(input: &DeriveInput) -> Result<Generics> {
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(Error::new_spanned(
            lifetime,
            "Capture does not support lifetime parameters; captured values must be 'static",
        ));
    }
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::argprompt::Field));
        param.bounds.push(parse_quote!(::std::default::Default));
        param.bounds.push(parse_quote!('static));
    }
    Ok(generics)
}

fn parse_named_fields(fields: &syn::FieldsNamed) -> Result<Vec<CapturedField>> {
    let mut result = Vec::new();

    for field in &fields.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "expected a named field"))?;
        let capture = parse_field_attrs(&field.attrs)?;
        if capture.name.as_deref() == Some("") {
            return Err(Error::new_spanned(
                field,
                format!(
                    "name cannot be empty; leave it out to use {:?}",
                    display_name(&ident)
                ),
            ));
        }
        result.push(CapturedField { ident, capture });
    }

    Ok(result)
}
