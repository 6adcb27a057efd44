//! Code generation for the Capture derive macro.
//!
//! Structs get `Record` and `Field` impls. Slots are numbered in declaration
//! order; a flattened field takes as many slots as its own record has, so
//! the slot arithmetic happens at runtime.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Generics, Ident};

use crate::parse::{FieldCapture, StructCapture};

/// A named field and its capture configuration.
pub struct CapturedField {
    pub ident: Ident,
    pub capture: FieldCapture,
}

/// A unit variant and its display name.
pub struct CapturedVariant {
    pub ident: Ident,
    pub name: String,
}

/// `fave_numbers` becomes `FaveNumbers`.
pub fn display_name(ident: &Ident) -> String {
    let raw = ident.to_string();
    let raw = raw.strip_prefix("r#").unwrap_or(&raw);
    raw.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Generate the `Record` and `Field` impls for a struct.
pub fn generate_struct_impl(
    struct_name: &Ident,
    generics: &Generics,
    fields: &[CapturedField],
    struct_capture: &StructCapture,
) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    // Field's staging needs the struct itself to be Default.
    let mut field_generics = generics.clone();
    if generics.type_params().next().is_some() {
        field_generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(#struct_name #ty_generics: ::std::default::Default));
    }
    let field_where = &field_generics.where_clause;
    let struct_label = struct_name.to_string();
    let active: Vec<&CapturedField> = fields.iter().filter(|f| !f.capture.skip).collect();

    let property_pushes = active.iter().map(|field| {
        let ident = &field.ident;
        if field.capture.flatten {
            return quote! {
                let count = ::argprompt::Record::field_count(&self.#ident);
                properties.extend(
                    ::argprompt::Record::properties(&self.#ident)
                        .into_iter()
                        .map(|property| property.with_slot_offset(slot)),
                );
                slot += count;
            };
        }
        let name = field
            .capture
            .name
            .clone()
            .unwrap_or_else(|| display_name(ident));
        let tags = field.capture.tags.iter().map(|tag| {
            let key = &tag.key;
            let value = &tag.value;
            quote! { property.set_tag(#key, #value); }
        });
        quote! {
            let mut property = ::argprompt::Property::new(#name, slot);
            #(#tags)*
            properties.push(property);
            slot += 1;
        }
    });

    let counts = active.iter().map(|field| {
        let ident = &field.ident;
        if field.capture.flatten {
            quote! { ::argprompt::Record::field_count(&self.#ident) }
        } else {
            quote! { 1usize }
        }
    });

    let lookups = active.iter().map(|field| {
        let ident = &field.ident;
        if field.capture.flatten {
            quote! {
                let count = ::argprompt::Record::field_count(&self.#ident);
                if slot < base + count {
                    return ::argprompt::Record::field(&self.#ident, slot - base);
                }
                base += count;
            }
        } else {
            quote! {
                if slot == base {
                    return ::std::option::Option::Some(&self.#ident);
                }
                base += 1;
            }
        }
    });

    let lookups_mut = active.iter().map(|field| {
        let ident = &field.ident;
        if field.capture.flatten {
            quote! {
                let count = ::argprompt::Record::field_count(&self.#ident);
                if slot < base + count {
                    return ::argprompt::Record::field_mut(&mut self.#ident, slot - base);
                }
                base += count;
            }
        } else {
            quote! {
                if slot == base {
                    return ::std::option::Option::Some(&mut self.#ident);
                }
                base += 1;
            }
        }
    });

    let update = struct_capture.update.as_ref().map(|path| {
        quote! {
            fn update(
                &mut self,
                opts: &mut ::argprompt::Options,
                updated: ::std::option::Option<usize>,
                properties: &mut [::argprompt::Property],
            ) -> ::std::result::Result<(), ::argprompt::CaptureError> {
                #path(self, opts, updated, properties)
            }
        }
    });

    let validate = struct_capture.validate.as_ref().map(|path| {
        quote! {
            fn validate(&self, opts: &::argprompt::Options) -> ::argprompt::CaptureValidation {
                #path(self, opts)
            }
        }
    });

    let zero_checks = active.iter().map(|field| {
        let ident = &field.ident;
        quote! { ::argprompt::Field::is_zero(&self.#ident) }
    });

    let display_parts = active.iter().map(|field| {
        let ident = &field.ident;
        if field.capture.flatten {
            quote! {
                let inner = ::argprompt::Field::display(&self.#ident);
                let inner = inner.trim_start_matches('{').trim_end_matches('}');
                if !inner.is_empty() {
                    parts.push(inner.to_string());
                }
            }
        } else {
            let name = field
                .capture
                .name
                .clone()
                .unwrap_or_else(|| display_name(ident));
            quote! {
                parts.push(::std::format!("{}:{}", #name, ::argprompt::Field::display(&self.#ident)));
            }
        }
    });

    quote! {
        impl #impl_generics ::argprompt::Record for #struct_name #ty_generics #where_clause {
            fn properties(&self) -> ::std::vec::Vec<::argprompt::Property> {
                let mut properties = ::std::vec::Vec::new();
                let mut slot = 0usize;
                #(#property_pushes)*
                let _ = slot;
                properties
            }

            fn field_count(&self) -> usize {
                0usize #(+ #counts)*
            }

            #[allow(unused_assignments, unused_mut)]
            fn field(&self, slot: usize) -> ::std::option::Option<&dyn ::argprompt::Field> {
                let mut base = 0usize;
                #(#lookups)*
                ::std::option::Option::None
            }

            #[allow(unused_assignments, unused_mut)]
            fn field_mut(&mut self, slot: usize) -> ::std::option::Option<&mut dyn ::argprompt::Field> {
                let mut base = 0usize;
                #(#lookups_mut)*
                ::std::option::Option::None
            }

            #update
            #validate
        }

        impl #impl_generics ::argprompt::Field for #struct_name #ty_generics #field_where {
            fn kind(&self) -> ::argprompt::Kind {
                ::argprompt::Kind::Record
            }

            fn is_zero(&self) -> bool {
                true #(&& #zero_checks)*
            }

            fn display(&self) -> ::std::string::String {
                let mut parts: ::std::vec::Vec<::std::string::String> = ::std::vec::Vec::new();
                #(#display_parts)*
                ::std::format!("{{{}}}", parts.join(" "))
            }

            fn type_name(&self) -> ::std::string::String {
                ::std::string::String::from(#struct_label)
            }

            fn with_record(
                &mut self,
                visit: &mut dyn ::std::ops::FnMut(
                    &mut dyn ::argprompt::Record,
                ) -> ::std::result::Result<::argprompt::Flags, ::argprompt::CaptureError>,
            ) -> ::std::result::Result<::argprompt::Flags, ::argprompt::CaptureError> {
                visit(self)
            }
        }
    }
}

/// Generate a scalar `Field` impl for a fieldless enum, offering its
/// variants as choices.
pub fn generate_enum_impl(enum_name: &Ident, variants: &[CapturedVariant]) -> TokenStream {
    let enum_label = enum_name.to_string();
    let names: Vec<&String> = variants.iter().map(|v| &v.name).collect();
    let expected = names
        .iter()
        .map(|n| n.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let display_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let name = &v.name;
        quote! { #enum_name::#ident => #name }
    });

    let parse_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let name = &v.name;
        quote! {
            if key == ::argprompt::normalize(#name) {
                *self = #enum_name::#ident;
                return ::std::result::Result::Ok(());
            }
        }
    });

    quote! {
        impl ::argprompt::Field for #enum_name {
            fn kind(&self) -> ::argprompt::Kind {
                ::argprompt::Kind::Scalar
            }

            fn is_zero(&self) -> bool {
                ::std::mem::discriminant(self)
                    == ::std::mem::discriminant(&<#enum_name as ::std::default::Default>::default())
            }

            fn display(&self) -> ::std::string::String {
                let name = match self {
                    #(#display_arms,)*
                };
                ::std::string::String::from(name)
            }

            fn type_name(&self) -> ::std::string::String {
                ::std::string::String::from(#enum_label)
            }

            fn parse_text(&mut self, text: &str) -> ::std::result::Result<(), ::argprompt::ParseError> {
                let key = ::argprompt::normalize(text);
                #(#parse_arms)*
                ::std::result::Result::Err(::argprompt::ParseError::new(
                    #enum_label,
                    ::std::format!("expected one of: {}", #expected),
                ))
            }

            fn choices(
                &self,
                _opts: &::argprompt::Options,
                _prop: &::argprompt::Property,
            ) -> ::std::option::Option<::argprompt::Choices> {
                ::std::option::Option::Some(
                    ::argprompt::Choices::new()
                        #(.with(#names, #names))*
                )
            }
        }
    }
}
