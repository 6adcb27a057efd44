//! Attribute parsing for the Capture derive macro.
//!
//! This module handles parsing of `#[capture(...)]` attributes on structs,
//! struct fields and enum variants.

use proc_macro2::Span;
use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Path, Result, Token,
};

use crate::keys::{check_tag, is_flag_key};

/// A single `key` or `key = literal` item within `#[capture(...)]`.
pub struct CaptureItem {
    pub key: Ident,
    pub value: Option<Lit>,
}

impl Parse for CaptureItem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key = input.call(Ident::parse_any)?;

        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            let value: Lit = input.parse()?;
            return Ok(CaptureItem {
                key,
                value: Some(value),
            });
        }

        Ok(CaptureItem { key, value: None })
    }
}

impl CaptureItem {
    /// The literal as the text `Property::set_tag` expects.
    fn value_text(&self) -> Result<Option<String>> {
        let text = match &self.value {
            None => return Ok(None),
            Some(Lit::Str(lit)) => lit.value(),
            Some(Lit::Int(lit)) => lit.base10_digits().to_string(),
            Some(Lit::Float(lit)) => lit.base10_digits().to_string(),
            Some(Lit::Bool(lit)) => lit.value.to_string(),
            Some(other) => {
                return Err(Error::new(
                    other.span(),
                    "expected a string, number or bool literal",
                ))
            }
        };
        Ok(Some(text))
    }
}

/// One setting applied to the generated property, in declaration order.
#[derive(Debug, Clone)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// A complete field configuration.
#[derive(Debug, Clone, Default)]
pub struct FieldCapture {
    pub name: Option<String>,
    pub tags: Vec<Tag>,
    pub flatten: bool,
    pub skip: bool,
    pub span: Option<Span>,
}

/// Struct-level configuration.
#[derive(Debug, Clone, Default)]
pub struct StructCapture {
    pub update: Option<Path>,
    pub validate: Option<Path>,
}

fn parse_items(attr: &Attribute) -> Result<Punctuated<CaptureItem, Token![,]>> {
    attr.parse_args_with(Punctuated::<CaptureItem, Token![,]>::parse_terminated)
}

/// Parse a field's `#[capture(...)]` attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldCapture> {
    let mut capture = FieldCapture::default();

    for attr in attrs.iter().filter(|a| is_capture_attr(a)) {
        capture.span = Some(attr.span());

        for item in parse_items(attr)? {
            let key = item.key.to_string();
            let value = item.value_text()?;

            match key.as_str() {
                "name" => {
                    capture.name = Some(value.ok_or_else(|| {
                        Error::new(item.key.span(), "name requires a value like name = \"Age\"")
                    })?);
                }
                "flatten" => capture.flatten = flag_value(&item, value)?,
                "skip" => capture.skip = flag_value(&item, value)?,
                _ if is_flag_key(&key) => {
                    if flag_value(&item, value)? {
                        capture.tags.push(Tag {
                            key,
                            value: String::new(),
                        });
                    }
                }
                _ => {
                    let value = value.ok_or_else(|| {
                        Error::new(item.key.span(), format!("{} requires a value", key))
                    })?;
                    check_tag(&key, &value).map_err(|e| Error::new(item.key.span(), e))?;
                    capture.tags.push(Tag { key, value });
                }
            }
        }
    }

    if capture.skip && (capture.flatten || capture.name.is_some() || !capture.tags.is_empty()) {
        return Err(Error::new(
            capture.span.unwrap_or_else(Span::call_site),
            "'skip' cannot be combined with other capture settings",
        ));
    }
    if capture.flatten && (capture.name.is_some() || !capture.tags.is_empty()) {
        return Err(Error::new(
            capture.span.unwrap_or_else(Span::call_site),
            "'flatten' cannot be combined with other capture settings",
        ));
    }

    // The prompt text resets the container questions, so it goes first.
    capture.tags.sort_by_key(|tag| tag.key != "prompt");

    Ok(capture)
}

/// Parse struct-level `#[capture(update = "path", validate = "path")]`.
pub fn parse_struct_attrs(attrs: &[Attribute]) -> Result<StructCapture> {
    let mut capture = StructCapture::default();

    for attr in attrs.iter().filter(|a| is_capture_attr(a)) {
        for item in parse_items(attr)? {
            let key = item.key.to_string();
            let path = match &item.value {
                Some(Lit::Str(lit)) => lit.parse::<Path>()?,
                _ => {
                    return Err(Error::new(
                        item.key.span(),
                        format!("{} requires a function path like {} = \"my_fn\"", key, key),
                    ))
                }
            };
            match key.as_str() {
                "update" => capture.update = Some(path),
                "validate" => capture.validate = Some(path),
                _ => {
                    return Err(Error::new(
                        item.key.span(),
                        format!(
                            "unknown struct-level setting '{}'; only 'update' and 'validate' are supported",
                            key
                        ),
                    ))
                }
            }
        }
    }

    Ok(capture)
}

/// Parse an enum variant's `#[capture(name = "...")]`.
pub fn parse_variant_name(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut name = None;

    for attr in attrs.iter().filter(|a| is_capture_attr(a)) {
        for item in parse_items(attr)? {
            match (item.key.to_string().as_str(), item.value_text()?) {
                ("name", Some(value)) => name = Some(value),
                _ => {
                    return Err(Error::new(
                        item.key.span(),
                        "enum variants only support name = \"...\"",
                    ))
                }
            }
        }
    }

    Ok(name)
}

fn flag_value(item: &CaptureItem, value: Option<String>) -> Result<bool> {
    match value.as_deref() {
        None | Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(_) => Err(Error::new(
            item.key.span(),
            format!("{} is a flag and takes no value", item.key),
        )),
    }
}

/// Check if an attribute is a `#[capture(...)]` attribute.
pub fn is_capture_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("capture")
}
