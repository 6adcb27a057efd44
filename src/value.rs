//! The value model: runtime shape and field access for capturable types.
//!
//! Every type that can be captured implements [`Field`]. A field reports its
//! [`Kind`]; scalars parse themselves from text, while records, lists, arrays
//! and maps hand the capture pipeline an accessor through the `with_*`
//! visitors. Optional layers (`Option<T>`, `Box<T>`) are transparent: they
//! report the kind of the value they hold and create it lazily the first time
//! a capture writes into it.
//!
//! Capabilities such as custom argument parsing or a custom prompt are exposed
//! as query methods returning `Option<&mut dyn ...>`; the defaults return
//! `None`, so a type opts in by overriding the query.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::marker::PhantomData;
use std::path::PathBuf;

use stillwater::Validation;

use crate::choices::Choices;
use crate::error::{CaptureError, CaptureValidation, ParseError};
use crate::flags::Flags;
use crate::options::Options;
use crate::property::Property;

/// The runtime shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A single value parsed from text
    Scalar,
    /// A nested record with its own properties
    Record,
    /// A growable list
    List,
    /// A fixed-length array
    Array,
    /// A key/value map
    Map,
    /// Excluded from capture and validation entirely
    Ignored,
}

/// A capturable value.
///
/// Implemented for the primitive scalars, `String`, `PathBuf`, `Option`,
/// `Box`, `Vec`, arrays, `BTreeMap` and `HashMap`, and generated by
/// `#[derive(Capture)]` for records and fieldless enums. Other `FromStr`
/// types can use [`text_field!`](crate::text_field).
pub trait Field: Staging {
    /// The runtime shape of this value.
    fn kind(&self) -> Kind;

    /// Whether this is the zero value of its type.
    fn is_zero(&self) -> bool;

    /// Render the value for prompts, help and choice comparison.
    fn display(&self) -> String;

    /// Short name of the value's type, used in help text.
    fn type_name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Whether this is an optional layer that may stay unset.
    fn is_optional(&self) -> bool {
        false
    }

    /// Whether the value is a boolean, which lets a bare `--flag` mean true.
    fn is_bool(&self) -> bool {
        false
    }

    /// The number checked against min/max: the value itself for numbers,
    /// the length for text and containers.
    fn measure(&self) -> Option<f64> {
        None
    }

    /// Replace the value by parsing `text`.
    fn parse_text(&mut self, _text: &str) -> Result<(), ParseError> {
        Err(ParseError::new(
            self.type_name(),
            "cannot be parsed from text",
        ))
    }

    /// Visit the value as a record.
    fn with_record(
        &mut self,
        _visit: &mut dyn FnMut(&mut dyn Record) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        Ok(Flags::NONE)
    }

    /// Visit the value as a list.
    fn with_list(
        &mut self,
        _visit: &mut dyn FnMut(&mut dyn ListAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        Ok(Flags::NONE)
    }

    /// Visit the value as a fixed-length array.
    fn with_array(
        &mut self,
        _visit: &mut dyn FnMut(&mut dyn ArrayAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        Ok(Flags::NONE)
    }

    /// Visit the value as a map.
    fn with_map(
        &mut self,
        _visit: &mut dyn FnMut(&mut dyn MapAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        Ok(Flags::NONE)
    }

    /// Choices offered by the value itself, used when the property declares none.
    fn choices(&self, _opts: &Options, _prop: &Property) -> Option<Choices> {
        None
    }

    /// Custom argument handling; when present the value and everything
    /// inside it skip the built-in argument and prompt stages.
    fn arg_parser(&mut self) -> Option<&mut dyn ArgParse> {
        None
    }

    /// Custom prompting; when present it runs in place of the built-in
    /// argument and prompt stages.
    fn custom_prompt(&mut self) -> Option<&mut dyn CustomPrompt> {
        None
    }

    /// Custom parsing of prompt input.
    fn prompt_parser(&mut self) -> Option<&mut dyn PromptParse> {
        None
    }

    /// Run the custom argument parser, falling back to the custom prompt.
    /// `None` when the value has neither.
    fn run_custom(
        &mut self,
        opts: &mut Options,
        prop: &mut Property,
    ) -> Option<Result<(), CaptureError>> {
        if let Some(parser) = self.arg_parser() {
            return Some(parser.from_args(opts, prop));
        }
        self.custom_prompt().map(|custom| custom.prompt(opts, prop))
    }

    /// Whether [`Field::run_custom`] takes over the value.
    fn has_custom(&mut self) -> bool {
        self.arg_parser().is_some() || self.custom_prompt().is_some()
    }

    /// Generic text unmarshalling, preferred over [`Field::parse_text`].
    fn text_unmarshal(&mut self) -> Option<&mut dyn UnmarshalText> {
        None
    }
}

/// Fresh values and type-erased moves for a [`Field`].
///
/// Implemented for every `Field + Default + 'static`. The prompt engine parses
/// into a staged value and only commits it once the input is accepted.
pub trait Staging {
    /// A new zero value of the same type.
    fn stage(&self) -> Box<dyn Field>;

    /// Move a value of the same type into `self`; other types are ignored.
    fn commit(&mut self, value: Box<dyn Field>);

    /// Erase the type for downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Field + Default + 'static> Staging for T {
    fn stage(&self) -> Box<dyn Field> {
        Box::new(T::default())
    }

    fn commit(&mut self, value: Box<dyn Field>) {
        if let Ok(value) = value.into_any().downcast::<T>() {
            *self = *value;
        }
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A named, ordered collection of fields.
///
/// Usually generated by `#[derive(Capture)]`. Slots are flat: fields of an
/// embedded (flattened) record occupy consecutive slots of the parent.
pub trait Record {
    /// Fresh property descriptors, one per addressable field, in declaration order.
    fn properties(&self) -> Vec<Property>;

    /// Number of addressable slots.
    fn field_count(&self) -> usize;

    /// The field stored at `slot`.
    fn field(&self, slot: usize) -> Option<&dyn Field>;

    /// The field stored at `slot`, mutably.
    fn field_mut(&mut self, slot: usize) -> Option<&mut dyn Field>;

    /// Called once before the first property (`updated` is `None`) and after
    /// every property with its index into `properties`. Descriptors of later
    /// properties may be changed here.
    fn update(
        &mut self,
        _opts: &mut Options,
        _updated: Option<usize>,
        _properties: &mut [Property],
    ) -> Result<(), CaptureError> {
        Ok(())
    }

    /// Validate the whole record once every property is captured.
    fn validate(&self, _opts: &Options) -> CaptureValidation {
        Validation::Success(())
    }
}

/// Custom argument handling for a value.
pub trait ArgParse {
    /// Read the value from `opts.args`, typically with [`Options::take_named_arg`].
    fn from_args(&mut self, opts: &mut Options, prop: &mut Property) -> Result<(), CaptureError>;
}

/// Custom prompting for a value.
pub trait CustomPrompt {
    /// Populate the value, prompting through `opts` as needed.
    fn prompt(&mut self, opts: &mut Options, prop: &mut Property) -> Result<(), CaptureError>;
}

/// Custom parsing of a prompt answer.
pub trait PromptParse {
    /// Replace the value from prompt input.
    fn from_prompt(&mut self, opts: &Options, text: &str) -> Result<(), CaptureError>;
}

/// Generic text unmarshalling.
pub trait UnmarshalText {
    /// Replace the value from text.
    fn unmarshal_text(&mut self, text: &str) -> Result<(), ParseError>;
}

/// Access to a growable list.
pub trait ListAccess {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the list has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A new zero element, not yet in the list.
    fn new_element(&self) -> Box<dyn Field>;

    /// The element at `index`.
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Field>;

    /// Append an element created by [`ListAccess::new_element`].
    fn push(&mut self, element: Box<dyn Field>);
}

/// Access to a fixed-length array.
pub trait ArrayAccess {
    /// The fixed length.
    fn len(&self) -> usize;

    /// Whether the array has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kind of the element type.
    fn element_kind(&self) -> Kind;

    /// The element at `index`.
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Field>;
}

/// Access to a key/value map.
pub trait MapAccess {
    /// Number of pairs.
    fn len(&self) -> usize;

    /// Whether the map has no pairs.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A new zero key.
    fn new_key(&self) -> Box<dyn Field>;

    /// A new zero value.
    fn new_value(&self) -> Box<dyn Field>;

    /// The rendered key and mutable value of the pair at `index` in iteration order.
    fn entry_mut(&mut self, index: usize) -> Option<(String, &mut dyn Field)>;

    /// Insert or overwrite a pair created by `new_key` and `new_value`.
    fn insert(&mut self, key: Box<dyn Field>, value: Box<dyn Field>);
}

/// Strip module paths from a type name: `alloc::vec::Vec<alloc::string::String>`
/// becomes `Vec<String>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}

fn bracketed(items: impl Iterator<Item = String>) -> String {
    format!("[{}]", items.collect::<Vec<_>>().join(" "))
}

macro_rules! number_field {
    ($($t:ty),*) => {
        $(
            impl Field for $t {
                fn kind(&self) -> Kind {
                    Kind::Scalar
                }

                fn is_zero(&self) -> bool {
                    *self == <$t>::default()
                }

                fn display(&self) -> String {
                    self.to_string()
                }

                fn type_name(&self) -> String {
                    stringify!($t).to_string()
                }

                fn measure(&self) -> Option<f64> {
                    Some(*self as f64)
                }

                fn parse_text(&mut self, text: &str) -> Result<(), ParseError> {
                    *self = text
                        .parse::<$t>()
                        .map_err(|e| ParseError::new(stringify!($t), e.to_string()))?;
                    Ok(())
                }
            }
        )*
    };
}

number_field!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Field for bool {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn display(&self) -> String {
        self.to_string()
    }

    fn type_name(&self) -> String {
        "bool".to_string()
    }

    fn is_bool(&self) -> bool {
        true
    }

    fn parse_text(&mut self, text: &str) -> Result<(), ParseError> {
        *self = match text {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
            "0" | "f" | "F" | "false" | "FALSE" | "False" => false,
            _ => {
                return Err(ParseError::new(
                    "bool",
                    format!("\"{}\" is not one of 1, t, true, 0, f, false", text),
                ))
            }
        };
        Ok(())
    }
}

impl Field for char {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn is_zero(&self) -> bool {
        *self == '\0'
    }

    fn display(&self) -> String {
        self.to_string()
    }

    fn type_name(&self) -> String {
        "char".to_string()
    }

    fn parse_text(&mut self, text: &str) -> Result<(), ParseError> {
        *self = text
            .parse::<char>()
            .map_err(|e| ParseError::new("char", e.to_string()))?;
        Ok(())
    }
}

impl Field for String {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn display(&self) -> String {
        self.clone()
    }

    fn type_name(&self) -> String {
        "string".to_string()
    }

    fn measure(&self) -> Option<f64> {
        Some(self.chars().count() as f64)
    }

    fn parse_text(&mut self, text: &str) -> Result<(), ParseError> {
        *self = text.to_string();
        Ok(())
    }
}

impl Field for PathBuf {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn is_zero(&self) -> bool {
        self.as_os_str().is_empty()
    }

    fn display(&self) -> String {
        self.to_string_lossy().into_owned()
    }

    fn type_name(&self) -> String {
        "path".to_string()
    }

    fn measure(&self) -> Option<f64> {
        Some(self.as_os_str().len() as f64)
    }

    fn parse_text(&mut self, text: &str) -> Result<(), ParseError> {
        *self = PathBuf::from(text);
        Ok(())
    }
}

impl<T: Field + Default + 'static> Field for Option<T> {
    fn kind(&self) -> Kind {
        match self {
            Some(value) => value.kind(),
            None => T::default().kind(),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn display(&self) -> String {
        self.as_ref().map(|v| v.display()).unwrap_or_default()
    }

    fn type_name(&self) -> String {
        match self {
            Some(value) => value.type_name(),
            None => T::default().type_name(),
        }
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn is_bool(&self) -> bool {
        T::default().is_bool()
    }

    fn measure(&self) -> Option<f64> {
        self.as_ref().and_then(|v| v.measure())
    }

    fn parse_text(&mut self, text: &str) -> Result<(), ParseError> {
        let mut value = T::default();
        value.parse_text(text)?;
        *self = Some(value);
        Ok(())
    }

    fn with_record(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn Record) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        if let Some(value) = self.as_mut() {
            return value.with_record(visit);
        }
        let mut value = T::default();
        let flags = value.with_record(visit)?;
        if !flags.is_empty() {
            *self = Some(value);
        }
        Ok(flags)
    }

    fn with_list(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn ListAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        if let Some(value) = self.as_mut() {
            return value.with_list(visit);
        }
        let mut value = T::default();
        let flags = value.with_list(visit)?;
        if !value.is_zero() {
            *self = Some(value);
        }
        Ok(flags)
    }

    fn with_array(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn ArrayAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        if let Some(value) = self.as_mut() {
            return value.with_array(visit);
        }
        let mut value = T::default();
        let flags = value.with_array(visit)?;
        if !flags.is_empty() {
            *self = Some(value);
        }
        Ok(flags)
    }

    fn with_map(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn MapAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        if let Some(value) = self.as_mut() {
            return value.with_map(visit);
        }
        let mut value = T::default();
        let flags = value.with_map(visit)?;
        if !flags.is_empty() {
            *self = Some(value);
        }
        Ok(flags)
    }

    fn choices(&self, opts: &Options, prop: &Property) -> Option<Choices> {
        match self {
            Some(value) => value.choices(opts, prop),
            None => T::default().choices(opts, prop),
        }
    }

    fn arg_parser(&mut self) -> Option<&mut dyn ArgParse> {
        self.as_mut().and_then(|v| v.arg_parser())
    }

    fn custom_prompt(&mut self) -> Option<&mut dyn CustomPrompt> {
        self.as_mut().and_then(|v| v.custom_prompt())
    }

    // An unset value is handled on a fresh inner value, kept only when the
    // parser or prompt supplied something.
    fn run_custom(
        &mut self,
        opts: &mut Options,
        prop: &mut Property,
    ) -> Option<Result<(), CaptureError>> {
        if let Some(value) = self.as_mut() {
            return value.run_custom(opts, prop);
        }
        let mut value = T::default();
        let before = prop.flags;
        let result = value.run_custom(opts, prop)?;
        if result.is_ok() && (prop.flags != before || !value.is_zero()) {
            *self = Some(value);
        }
        Some(result)
    }

    fn has_custom(&mut self) -> bool {
        match self {
            Some(value) => value.has_custom(),
            None => T::default().has_custom(),
        }
    }

    // Only ever queried on staged values, so creating the inner value is harmless.
    fn prompt_parser(&mut self) -> Option<&mut dyn PromptParse> {
        self.get_or_insert_with(T::default).prompt_parser()
    }

    fn text_unmarshal(&mut self) -> Option<&mut dyn UnmarshalText> {
        self.get_or_insert_with(T::default).text_unmarshal()
    }
}

impl<T: Field + Default + 'static> Field for Box<T> {
    fn kind(&self) -> Kind {
        (**self).kind()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn display(&self) -> String {
        (**self).display()
    }

    fn type_name(&self) -> String {
        (**self).type_name()
    }

    fn is_optional(&self) -> bool {
        (**self).is_optional()
    }

    fn is_bool(&self) -> bool {
        (**self).is_bool()
    }

    fn measure(&self) -> Option<f64> {
        (**self).measure()
    }

    fn parse_text(&mut self, text: &str) -> Result<(), ParseError> {
        (**self).parse_text(text)
    }

    fn with_record(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn Record) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        (**self).with_record(visit)
    }

    fn with_list(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn ListAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        (**self).with_list(visit)
    }

    fn with_array(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn ArrayAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        (**self).with_array(visit)
    }

    fn with_map(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn MapAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        (**self).with_map(visit)
    }

    fn choices(&self, opts: &Options, prop: &Property) -> Option<Choices> {
        (**self).choices(opts, prop)
    }

    fn arg_parser(&mut self) -> Option<&mut dyn ArgParse> {
        (**self).arg_parser()
    }

    fn custom_prompt(&mut self) -> Option<&mut dyn CustomPrompt> {
        (**self).custom_prompt()
    }

    fn run_custom(
        &mut self,
        opts: &mut Options,
        prop: &mut Property,
    ) -> Option<Result<(), CaptureError>> {
        (**self).run_custom(opts, prop)
    }

    fn has_custom(&mut self) -> bool {
        (**self).has_custom()
    }

    fn prompt_parser(&mut self) -> Option<&mut dyn PromptParse> {
        (**self).prompt_parser()
    }

    fn text_unmarshal(&mut self) -> Option<&mut dyn UnmarshalText> {
        (**self).text_unmarshal()
    }
}

impl<T: Field + Default + 'static> Field for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::List
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn display(&self) -> String {
        bracketed(self.iter().map(|v| v.display()))
    }

    fn measure(&self) -> Option<f64> {
        Some(self.len() as f64)
    }

    fn with_list(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn ListAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        visit(self)
    }
}

impl<T: Field + Default + 'static> ListAccess for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn new_element(&self) -> Box<dyn Field> {
        Box::new(T::default())
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Field> {
        self.get_mut(index).map(|v| v as &mut dyn Field)
    }

    fn push(&mut self, element: Box<dyn Field>) {
        if let Ok(element) = element.into_any().downcast::<T>() {
            Vec::push(self, *element);
        }
    }
}

impl<T: Field + Default + 'static, const N: usize> Field for [T; N]
where
    [T; N]: Default,
{
    fn kind(&self) -> Kind {
        Kind::Array
    }

    fn is_zero(&self) -> bool {
        self.iter().all(|v| v.is_zero())
    }

    fn display(&self) -> String {
        bracketed(self.iter().map(|v| v.display()))
    }

    fn measure(&self) -> Option<f64> {
        Some(N as f64)
    }

    fn with_array(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn ArrayAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        visit(self)
    }
}

impl<T: Field + Default + 'static, const N: usize> ArrayAccess for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn element_kind(&self) -> Kind {
        T::default().kind()
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Field> {
        self.get_mut(index).map(|v| v as &mut dyn Field)
    }
}

fn map_display<'a, K: Field + 'a, V: Field + 'a>(
    pairs: impl Iterator<Item = (&'a K, &'a V)>,
) -> String {
    let rendered: Vec<String> = pairs
        .map(|(k, v)| format!("{}:{}", k.display(), v.display()))
        .collect();
    format!("map[{}]", rendered.join(" "))
}

impl<K, V> Field for BTreeMap<K, V>
where
    K: Field + Default + Ord + 'static,
    V: Field + Default + 'static,
{
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn display(&self) -> String {
        map_display(self.iter())
    }

    fn measure(&self) -> Option<f64> {
        Some(self.len() as f64)
    }

    fn with_map(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn MapAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        visit(self)
    }
}

impl<K, V> MapAccess for BTreeMap<K, V>
where
    K: Field + Default + Ord + 'static,
    V: Field + Default + 'static,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn new_key(&self) -> Box<dyn Field> {
        Box::new(K::default())
    }

    fn new_value(&self) -> Box<dyn Field> {
        Box::new(V::default())
    }

    fn entry_mut(&mut self, index: usize) -> Option<(String, &mut dyn Field)> {
        self.iter_mut()
            .nth(index)
            .map(|(k, v)| (k.display(), v as &mut dyn Field))
    }

    fn insert(&mut self, key: Box<dyn Field>, value: Box<dyn Field>) {
        if let (Ok(key), Ok(value)) = (
            key.into_any().downcast::<K>(),
            value.into_any().downcast::<V>(),
        ) {
            BTreeMap::insert(self, *key, *value);
        }
    }
}

impl<K, V> Field for HashMap<K, V>
where
    K: Field + Default + Eq + Hash + 'static,
    V: Field + Default + 'static,
{
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn display(&self) -> String {
        map_display(self.iter())
    }

    fn measure(&self) -> Option<f64> {
        Some(self.len() as f64)
    }

    fn with_map(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn MapAccess) -> Result<Flags, CaptureError>,
    ) -> Result<Flags, CaptureError> {
        visit(self)
    }
}

impl<K, V> MapAccess for HashMap<K, V>
where
    K: Field + Default + Eq + Hash + 'static,
    V: Field + Default + 'static,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn new_key(&self) -> Box<dyn Field> {
        Box::new(K::default())
    }

    fn new_value(&self) -> Box<dyn Field> {
        Box::new(V::default())
    }

    fn entry_mut(&mut self, index: usize) -> Option<(String, &mut dyn Field)> {
        self.iter_mut()
            .nth(index)
            .map(|(k, v)| (k.display(), v as &mut dyn Field))
    }

    fn insert(&mut self, key: Box<dyn Field>, value: Box<dyn Field>) {
        if let (Ok(key), Ok(value)) = (
            key.into_any().downcast::<K>(),
            value.into_any().downcast::<V>(),
        ) {
            HashMap::insert(self, *key, *value);
        }
    }
}

/// Wrapper that keeps a value out of capture and validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ignored<T>(pub T);

impl<T: Default + 'static> Field for Ignored<T> {
    fn kind(&self) -> Kind {
        Kind::Ignored
    }

    fn is_zero(&self) -> bool {
        true
    }

    fn display(&self) -> String {
        String::new()
    }
}

impl<T: 'static> Field for PhantomData<T> {
    fn kind(&self) -> Kind {
        Kind::Ignored
    }

    fn is_zero(&self) -> bool {
        true
    }

    fn display(&self) -> String {
        String::new()
    }
}

/// Implement [`Field`] as a scalar for types with `FromStr`, `Display`,
/// `Default` and `PartialEq`.
///
/// ```
/// use std::str::FromStr;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Port(u16);
///
/// impl FromStr for Port {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Port)
///     }
/// }
///
/// impl std::fmt::Display for Port {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "{}", self.0)
///     }
/// }
///
/// argprompt::text_field!(Port);
///
/// use argprompt::Field;
/// let mut port = Port::default();
/// port.parse_text("8080").unwrap();
/// assert_eq!(port, Port(8080));
/// ```
#[macro_export]
macro_rules! text_field {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::Field for $t {
                fn kind(&self) -> $crate::Kind {
                    $crate::Kind::Scalar
                }

                fn is_zero(&self) -> bool {
                    *self == <$t as ::std::default::Default>::default()
                }

                fn display(&self) -> ::std::string::String {
                    ::std::string::ToString::to_string(self)
                }

                fn parse_text(&mut self, text: &str) -> ::std::result::Result<(), $crate::ParseError> {
                    *self = text
                        .parse::<$t>()
                        .map_err(|e| $crate::ParseError::new(stringify!($t), e.to_string()))?;
                    ::std::result::Result::Ok(())
                }
            }
        )*
    };
}
