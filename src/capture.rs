//! The capture pipeline.
//!
//! Every property of a record goes through the same stages in order:
//! load (environment, then default), arguments, prompt, validation and the
//! record's update hook. Records, lists, arrays and maps are handled in the
//! argument stage, recursing into the same pipeline for every element.

use tracing::debug;

use crate::args::{take_arg, ArgFormat, ArgTemplate};
use crate::choices::Choices;
use crate::error::{CaptureError, CaptureValidationExt};
use crate::flags::Flags;
use crate::options::Options;
use crate::prompt::PromptRequest;
use crate::property::Property;
use crate::validate::validate_property;
use crate::value::{ArrayAccess, Field, Kind, ListAccess, MapAccess, Record};

/// Populate `record` from the environment, defaults, arguments and prompts.
///
/// Consumed argument tokens are removed from `opts.args`. A quit answer
/// aborts with [`CaptureError::Quit`]; properties captured before the failure
/// keep their values.
///
/// # Example
///
/// ```
/// use argprompt::{capture, Capture, Options};
///
/// #[derive(Debug, Default, Capture)]
/// struct Profile {
///     #[capture(min = 2)]
///     name: String,
///     age: Option<i32>,
/// }
///
/// let mut opts = Options::new().with_args(["--name", "Al", "--age", "9"]);
/// let mut profile = Profile::default();
/// capture(&mut opts, &mut profile).unwrap();
/// assert_eq!(profile.name, "Al");
/// assert_eq!(profile.age, Some(9));
/// ```
pub fn capture(opts: &mut Options, record: &mut dyn Record) -> Result<(), CaptureError> {
    match capture_record(opts, record) {
        Ok(_) => Ok(()),
        Err(e) => {
            if e.is_control() {
                debug!(signal = %e, "capture unwound");
            }
            Err(e)
        }
    }
}

/// Capture every property of `record`, returning the union of their flags.
pub(crate) fn capture_record(
    opts: &mut Options,
    record: &mut dyn Record,
) -> Result<Flags, CaptureError> {
    let mut properties = record.properties();
    record.update(opts, None, &mut properties)?;

    for index in 0..properties.len() {
        if let Some(field) = record.field_mut(properties[index].slot) {
            capture_property(opts, &mut properties[index], field)?;
        }
        record.update(opts, Some(index), &mut properties)?;
    }

    record.validate(opts).into_capture_result()?;

    Ok(properties
        .iter()
        .fold(Flags::NONE, |flags, prop| flags | prop.flags))
}

fn capture_property(
    opts: &mut Options,
    prop: &mut Property,
    field: &mut dyn Field,
) -> Result<(), CaptureError> {
    if field.kind() == Kind::Ignored {
        return Ok(());
    }

    load(opts, prop, field)?;
    from_args(opts, prop, field)?;
    prompt(opts, prop, field)?;
    validate_property(opts, prop, field).into_capture_result()
}

/// Seed a zero scalar from the first non-empty environment variable, else
/// from the declared default.
fn load(opts: &mut Options, prop: &mut Property, field: &mut dyn Field) -> Result<(), CaptureError> {
    if field.kind() != Kind::Scalar || !field.is_zero() {
        return Ok(());
    }

    let env = opts.env().first_env(&prop.env);

    let (text, flag) = match env {
        Some(text) => (text, Flags::ENV),
        None if !prop.default.is_empty() => (prop.default.clone(), Flags::DEFAULT),
        None => return Ok(()),
    };

    debug!(property = %prop.name, source = ?flag, "seeding value");
    set_text(opts, prop, field, &text, flag)
}

fn from_args(
    opts: &mut Options,
    prop: &mut Property,
    field: &mut dyn Field,
) -> Result<(), CaptureError> {
    if !prop.takes_args() {
        return Ok(());
    }
    if let Some(result) = field.run_custom(opts, prop) {
        return result;
    }

    match field.kind() {
        Kind::Scalar => {
            let value = take_arg(&prop.arg, "", &mut opts.args, &opts.arg_prefix, field.is_bool());
            if value.is_empty() {
                return Ok(());
            }
            debug!(property = %prop.name, "value from arguments");
            set_text(opts, prop, field, &value, Flags::ARGS)
        }
        Kind::Record => fill_record(opts, prop, field),
        Kind::List => fill_list(opts, prop, field),
        Kind::Array => fill_array(opts, prop, field),
        Kind::Map => fill_map(opts, prop, field),
        Kind::Ignored => Ok(()),
    }
}

fn prompt(opts: &mut Options, prop: &mut Property, field: &mut dyn Field) -> Result<(), CaptureError> {
    if prop.hide_prompt || field.kind() != Kind::Scalar {
        return Ok(());
    }
    if field.has_custom() {
        return Ok(());
    }
    if !opts.can_prompt() {
        return Ok(());
    }

    if prop.prompt_empty {
        let is_default = field.is_zero() && !prop.flags.contains(Flags::DEFAULT);
        if !prop.flags.contains(Flags::DEFAULT) && !is_default {
            return Ok(());
        }
        if prop
            .flags
            .intersects(Flags::ARGS | Flags::ENV | Flags::PROMPT)
        {
            return Ok(());
        }
    }

    let request = PromptRequest::for_property(opts, prop, field);
    if let Some(value) = opts.prompt(&request, field)? {
        field.commit(value);
        prop.flags.insert(Flags::PROMPT);
    }
    Ok(())
}

/// Convert `input` through the property's choices, parse it and store it.
fn set_text(
    opts: &Options,
    prop: &mut Property,
    field: &mut dyn Field,
    input: &str,
    flag: Flags,
) -> Result<(), CaptureError> {
    let text = match property_choices(opts, prop, field) {
        Some(choices) => choices.convert(input)?,
        None => input.to_string(),
    };

    let mut staged = field.stage();
    parse_input(opts, &prop.name, staged.as_mut(), &text, false)?;
    field.commit(staged);
    prop.flags.insert(flag);
    Ok(())
}

/// Parse `text` into `target`: the prompt parser first (prompt input only),
/// then text unmarshalling, then the built-in parser.
pub(crate) fn parse_input(
    opts: &Options,
    name: &str,
    target: &mut dyn Field,
    text: &str,
    from_prompt: bool,
) -> Result<(), CaptureError> {
    if from_prompt {
        if let Some(parser) = target.prompt_parser() {
            return parser.from_prompt(opts, text);
        }
    }

    let parsed = match target.text_unmarshal() {
        Some(unmarshal) => unmarshal.unmarshal_text(text),
        None => target.parse_text(text),
    };
    parsed.map_err(|e| CaptureError::parse(name, text, e))
}

/// The declared choices, else the choices the value offers.
pub(crate) fn property_choices(opts: &Options, prop: &Property, field: &dyn Field) -> Option<Choices> {
    if !prop.choices.is_empty() {
        return Some(prop.choices.clone());
    }
    field.choices(opts, prop).filter(|choices| !choices.is_empty())
}

/// A lone value presented as a one-property record, so scalar elements go
/// through the same pipeline as record fields.
struct Single<'a> {
    field: &'a mut dyn Field,
    property: Property,
}

impl Record for Single<'_> {
    fn properties(&self) -> Vec<Property> {
        vec![self.property.clone()]
    }

    fn field_count(&self) -> usize {
        1
    }

    fn field(&self, slot: usize) -> Option<&dyn Field> {
        if slot == 0 {
            Some(&*self.field)
        } else {
            None
        }
    }

    fn field_mut(&mut self, slot: usize) -> Option<&mut dyn Field> {
        if slot == 0 {
            Some(&mut *self.field)
        } else {
            None
        }
    }
}

/// Capture one nested value under `prefix`, returning the flags that came
/// from arguments or prompts.
fn capture_value(
    opts: &mut Options,
    parent: &Property,
    value: &mut dyn Field,
    prefix: String,
) -> Result<Flags, CaptureError> {
    let saved = std::mem::replace(&mut opts.arg_prefix, prefix);

    let result = if value.kind() == Kind::Record {
        value.with_record(&mut |record| capture_record(opts, record).map(Flags::important))
    } else {
        let mut single = Single {
            field: value,
            property: parent.element(),
        };
        capture_record(opts, &mut single).map(Flags::important)
    };

    opts.arg_prefix = saved;
    result
}

fn element_prefix(
    opts: &Options,
    format: ArgFormat,
    prop: &Property,
    index: usize,
    kind: Kind,
) -> String {
    format(&ArgTemplate {
        prefix: &opts.arg_prefix,
        arg: &prop.arg,
        index: index + opts.arg_start_index,
        kind,
    })
}

fn fill_record(
    opts: &mut Options,
    prop: &mut Property,
    field: &mut dyn Field,
) -> Result<(), CaptureError> {
    if !opts.ask_start(prop)? {
        return Ok(());
    }

    let prefix = element_prefix(opts, opts.arg_names.record, prop, 0, Kind::Record);
    let saved = std::mem::replace(&mut opts.arg_prefix, prefix);
    let result = field.with_record(&mut |record| capture_record(opts, record).map(Flags::important));
    opts.arg_prefix = saved;

    prop.flags.insert(result?);
    opts.tell_end(prop)
}

fn fill_list(
    opts: &mut Options,
    prop: &mut Property,
    field: &mut dyn Field,
) -> Result<(), CaptureError> {
    if !opts.ask_start(prop)? {
        return Ok(());
    }

    let parent = prop.clone();
    let saved_context = opts.prompt_context.clone();
    let result = field.with_list(&mut |list| fill_list_elements(opts, &parent, list));
    opts.prompt_context = saved_context;

    prop.flags.insert(result?);
    opts.tell_end(prop)
}

fn fill_list_elements(
    opts: &mut Options,
    prop: &Property,
    list: &mut dyn ListAccess,
) -> Result<Flags, CaptureError> {
    let interactive = opts.can_prompt() && !prop.hide_prompt;
    let element_kind = list.new_element().kind();
    let format = opts.arg_names.list;
    let mut flags = Flags::NONE;
    let mut length = list.len();
    let mut more = true;

    if (opts.reprompt_slice_elements || prop.reprompt) && interactive {
        opts.prompt_context.reprompt = true;
        let mut index = 0;
        while index < length && more {
            let prefix = element_prefix(opts, format, prop, index, element_kind);
            opts.prompt_context.for_slice(index);
            let Some(element) = list.element_mut(index) else {
                break;
            };
            match capture_value(opts, prop, element, prefix) {
                Ok(loaded) => {
                    flags |= loaded;
                    if prop.max_reached(length) {
                        break;
                    }
                }
                Err(CaptureError::Discard) => {}
                Err(e) => return Err(e),
            }
            if prop.min_met(length) {
                more = opts.ask_more(prop)?;
            }
            index += 1;
        }
        opts.prompt_context.reprompt = false;
    }

    while more {
        let prefix = element_prefix(opts, format, prop, length, element_kind);
        opts.prompt_context.for_slice(length);
        let mut element = list.new_element();
        match capture_value(opts, prop, element.as_mut(), prefix) {
            Ok(loaded) => {
                // Without a human nothing more can arrive once the arguments run dry.
                if loaded.is_empty() && (!interactive || prop.prompt_more.is_empty()) {
                    break;
                }
                flags |= loaded;
                list.push(element);
                length = list.len();
                if prop.max_reached(length) {
                    break;
                }
            }
            Err(CaptureError::Discard) => debug!(property = %prop.name, "list element discarded"),
            Err(e) => return Err(e),
        }
        if prop.min_met(length) {
            more = opts.ask_more(prop)?;
        }
    }

    Ok(flags)
}

fn fill_array(
    opts: &mut Options,
    prop: &mut Property,
    field: &mut dyn Field,
) -> Result<(), CaptureError> {
    if !opts.ask_start(prop)? {
        return Ok(());
    }

    let parent = prop.clone();
    let result = field.with_array(&mut |array| fill_array_elements(opts, &parent, array));

    prop.flags.insert(result?);
    opts.tell_end(prop)
}

fn fill_array_elements(
    opts: &mut Options,
    prop: &Property,
    array: &mut dyn ArrayAccess,
) -> Result<Flags, CaptureError> {
    let element_kind = array.element_kind();
    let format = opts.arg_names.array;
    let mut flags = Flags::NONE;

    for index in 0..array.len() {
        let prefix = element_prefix(opts, format, prop, index, element_kind);
        let Some(element) = array.element_mut(index) else {
            break;
        };
        flags |= capture_value(opts, prop, element, prefix)?;
    }

    Ok(flags)
}

fn fill_map(
    opts: &mut Options,
    prop: &mut Property,
    field: &mut dyn Field,
) -> Result<(), CaptureError> {
    if !opts.ask_start(prop)? {
        return Ok(());
    }

    let parent = prop.clone();
    let saved_context = opts.prompt_context.clone();
    let result = field.with_map(&mut |map| fill_map_entries(opts, &parent, map));
    opts.prompt_context = saved_context;

    prop.flags.insert(result?);
    opts.tell_end(prop)
}

fn fill_map_entries(
    opts: &mut Options,
    prop: &Property,
    map: &mut dyn MapAccess,
) -> Result<Flags, CaptureError> {
    let interactive = opts.can_prompt() && !prop.hide_prompt;
    let key_kind = map.new_key().kind();
    let value_kind = map.new_value().kind();
    let (key_format, value_format) = (opts.arg_names.map_key, opts.arg_names.map_value);
    let mut flags = Flags::NONE;
    let mut length = map.len();
    let mut more = true;

    if (opts.reprompt_map_values || prop.reprompt) && interactive {
        opts.prompt_context.reprompt = true;
        for index in 0..length {
            let Some((key, value)) = map.entry_mut(index) else {
                break;
            };
            opts.prompt_context.for_map_value(&key);
            match capture_value(opts, prop, value, String::new()) {
                Ok(loaded) => {
                    flags |= loaded;
                    if prop.max_reached(length) {
                        break;
                    }
                    if prop.min_met(length) && !opts.ask_more(prop)? {
                        more = false;
                        break;
                    }
                }
                Err(CaptureError::Discard) => {}
                Err(e) => return Err(e),
            }
        }
        opts.prompt_context.reprompt = false;
    }

    while more {
        let key_prefix = element_prefix(opts, key_format, prop, length, key_kind);
        opts.prompt_context.for_map_key();
        let mut key = map.new_key();

        match capture_value(opts, prop, key.as_mut(), key_prefix) {
            Ok(key_loaded) => {
                if key_loaded.is_empty() && (!interactive || prop.prompt_more.is_empty()) {
                    break;
                }

                let value_prefix = element_prefix(opts, value_format, prop, length, value_kind);
                opts.prompt_context.for_map_value(&key.display());
                let mut value = map.new_value();

                match capture_value(opts, prop, value.as_mut(), value_prefix) {
                    Ok(value_loaded) => {
                        flags |= key_loaded | value_loaded;
                        map.insert(key, value);
                        length = map.len();
                        if prop.max_reached(length) {
                            break;
                        }
                    }
                    Err(CaptureError::Discard) => {
                        debug!(property = %prop.name, "map value discarded")
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(CaptureError::Discard) => debug!(property = %prop.name, "map key discarded"),
            Err(e) => return Err(e),
        }

        if prop.min_met(length) {
            more = opts.ask_more(prop)?;
        }
    }

    Ok(flags)
}
