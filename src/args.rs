//! Argument matching and argument-name formatting.
//!
//! Arguments are plain tokens such as `--name Al --verbose`. A property is
//! looked up by its argument key under the current prefix, and the matched
//! tokens are removed so later properties never see them.

use crate::value::Kind;

/// Strip everything but ASCII letters and digits, then lowercase.
///
/// Names, argument keys and choice inputs are all compared in this form, so
/// `--Fave_Numbers`, `--fave-numbers` and `--favenumbers` are the same key.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The punctuation that marks a token as an argument name, e.g. `--` for
/// the prefix `--movies-1-`.
fn leading_marker(prefix: &str) -> &str {
    let end = prefix
        .find(|c: char| c.is_ascii_alphanumeric())
        .unwrap_or(prefix.len());
    &prefix[..end]
}

/// Find `prefix + name` in `args`, remove it and return its value.
///
/// The name token is matched ignoring case and punctuation after the leading
/// marker of `prefix`. The following token is consumed as the value unless it
/// itself starts with the marker. When nothing follows, `default` is returned,
/// or `"true"` when `flag` is set. Returns `default` without touching `args`
/// when no token matches.
///
/// ```
/// use argprompt::take_arg;
///
/// let mut args = vec!["--age".to_string(), "5".to_string(), "--x".to_string()];
/// assert_eq!(take_arg("age", "", &mut args, "--", false), "5");
/// assert_eq!(args, vec!["--x".to_string()]);
/// ```
pub fn take_arg(
    name: &str,
    default: &str,
    args: &mut Vec<String>,
    prefix: &str,
    flag: bool,
) -> String {
    let marker = leading_marker(prefix);
    let wanted = normalize(&format!("{}{}", &prefix[marker.len()..], name));

    let position = args.iter().position(|arg| {
        arg.starts_with(marker) && normalize(&arg[marker.len()..]) == wanted
    });

    let Some(index) = position else {
        return default.to_string();
    };

    let mut erase = 1;
    let mut value = default.to_string();
    if let Some(next) = args.get(index + 1) {
        if marker.is_empty() || !next.starts_with(marker) {
            value = next.clone();
            erase = 2;
        }
    }
    if flag && value == default {
        value = "true".to_string();
    }

    args.drain(index..index + erase);
    value
}

/// The inputs to an argument-name formatter.
#[derive(Debug, Clone, Copy)]
pub struct ArgTemplate<'a> {
    /// The prefix in effect for the containing record, e.g. `--` or `--person-`
    pub prefix: &'a str,
    /// The property's argument key
    pub arg: &'a str,
    /// Element index, already offset by the start index
    pub index: usize,
    /// Kind of the element (or record) being named
    pub kind: Kind,
}

impl ArgTemplate<'_> {
    /// True when the element is a scalar rather than a container.
    pub fn is_simple(&self) -> bool {
        !matches!(
            self.kind,
            Kind::Record | Kind::List | Kind::Array | Kind::Map
        )
    }
}

/// Formats the argument prefix for a nested value.
pub type ArgFormat = fn(&ArgTemplate<'_>) -> String;

/// The argument-name formatters used for each container kind.
#[derive(Debug, Clone, Copy)]
pub struct ArgNames {
    /// Prefix for the fields of a nested record
    pub record: ArgFormat,
    /// Prefix for a list element
    pub list: ArgFormat,
    /// Prefix for an array element
    pub array: ArgFormat,
    /// Prefix for a map key
    pub map_key: ArgFormat,
    /// Prefix for a map value
    pub map_value: ArgFormat,
}

impl Default for ArgNames {
    fn default() -> Self {
        Self {
            record: record_arg,
            list: list_arg,
            array: array_arg,
            map_key: map_key_arg,
            map_value: map_value_arg,
        }
    }
}

/// `<prefix><arg>-`
pub fn record_arg(t: &ArgTemplate<'_>) -> String {
    format!("{}{}-", t.prefix, t.arg)
}

/// `<prefix><arg>` for scalar elements, `<prefix><arg>-<index>-` otherwise.
pub fn list_arg(t: &ArgTemplate<'_>) -> String {
    if t.is_simple() {
        format!("{}{}", t.prefix, t.arg)
    } else {
        format!("{}{}-{}-", t.prefix, t.arg, t.index)
    }
}

/// `<prefix><arg>-<index>`, with a trailing `-` for container elements.
pub fn array_arg(t: &ArgTemplate<'_>) -> String {
    let name = format!("{}{}-{}", t.prefix, t.arg, t.index);
    if t.is_simple() {
        name
    } else {
        name + "-"
    }
}

/// `<prefix><arg>-key`, with a trailing `-` for container keys.
pub fn map_key_arg(t: &ArgTemplate<'_>) -> String {
    let name = format!("{}{}-key", t.prefix, t.arg);
    if t.is_simple() {
        name
    } else {
        name + "-"
    }
}

/// `<prefix><arg>-value`, with a trailing `-` for container values.
pub fn map_value_arg(t: &ArgTemplate<'_>) -> String {
    let name = format!("{}{}-value", t.prefix, t.arg);
    if t.is_simple() {
        name
    } else {
        name + "-"
    }
}
