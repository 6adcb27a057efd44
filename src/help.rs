//! Help text for properties, records and registered commands.

use crate::args::ArgTemplate;
use crate::capture::property_choices;
use crate::flags::Flags;
use crate::options::Options;
use crate::property::Property;
use crate::registry::Entry;
use crate::value::{Field, Kind, Record};

/// The help for one property, wrapped at [`Options::help_wrap`].
///
/// `arg` is the full argument name shown to the user, e.g. `--age`. This is
/// what the in-prompt help token displays.
///
/// ```
/// use argprompt::{property_help, Options, Property};
///
/// let opts = Options::new();
/// let prop = Property::new("Age", 0).with_tag("help", "Your age").with_tag("min", "0");
/// let help = property_help(&opts, &prop, &mut 0u8, "--age");
/// assert!(help.starts_with("- Your age\n- A value of type u8."));
/// assert!(help.contains("- Can be specified with the argument --age"));
/// ```
pub fn property_help(opts: &Options, prop: &Property, field: &mut dyn Field, arg: &str) -> String {
    let lines = help_lines(opts, prop, field, arg);
    format_help(&lines, 0, opts.help_wrap, opts.help_indent)
}

fn help_lines(opts: &Options, prop: &Property, field: &mut dyn Field, arg: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let kind = field.kind();

    if !prop.help.is_empty() {
        lines.push(format!("- {}", prop.help));
    }
    if kind == Kind::Scalar {
        let article = if field.is_optional() { "An optional" } else { "A" };
        lines.push(format!("- {} value of type {}.", article, field.type_name()));
    }

    if let Some(choices) = property_choices(opts, prop, field) {
        let texts: Vec<&str> = choices.iter().map(|(_, c)| c.text.as_str()).collect();
        lines.push(format!("- Valid values: {}", texts.join(" ")));
    } else if field.is_bool() {
        lines.push("- Valid values: 1, t, true, 0, f, false".to_string());
    } else if kind == Kind::List {
        let (_, element_type) = element_info(field);
        lines.push(format!(
            "- A list of {}. You can specify the arguments any number of times to populate the list.",
            element_type
        ));
    }

    if prop.hide_prompt {
        lines.push("- Not prompted from the user.".to_string());
    } else {
        if prop.prompt_empty {
            let env = if prop.env.is_empty() { "" } else { " environment variables or" };
            lines.push(format!(
                "- Will only be prompted if no value was loaded into it from{} arguments.",
                env
            ));
        }
        if prop.prompt_multi {
            lines.push("- Accepts multiple lines of input, and ends on an empty line.".to_string());
        }
        if !prop.regex.is_empty() {
            lines.push(format!("- Must match the regular expression /{}/", prop.regex));
        }
        if prop.prompt_verify {
            lines.push("- Will be prompted twice to confirm the input.".to_string());
        }
        if prop.input_hidden {
            lines.push(
                "- You won't see the input, the property is considered sensitive.".to_string(),
            );
        }
    }

    if let Some(min) = prop.min {
        lines.push(format!("- Must be a minimum of {} (inclusive).", min));
    }
    if let Some(max) = prop.max {
        lines.push(format!("- Must be a maximum of {} (inclusive).", max));
    }
    if !prop.default.is_empty() {
        lines.push(format!("- Has a default value of \"{}\".", prop.default));
    }
    if prop.takes_args() && !arg.is_empty() {
        lines.push(format!("- Can be specified with the argument {}", arg));
    }
    if !prop.env.is_empty() {
        lines.push(format!(
            "- Can be populated by the environment variables: {}",
            prop.env.join(" ")
        ));
    }

    lines
}

/// Kind and type name of the elements of a list or array, or the keys of a map.
fn element_info(field: &mut dyn Field) -> (Kind, String) {
    let mut info = (Kind::Scalar, String::new());
    let _ = match field.kind() {
        Kind::List => field.with_list(&mut |list| {
            let element = list.new_element();
            info = (element.kind(), element.type_name());
            Ok(Flags::NONE)
        }),
        Kind::Array => field.with_array(&mut |array| {
            let name = array.element_mut(0).map(|e| e.type_name()).unwrap_or_default();
            info = (array.element_kind(), name);
            Ok(Flags::NONE)
        }),
        Kind::Map => field.with_map(&mut |map| {
            let key = map.new_key();
            info = (key.kind(), key.type_name());
            Ok(Flags::NONE)
        }),
        _ => Ok(Flags::NONE),
    };
    info
}

/// Indent every non-blank line by `prefix` spaces and wrap it at `width`;
/// continuation lines get `indent` more spaces.
pub fn format_help(lines: &[String], prefix: usize, width: usize, indent: usize) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| wrap(line, prefix, width, indent))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Greedy word wrap counted in display columns; a width of zero disables
/// wrapping. Lines break at spaces only and words are never split.
pub fn wrap(line: &str, prefix: usize, width: usize, indent: usize) -> String {
    let initial = " ".repeat(prefix);
    if width == 0 {
        return format!("{initial}{line}");
    }
    let continuation = " ".repeat(prefix + indent);
    let options = textwrap::Options::new(width)
        .initial_indent(&initial)
        .subsequent_indent(&continuation)
        .break_words(false)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .word_splitter(textwrap::WordSplitter::NoHyphenation)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);
    textwrap::wrap(line, options).join("\n")
}

/// One line per entry: the name padded to the longest name, then its short help.
pub fn root_help(entries: &[Entry]) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|e| format!("{:<width$}  {}\n", e.name, e.help_short, width = width))
        .collect()
}

/// Name, aliases and description of `entry`, then the help of every property
/// of `record`, nested records indented under their parent.
pub fn entry_help(opts: &Options, entry: &Entry, record: &mut dyn Record) -> String {
    let mut out = entry.name.clone();

    let aliases: Vec<&str> = entry
        .aliases
        .iter()
        .map(String::as_str)
        .filter(|a| !a.is_empty())
        .collect();
    if !aliases.is_empty() {
        out.push_str(&format!(" (aka {})", aliases.join(", ")));
    }
    out.push_str(":\n");

    if !entry.help_long.is_empty() {
        out.push_str(&format!("  {}\n", entry.help_long));
    } else if !entry.help_short.is_empty() {
        out.push_str(&format!("  {}\n", entry.help_short));
    }

    record_help(opts, record, &opts.arg_prefix, 0, &mut out);
    out
}

fn record_help(opts: &Options, record: &mut dyn Record, prefix: &str, depth: usize, out: &mut String) {
    for prop in record.properties() {
        let Some(field) = record.field_mut(prop.slot) else {
            continue;
        };
        let kind = field.kind();
        if kind == Kind::Ignored {
            continue;
        }

        let format = match kind {
            Kind::Array => Some(opts.arg_names.array),
            Kind::List => Some(opts.arg_names.list),
            Kind::Record => Some(opts.arg_names.record),
            Kind::Map => Some(opts.arg_names.map_key),
            _ => None,
        };
        let arg = match format {
            Some(format) => format(&ArgTemplate {
                prefix,
                arg: &prop.arg,
                index: opts.arg_start_index,
                kind: if kind == Kind::Record {
                    Kind::Record
                } else {
                    element_info(field).0
                },
            }),
            None => format!("{}{}", prefix, prop.arg),
        }
        .to_lowercase();

        out.push_str(&format!("{}{}\n", " ".repeat(depth * 2), prop.name));
        let lines = help_lines(opts, &prop, field, &arg);
        let help = format_help(&lines, (depth + 1) * opts.help_indent, opts.help_wrap, opts.help_indent);
        if !help.is_empty() {
            out.push_str(&help);
            out.push('\n');
        }

        let _ = match kind {
            Kind::Record => field.with_record(&mut |nested| {
                record_help(opts, nested, &arg, depth + 1, out);
                Ok(Flags::NONE)
            }),
            Kind::List => field.with_list(&mut |list| {
                let mut element = list.new_element();
                element.with_record(&mut |nested| {
                    record_help(opts, nested, &arg, depth + 1, out);
                    Ok(Flags::NONE)
                })
            }),
            Kind::Array => field.with_array(&mut |array| match array.element_mut(0) {
                Some(element) => element.with_record(&mut |nested| {
                    record_help(opts, nested, &arg, depth + 1, out);
                    Ok(Flags::NONE)
                }),
                None => Ok(Flags::NONE),
            }),
            _ => Ok(Flags::NONE),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(prop: &Property, field: &mut dyn Field, arg: &str) -> Vec<String> {
        help_lines(&Options::new(), prop, field, arg)
    }

    #[test]
    fn test_scalar_lines() {
        let prop = Property::new("Age", 0)
            .with_tag("help", "How old")
            .with_tag("min", "1")
            .with_tag("max", "150")
            .with_tag("default", "30")
            .with_tag("env", "AGE,USER_AGE");
        assert_eq!(
            lines(&prop, &mut 0u8, "--age"),
            vec![
                "- How old",
                "- A value of type u8.",
                "- Must be a minimum of 1 (inclusive).",
                "- Must be a maximum of 150 (inclusive).",
                "- Has a default value of \"30\".",
                "- Can be specified with the argument --age",
                "- Can be populated by the environment variables: AGE USER_AGE",
            ]
        );
    }

    #[test]
    fn test_optional_bool_lines() {
        let prop = Property::new("Debug", 0).with_tag("prompt", "-");
        assert_eq!(
            lines(&prop, &mut None::<bool>, "--debug"),
            vec![
                "- An optional value of type bool.",
                "- Valid values: 1, t, true, 0, f, false",
                "- Not prompted from the user.",
                "- Can be specified with the argument --debug",
            ]
        );
    }

    #[test]
    fn test_list_and_prompt_notes() {
        let prop = Property::new("Tags", 0)
            .with_tag("empty", "")
            .with_tag("verify", "")
            .with_tag("regex", "^[a-z]+$");
        let help = lines(&prop, &mut Vec::<String>::new(), "--tags");
        assert_eq!(
            help[0],
            "- A list of string. You can specify the arguments any number of times to populate the list."
        );
        assert_eq!(
            help[1],
            "- Will only be prompted if no value was loaded into it from arguments."
        );
        assert_eq!(help[2], "- Must match the regular expression /^[a-z]+$/");
        assert_eq!(help[3], "- Will be prompted twice to confirm the input.");
    }

    #[test]
    fn test_choices_line() {
        let prop = Property::new("Size", 0).with_tag("options", "small:s,large:l");
        let help = lines(&prop, &mut String::new(), "");
        assert_eq!(help[1], "- Valid values: large small");
        assert_eq!(help.len(), 2);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("- one two three", 2, 10, 2), "  - one\n    two\n    three");
        assert_eq!(wrap("short", 0, 80, 2), "short");
        assert_eq!(wrap("no wrap at all", 0, 0, 2), "no wrap at all");
    }

    #[test]
    fn test_wrap_counts_columns_not_bytes() {
        assert_eq!(wrap("Größe größer", 0, 12, 2), "Größe größer");
        assert_eq!(wrap("Größe größer", 1, 12, 2), " Größe\n   größer");
    }

    #[test]
    fn test_wrap_keeps_hyphenated_arguments_whole() {
        assert_eq!(
            wrap("- Use --log-level here", 0, 12, 2),
            "- Use\n  --log-level\n  here"
        );
    }

    #[test]
    fn test_format_help_skips_blank_lines() {
        let text = format_help(&["  - a".to_string(), "   ".to_string(), "- b".to_string()], 4, 80, 2);
        assert_eq!(text, "    - a\n    - b");
    }
}
