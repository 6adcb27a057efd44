//! Property descriptors: the per-field capture configuration.

use regex::Regex;

use crate::choices::Choices;
use crate::flags::Flags;

/// Capture configuration for one addressable field of a record.
///
/// Descriptors are built fresh for every capture, usually by the code that
/// `#[derive(Capture)]` generates. `flags` records which sources supplied the
/// field's value during the current capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Display name of the field
    pub name: String,
    /// Slot of the field in its record
    pub slot: usize,
    /// Text shown when prompting
    pub prompt_text: String,
    /// Never prompt for this field
    pub hide_prompt: bool,
    /// Prompt input spans lines until the stop line
    pub prompt_multi: bool,
    /// Question asked before populating a container; empty or `-` skips it
    pub prompt_start: String,
    /// Question asked before another container element; empty skips it
    pub prompt_more: String,
    /// Message shown after populating a container; empty skips it
    pub prompt_end: String,
    /// Only prompt when no source supplied a value
    pub prompt_empty: bool,
    /// Read input without echo
    pub input_hidden: bool,
    /// Tries for a valid value, overriding [`Options::reprompt_on_invalid`](crate::Options::reprompt_on_invalid) when non-zero
    pub prompt_tries: usize,
    /// Ask twice and require matching input
    pub prompt_verify: bool,
    /// Re-prompt elements already in a list or map
    pub reprompt: bool,
    /// Help text shown on request
    pub help: String,
    /// Do not show the current value as the prompt default
    pub hide_default: bool,
    /// Text shown in place of the current value
    pub default_text: String,
    /// Default value as text
    pub default: String,
    /// Regular expression prompt input must match
    pub regex: String,
    /// Declared choices
    pub choices: Choices,
    /// Inclusive minimum value or length
    pub min: Option<f64>,
    /// Inclusive maximum value or length
    pub max: Option<f64>,
    /// Environment variables consulted in order
    pub env: Vec<String>,
    /// Argument key; `-` disables arguments
    pub arg: String,
    /// Sources that supplied the current value
    pub flags: Flags,
}

impl Property {
    /// A descriptor with the default texts derived from `name`.
    pub fn new(name: impl Into<String>, slot: usize) -> Self {
        let name = name.into();
        let mut prop = Self {
            arg: name.clone(),
            name: name.clone(),
            slot,
            prompt_text: String::new(),
            hide_prompt: false,
            prompt_multi: false,
            prompt_start: String::new(),
            prompt_more: String::new(),
            prompt_end: String::new(),
            prompt_empty: false,
            input_hidden: false,
            prompt_tries: 0,
            prompt_verify: false,
            reprompt: false,
            help: String::new(),
            hide_default: false,
            default_text: String::new(),
            default: String::new(),
            regex: String::new(),
            choices: Choices::new(),
            min: None,
            max: None,
            env: Vec::new(),
            flags: Flags::NONE,
        };
        prop.set_prompt(name);
        prop
    }

    /// Set the prompt text and the container questions derived from it.
    ///
    /// `-` hides the prompt. Explicit `start`/`more`/`end` texts must be set
    /// after this.
    pub fn set_prompt(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.hide_prompt = text == "-";
        self.prompt_start = format!("{}?", text);
        self.prompt_more = format!("More {}?", text);
        self.prompt_end = format!("End {}", text);
        self.prompt_text = text;
    }

    /// Apply one declarative setting, using the same keys as `#[capture(...)]`.
    ///
    /// # Panics
    ///
    /// Panics when `min`, `max` or `tries` is not a number, when `regex` does
    /// not compile, or when the key is unknown. These are declaration errors.
    pub fn set_tag(&mut self, key: &str, value: &str) {
        match key {
            "prompt" => self.set_prompt(value),
            "multi" => self.prompt_multi = true,
            "hidden" => self.input_hidden = true,
            "verify" => self.prompt_verify = true,
            "empty" => self.prompt_empty = true,
            "reprompt" => self.reprompt = true,
            "tries" => {
                self.prompt_tries = value
                    .parse()
                    .unwrap_or_else(|_| panic!("tries of {} is not a valid count", self.name))
            }
            "start" => self.prompt_start = value.to_string(),
            "more" => self.prompt_more = value.to_string(),
            "end" => self.prompt_end = value.to_string(),
            "help" => self.help = value.to_string(),
            "hide_default" => self.hide_default = true,
            "default" => self.default = value.to_string(),
            "default_text" => self.default_text = value.to_string(),
            "regex" => {
                if let Err(e) = Regex::new(value) {
                    panic!("regex of {} is invalid: {}", self.name, e);
                }
                self.regex = value.to_string();
            }
            "env" => {
                self.env = value
                    .split(',')
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "arg" => self.arg = value.to_string(),
            "min" => self.min = Some(parse_bound(&self.name, "min", value)),
            "max" => self.max = Some(parse_bound(&self.name, "max", value)),
            "options" => {
                if !value.is_empty() {
                    self.choices = Choices::from_tag(value);
                }
            }
            other => panic!("unknown capture setting {:?} on {}", other, self.name),
        }
    }

    /// Builder form of [`Property::set_tag`].
    ///
    /// ```
    /// use argprompt::Property;
    ///
    /// let prop = Property::new("Name", 0)
    ///     .with_tag("prompt", "Your name")
    ///     .with_tag("min", "2");
    /// assert_eq!(prop.prompt_more, "More Your name?");
    /// assert_eq!(prop.min, Some(2.0));
    /// ```
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.set_tag(key, value);
        self
    }

    /// Whether arguments are read for this property.
    pub fn takes_args(&self) -> bool {
        self.arg != "-"
    }

    /// Whether a container with `len` elements satisfies `min`.
    pub fn min_met(&self, len: usize) -> bool {
        self.min.map_or(true, |min| len as f64 >= min)
    }

    /// Whether a container with `len` elements has reached `max`.
    pub fn max_reached(&self, len: usize) -> bool {
        self.max.map_or(false, |max| len as f64 >= max)
    }

    /// The descriptor used for a scalar element, key or value of this container.
    ///
    /// The element is matched by the container's argument prefix alone, so its
    /// own argument key is empty.
    pub fn element(&self) -> Property {
        let mut element = Property::new(self.name.clone(), 0);
        element.set_prompt(self.prompt_text.clone());
        element.hide_prompt = self.hide_prompt;
        element.prompt_multi = self.prompt_multi;
        element.input_hidden = self.input_hidden;
        element.help = self.help.clone();
        element.regex = self.regex.clone();
        element.choices = self.choices.clone();
        element.arg = String::new();
        element
    }

    /// Move this descriptor `offset` slots down, used when splicing a
    /// flattened record into its parent.
    pub fn with_slot_offset(mut self, offset: usize) -> Self {
        self.slot += offset;
        self
    }
}

fn parse_bound(name: &str, key: &str, value: &str) -> f64 {
    value
        .parse()
        .unwrap_or_else(|_| panic!("{} of {} is not a valid number", key, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_texts() {
        let prop = Property::new("FaveNumbers", 3);
        assert_eq!(prop.prompt_text, "FaveNumbers");
        assert_eq!(prop.prompt_start, "FaveNumbers?");
        assert_eq!(prop.prompt_more, "More FaveNumbers?");
        assert_eq!(prop.prompt_end, "End FaveNumbers");
        assert_eq!(prop.arg, "FaveNumbers");
        assert_eq!(prop.slot, 3);
        assert!(prop.flags.is_empty());
    }

    #[test]
    fn test_prompt_dash_hides() {
        let prop = Property::new("Secret", 0).with_tag("prompt", "-");
        assert!(prop.hide_prompt);
    }

    #[test]
    fn test_tags_after_prompt() {
        let prop = Property::new("Movies", 0)
            .with_tag("prompt", "Favorite movies")
            .with_tag("start", "Do you have any favorite movies?")
            .with_tag("end", "")
            .with_tag("env", "A,B")
            .with_tag("options", "x:1,y:2")
            .with_tag("tries", "4");
        assert_eq!(prop.prompt_more, "More Favorite movies?");
        assert_eq!(prop.prompt_start, "Do you have any favorite movies?");
        assert_eq!(prop.prompt_end, "");
        assert_eq!(prop.env, vec!["A", "B"]);
        assert_eq!(prop.choices.len(), 2);
        assert_eq!(prop.prompt_tries, 4);
    }

    #[test]
    #[should_panic(expected = "min of Age is not a valid number")]
    fn test_bad_min_panics() {
        let _ = Property::new("Age", 0).with_tag("min", "two");
    }

    #[test]
    #[should_panic(expected = "regex of Code is invalid")]
    fn test_bad_regex_panics() {
        let _ = Property::new("Code", 0).with_tag("regex", "(");
    }

    #[test]
    fn test_min_max_bounds() {
        let prop = Property::new("Tags", 0)
            .with_tag("min", "2")
            .with_tag("max", "3");
        assert!(!prop.min_met(1));
        assert!(prop.min_met(2));
        assert!(!prop.max_reached(2));
        assert!(prop.max_reached(3));

        let unbounded = Property::new("Tags", 0);
        assert!(unbounded.min_met(0));
        assert!(!unbounded.max_reached(1000));
    }

    #[test]
    fn test_element_inherits_prompting() {
        let prop = Property::new("Tags", 2)
            .with_tag("prompt", "Tag")
            .with_tag("hidden", "")
            .with_tag("options", "a,b")
            .with_tag("min", "1")
            .with_tag("arg", "tag");
        let element = prop.element();
        assert_eq!(element.prompt_text, "Tag");
        assert!(element.input_hidden);
        assert_eq!(element.choices.len(), 2);
        assert_eq!(element.min, None);
        assert_eq!(element.arg, "");
        assert!(element.takes_args());
    }
}
