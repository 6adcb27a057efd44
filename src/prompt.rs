//! The prompt engine.
//!
//! A single value is resolved with [`Options::prompt`]: the prompt line is
//! rendered per attempt, the answer is checked against the regex and the
//! choices, parsed into a staged value and optionally verified by a second
//! answer. Containers use the yes/no questions [`Options::ask_start`] and
//! [`Options::ask_more`].

use std::io;

use regex::Regex;
use tracing::debug;

use crate::capture::{parse_input, property_choices};
use crate::choices::Choices;
use crate::error::CaptureError;
use crate::flags::Flags;
use crate::help::property_help;
use crate::options::Options;
use crate::property::Property;
use crate::value::Field;

/// Where the value being prompted sits inside containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    /// Prompting for a map key
    pub is_map_key: bool,
    /// Prompting for a map value
    pub is_map_value: bool,
    /// Rendered key of the map value being prompted
    pub map_key: String,
    /// Prompting for a list element
    pub is_slice: bool,
    /// Index of the list element being prompted
    pub slice_index: usize,
    /// Existing elements are being re-prompted
    pub reprompt: bool,
}

impl PromptContext {
    /// Clear everything but `reprompt`.
    pub fn reset(&mut self) {
        self.is_map_key = false;
        self.is_map_value = false;
        self.map_key.clear();
        self.is_slice = false;
        self.slice_index = 0;
    }

    /// Mark the next prompt as a map key.
    pub fn for_map_key(&mut self) {
        self.reset();
        self.is_map_key = true;
    }

    /// Mark the next prompt as the value for `key`.
    pub fn for_map_value(&mut self, key: &str) {
        self.reset();
        self.is_map_value = true;
        self.map_key = key.to_string();
    }

    /// Mark the next prompt as list element `index`.
    pub fn for_slice(&mut self, index: usize) {
        self.reset();
        self.is_slice = true;
        self.slice_index = index;
    }
}

/// Counters for the current prompt, available to the prompt renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptStatus {
    /// Asking again right after help was shown
    pub after_help: bool,
    /// Attempts made so far
    pub prompt_count: usize,
    /// Answers that matched no choice
    pub invalid_choice: usize,
    /// Answers that were empty, failed the regex or did not parse
    pub invalid_format: usize,
    /// This is the confirmation prompt
    pub verify: bool,
    /// Confirmations that did not match
    pub invalid_verify: usize,
}

/// Options for reading a single answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptOnce {
    /// Read lines until the stop line
    pub multi: bool,
    /// Read without echo
    pub hidden: bool,
}

/// Everything the prompt line renderer sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptTemplate {
    /// The property's prompt text
    pub prompt_text: String,
    /// Text shown in place of the current value
    pub default_text: String,
    /// The rendered current value
    pub current_text: String,
    /// The current value is the zero value and no default was applied
    pub is_default: bool,
    /// Do not show the current value
    pub hide_default: bool,
    /// Help can be requested
    pub has_help: bool,
    /// Container position
    pub context: PromptContext,
    /// Attempt counters
    pub status: PromptStatus,
}

/// Renders a prompt line.
pub type PromptFormat = fn(&PromptTemplate) -> String;

/// `Text[ [key]][ key][ [index]][ (default)][ (confirm)]: `
///
/// ```
/// use argprompt::{default_prompt_format, PromptTemplate};
///
/// let mut template = PromptTemplate {
///     prompt_text: "Your age".to_string(),
///     current_text: "9".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(default_prompt_format(&template), "Your age (9): ");
///
/// template.status.verify = true;
/// assert_eq!(default_prompt_format(&template), "Your age (9) (confirm): ");
/// ```
pub fn default_prompt_format(t: &PromptTemplate) -> String {
    let mut out = t.prompt_text.clone();
    if t.context.is_map_value {
        out.push_str(&format!(" [{}]", t.context.map_key));
    }
    if t.context.is_map_key {
        out.push_str(" key");
    }
    if t.context.is_slice && t.context.reprompt {
        out.push_str(&format!(" [{}]", t.context.slice_index));
    }
    if !t.default_text.is_empty() {
        out.push_str(&format!(" ({})", t.default_text));
    } else if !t.is_default && !t.hide_default {
        out.push_str(&format!(" ({})", t.current_text));
    }
    if t.status.verify {
        out.push_str(" (confirm)");
    }
    out.push_str(": ");
    out
}

/// A request for one value.
#[derive(Debug, Clone, Default)]
pub struct PromptRequest {
    /// Name used in parse errors
    pub name: String,
    /// Rendered by [`Options::prompt_format`] on every attempt
    pub template: PromptTemplate,
    /// Read without echo
    pub hidden: bool,
    /// Ask twice and require matching answers
    pub verify: bool,
    /// Read lines until the stop line
    pub multi: bool,
    /// Retries after the first attempt
    pub tries: usize,
    /// Shown when the help token is entered; empty disables help
    pub help: String,
    /// Answers must match this expression
    pub regex: String,
    /// Answers are converted through these choices
    pub choices: Option<Choices>,
    /// An empty answer leaves the value unset
    pub optional: bool,
}

impl PromptRequest {
    /// A plain request showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            name: text.clone(),
            template: PromptTemplate {
                prompt_text: text,
                is_default: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// The request for `prop`, whose current value is `field`.
    pub fn for_property(opts: &Options, prop: &Property, field: &mut dyn Field) -> Self {
        let is_default = field.is_zero() && !prop.flags.contains(Flags::DEFAULT);
        let help = if prop.help.is_empty() {
            String::new()
        } else {
            let arg = format!("{}{}", opts.arg_prefix, prop.arg.to_lowercase());
            property_help(opts, prop, field, &arg)
        };

        Self {
            name: prop.name.clone(),
            template: PromptTemplate {
                prompt_text: prop.prompt_text.clone(),
                default_text: prop.default_text.clone(),
                current_text: field.display(),
                is_default,
                hide_default: prop.hide_default,
                has_help: !prop.help.is_empty(),
                context: opts.prompt_context.clone(),
                status: PromptStatus::default(),
            },
            hidden: prop.input_hidden,
            verify: prop.prompt_verify,
            multi: prop.prompt_multi,
            tries: if prop.prompt_tries > 0 {
                prop.prompt_tries
            } else {
                opts.reprompt_on_invalid
            },
            help,
            regex: prop.regex.clone(),
            choices: property_choices(opts, prop, field),
            optional: field.is_optional() || !is_default,
        }
    }

    fn once(&self) -> PromptOnce {
        PromptOnce {
            multi: self.multi,
            hidden: self.hidden,
        }
    }
}

impl Options {
    /// Show `prompt` and read one answer.
    ///
    /// Multi-line answers are joined with `\n`. The quit and discard tokens
    /// (compared ignoring case) become [`CaptureError::Quit`] and
    /// [`CaptureError::Discard`].
    pub fn prompt_once(&mut self, prompt: &str, once: PromptOnce) -> Result<String, CaptureError> {
        self.write(prompt)?;

        let mut input = String::new();
        if once.multi {
            let mut lines: Vec<String> = Vec::new();
            loop {
                let line = match self.terminal_mut()?.read_line(once.hidden) {
                    Ok(line) => line,
                    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !lines.is_empty() => break,
                    Err(e) => return Err(e.into()),
                };
                if line == self.multi_stop {
                    break;
                }
                lines.push(line);
            }
            input = lines.join("\n");
        } else {
            input.push_str(&self.terminal_mut()?.read_line(once.hidden)?);
        }

        if !self.quit_prompt.is_empty() && input.eq_ignore_ascii_case(&self.quit_prompt) {
            debug!("quit requested at prompt");
            return Err(CaptureError::Quit);
        }
        if !self.discard_prompt.is_empty() && input.eq_ignore_ascii_case(&self.discard_prompt) {
            debug!("discard requested at prompt");
            return Err(CaptureError::Discard);
        }
        Ok(input)
    }

    /// Ask whether to start populating the container `prop`.
    ///
    /// Answers yes without asking when prompting is off, the prompt is
    /// hidden, or the start question is empty or `-`.
    pub fn ask_start(&mut self, prop: &Property) -> Result<bool, CaptureError> {
        if prop.hide_prompt || prop.prompt_start.is_empty() || prop.prompt_start == "-" {
            return Ok(true);
        }
        let question = format!("{}{}", prop.prompt_start, self.start_suffix);
        self.ask(&question, Answers::Start)
    }

    /// Ask whether to add another element to the container `prop`.
    pub fn ask_more(&mut self, prop: &Property) -> Result<bool, CaptureError> {
        if prop.hide_prompt || prop.prompt_more.is_empty() {
            return Ok(true);
        }
        let question = format!("{}{}", prop.prompt_more, self.more_suffix);
        self.ask(&question, Answers::More)
    }

    /// Tell the user the container `prop` is complete.
    pub fn tell_end(&mut self, prop: &Property) -> Result<(), CaptureError> {
        if prop.hide_prompt || prop.prompt_end.is_empty() || !self.can_prompt() {
            return Ok(());
        }
        self.write(&format!("{}\n", prop.prompt_end))
    }

    fn ask(&mut self, question: &str, answers: Answers) -> Result<bool, CaptureError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        loop {
            let input = self.prompt_once(question, PromptOnce::default())?;
            let table = match answers {
                Answers::Start => &self.start_answers,
                Answers::More => &self.more_answers,
            };
            if let Some(answer) = table.get(&input.to_lowercase()) {
                return Ok(*answer);
            }
        }
    }

    /// Prompt for one value of the same type as `target`.
    ///
    /// Returns the accepted value staged outside `target`, or `None` when an
    /// optional request got an empty answer. After every try is used up the
    /// last rejection is returned.
    pub fn prompt(
        &mut self,
        request: &PromptRequest,
        target: &dyn Field,
    ) -> Result<Option<Box<dyn Field>>, CaptureError> {
        let once = request.once();
        let regex = if request.regex.is_empty() {
            None
        } else {
            Some(
                Regex::new(&request.regex).map_err(|e| CaptureError::InvalidRegex {
                    pattern: request.regex.clone(),
                    message: e.to_string(),
                })?,
            )
        };

        let mut template = request.template.clone();
        let mut status = PromptStatus::default();
        let mut last_error = CaptureError::NoPrompt;

        for attempt in 0..=request.tries {
            status.prompt_count = attempt;
            template.status = status.clone();
            let mut input = self.prompt_once(&(self.prompt_format)(&template), once)?;

            if !self.help_prompt.is_empty() && input == self.help_prompt && !request.help.is_empty() {
                self.write(&format!("{}\n", request.help))?;
                status.after_help = true;
                template.status = status.clone();
                input = self.prompt_once(&(self.prompt_format)(&template), once)?;
                status.after_help = false;
            }

            if input.is_empty() {
                if request.optional {
                    return Ok(None);
                }
                status.invalid_format += 1;
                last_error = CaptureError::NoPrompt;
                continue;
            }

            if let Some(regex) = &regex {
                if !regex.is_match(&input) {
                    debug!(name = %request.name, "prompt answer failed regex");
                    status.invalid_format += 1;
                    last_error = CaptureError::RegexFailed {
                        pattern: request.regex.clone(),
                    };
                    continue;
                }
            }

            let converted = match &request.choices {
                Some(choices) => match choices.convert(&input) {
                    Ok(converted) => converted,
                    Err(e) => {
                        debug!(name = %request.name, "prompt answer matched no choice");
                        status.invalid_choice += 1;
                        last_error = e;
                        continue;
                    }
                },
                None => input.clone(),
            };

            let mut staged = target.stage();
            if let Err(e) = parse_input(self, &request.name, staged.as_mut(), &converted, true) {
                debug!(name = %request.name, error = %e, "prompt answer did not parse");
                status.invalid_format += 1;
                last_error = e;
                continue;
            }

            if request.verify {
                status.verify = true;
                template.status = status.clone();
                let confirm = self.prompt_once(&(self.prompt_format)(&template), once);
                status.verify = false;
                if confirm? != input {
                    status.invalid_verify += 1;
                    last_error = CaptureError::VerifyFailed;
                    continue;
                }
            }

            return Ok(Some(staged));
        }

        Err(last_error)
    }

    /// Prompt for a `T` configured by `prop`, for custom prompt implementations.
    pub fn prompt_value<T: Field + Default + 'static>(
        &mut self,
        prop: &Property,
    ) -> Result<Option<T>, CaptureError> {
        let mut target = T::default();
        let request = PromptRequest::for_property(self, prop, &mut target);
        Ok(self
            .prompt(&request, &target)?
            .and_then(|value| value.into_any().downcast::<T>().ok())
            .map(|value| *value))
    }
}

#[derive(Clone, Copy)]
enum Answers {
    Start,
    More,
}
