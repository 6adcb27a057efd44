//! Capture options and the builder methods that set them up.
//!
//! `Options` carries everything a capture consults besides the record
//! itself: the remaining argument tokens, the prompt protocol settings, the
//! terminal and the environment.

use std::collections::HashMap;
use std::fmt;

use crate::args::{take_arg, ArgNames};
use crate::env::{ConfigEnv, RealEnv};
use crate::error::CaptureError;
use crate::prompt::{default_prompt_format, PromptContext, PromptFormat};
use crate::terminal::Terminal;

/// The answers accepted by yes/no container questions.
pub fn default_answers() -> HashMap<String, bool> {
    [
        ("y", true),
        ("yes", true),
        ("1", true),
        ("t", true),
        ("true", true),
        ("ok", true),
        ("", true),
        ("n", false),
        ("no", false),
        ("0", false),
        ("f", false),
        ("false", false),
    ]
    .into_iter()
    .map(|(answer, value)| (answer.to_string(), value))
    .collect()
}

/// Settings and I/O for a capture.
///
/// A new `Options` has no arguments and no terminal, so it never prompts.
///
/// # Example
///
/// ```
/// use argprompt::{MockTerminal, Options};
///
/// let opts = Options::new()
///     .with_args(["--name", "Al"])
///     .with_terminal(MockTerminal::with_answers(["9"]));
/// assert!(opts.can_prompt());
/// ```
pub struct Options {
    /// Argument tokens not yet consumed
    pub args: Vec<String>,
    /// Prefix of argument names for the record being captured
    pub arg_prefix: String,
    /// Number the first array, list or map element is named with
    pub arg_start_index: usize,
    /// Argument-name formatters for nested values
    pub arg_names: ArgNames,

    /// Input that shows help for the current prompt
    pub help_prompt: String,
    /// Input that aborts the whole capture
    pub quit_prompt: String,
    /// Input that discards the current container element
    pub discard_prompt: String,
    /// Never prompt
    pub disable_prompt: bool,
    /// Prompt even without a terminal
    pub force_prompt: bool,
    /// Answers to the container start question
    pub start_answers: HashMap<String, bool>,
    /// Appended to the container start question
    pub start_suffix: String,
    /// Answers to the container more question
    pub more_answers: HashMap<String, bool>,
    /// Appended to the container more question
    pub more_suffix: String,
    /// Renders the prompt line for a value
    pub prompt_format: PromptFormat,
    /// Where the current prompt sits inside containers
    pub prompt_context: PromptContext,
    /// Re-prompt list elements that already exist
    pub reprompt_slice_elements: bool,
    /// Re-prompt map values that already exist
    pub reprompt_map_values: bool,
    /// Tries for a valid value when a property sets none
    pub reprompt_on_invalid: usize,
    /// Line that ends multi-line input
    pub multi_stop: String,

    /// Indent of nested help lines
    pub help_indent: usize,
    /// Width help lines wrap at
    pub help_wrap: usize,

    /// Values shared between update hooks and commands
    pub values: HashMap<String, String>,

    terminal: Option<Box<dyn Terminal>>,
    env: Box<dyn ConfigEnv>,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    /// Options with no arguments, no terminal and the real environment.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            arg_prefix: "--".to_string(),
            arg_start_index: 1,
            arg_names: ArgNames::default(),
            help_prompt: "help!".to_string(),
            quit_prompt: "quit!".to_string(),
            discard_prompt: "discard!".to_string(),
            disable_prompt: false,
            force_prompt: false,
            start_answers: default_answers(),
            start_suffix: " (y/n): ".to_string(),
            more_answers: default_answers(),
            more_suffix: " (y/n): ".to_string(),
            prompt_format: default_prompt_format,
            prompt_context: PromptContext::default(),
            reprompt_slice_elements: false,
            reprompt_map_values: false,
            reprompt_on_invalid: 5,
            multi_stop: String::new(),
            help_indent: 2,
            help_wrap: 80,
            values: HashMap::new(),
            terminal: None,
            env: Box::new(RealEnv),
        }
    }

    /// Replace the argument tokens.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Prompt through `terminal`.
    pub fn with_terminal(mut self, terminal: impl Terminal + 'static) -> Self {
        self.terminal = Some(Box::new(terminal));
        self
    }

    /// Read environment variables and import files through `env`.
    pub fn with_env(mut self, env: impl ConfigEnv + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Set the argument prefix.
    pub fn with_arg_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.arg_prefix = prefix.into();
        self
    }

    /// Disable or enable prompting.
    pub fn with_prompt_disabled(mut self, disabled: bool) -> Self {
        self.disable_prompt = disabled;
        self
    }

    /// Prompt even when no terminal is attached.
    pub fn with_force_prompt(mut self, force: bool) -> Self {
        self.force_prompt = force;
        self
    }

    /// Re-prompt existing list elements and map values.
    pub fn with_reprompt(mut self, reprompt: bool) -> Self {
        self.reprompt_slice_elements = reprompt;
        self.reprompt_map_values = reprompt;
        self
    }

    /// Set the tries for a valid value.
    pub fn with_tries(mut self, tries: usize) -> Self {
        self.reprompt_on_invalid = tries;
        self
    }

    /// Set the prompt line renderer.
    pub fn with_prompt_format(mut self, format: PromptFormat) -> Self {
        self.prompt_format = format;
        self
    }

    /// Prompt on stdin/stdout.
    #[cfg(feature = "terminal")]
    pub fn std(self) -> Self {
        self.with_terminal(crate::terminal::RealTerminal::new())
    }

    /// Use the program's arguments, minus the program name.
    pub fn cli(self) -> Self {
        self.with_args(std::env::args().skip(1))
    }

    /// Prompt on stdin/stdout and use the program's arguments.
    #[cfg(feature = "terminal")]
    pub fn program(self) -> Self {
        self.std().cli()
    }

    /// Drop the terminal, which disables prompting unless it is forced.
    pub fn clear_terminal(&mut self) {
        self.terminal = None;
    }

    /// Whether prompts will be shown.
    pub fn can_prompt(&self) -> bool {
        self.force_prompt || (self.terminal.is_some() && !self.disable_prompt)
    }

    /// The environment in use.
    pub fn env(&self) -> &dyn ConfigEnv {
        self.env.as_ref()
    }

    /// Write text to the terminal; does nothing without one.
    pub fn write(&mut self, text: &str) -> Result<(), CaptureError> {
        if let Some(terminal) = self.terminal.as_mut() {
            terminal.write(text)?;
        }
        Ok(())
    }

    pub(crate) fn terminal_mut(&mut self) -> Result<&mut dyn Terminal, CaptureError> {
        match self.terminal.as_mut() {
            Some(terminal) => Ok(terminal.as_mut()),
            None => Err(CaptureError::NoTerminal),
        }
    }

    /// Take `name` (relative to the current argument prefix) from the
    /// remaining arguments. Meant for custom argument parsers.
    pub fn take_named_arg(&mut self, name: &str, default: &str, flag: bool) -> String {
        take_arg(name, default, &mut self.args, &self.arg_prefix, flag)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("args", &self.args)
            .field("arg_prefix", &self.arg_prefix)
            .field("disable_prompt", &self.disable_prompt)
            .field("force_prompt", &self.force_prompt)
            .field("has_terminal", &self.terminal.is_some())
            .field("prompt_context", &self.prompt_context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;
    use crate::terminal::MockTerminal;

    #[test]
    fn test_new_cannot_prompt() {
        let opts = Options::new();
        assert!(!opts.can_prompt());
        assert_eq!(opts.arg_prefix, "--");
        assert_eq!(opts.reprompt_on_invalid, 5);
    }

    #[test]
    fn test_can_prompt_rules() {
        let opts = Options::new().with_terminal(MockTerminal::new());
        assert!(opts.can_prompt());

        let opts = opts.with_prompt_disabled(true);
        assert!(!opts.can_prompt());

        let opts = Options::new().with_force_prompt(true);
        assert!(opts.can_prompt());
    }

    #[test]
    fn test_default_answers() {
        let answers = default_answers();
        assert_eq!(answers.get(""), Some(&true));
        assert_eq!(answers.get("ok"), Some(&true));
        assert_eq!(answers.get("no"), Some(&false));
        assert_eq!(answers.get("maybe"), None);
    }

    #[test]
    fn test_take_named_arg_uses_prefix() {
        let mut opts = Options::new().with_args(["--point-x", "3", "--x", "1"]);
        opts.arg_prefix = "--point-".to_string();
        assert_eq!(opts.take_named_arg("x", "", false), "3");
        assert_eq!(opts.args, vec!["--x", "1"]);
    }

    #[test]
    fn test_write_without_terminal_is_noop() {
        let mut opts = Options::new();
        assert!(opts.write("ignored").is_ok());
    }

    #[test]
    fn test_env_is_swappable() {
        let opts = Options::new().with_env(MockEnv::new().with_env("APP_NAME", "demo"));
        assert_eq!(opts.env().get_env("APP_NAME").as_deref(), Some("demo"));
    }
}
