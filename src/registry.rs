//! Command registry: named records captured from the first argument.
//!
//! A host program registers its commands, then hands the process arguments
//! to [`Registry::execute`]. The first token picks the command (unique
//! prefixes and aliases work), `--help [command]` prints help instead, and
//! `--json`/`--yaml`/`--xml <path>` import a starting value before capture.
//! At most one import may be given.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::args::{normalize, take_arg};
use crate::capture::capture;
use crate::env::ConfigEnv;
use crate::error::CaptureError;
use crate::help::{entry_help, root_help};
use crate::import::{Format, Import};
use crate::options::Options;
use crate::value::Record;

/// A record that can be captured by name and then executed.
///
/// `Deserialize` is needed for imports; mark the struct `#[serde(default)]`
/// so import files may leave fields out.
pub trait Command: Record + Default + DeserializeOwned + Send + 'static {
    /// Run the command after a successful capture.
    fn execute(&mut self, _opts: &mut Options) -> Result<(), CaptureError> {
        Ok(())
    }
}

pub(crate) trait Runnable: Send {
    fn record_mut(&mut self) -> &mut dyn Record;
    fn import(&mut self, import: &Import, env: &dyn ConfigEnv) -> Result<(), CaptureError>;
    fn execute(&mut self, opts: &mut Options) -> Result<(), CaptureError>;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Command> Runnable for T {
    fn record_mut(&mut self) -> &mut dyn Record {
        self
    }

    fn import(&mut self, import: &Import, env: &dyn ConfigEnv) -> Result<(), CaptureError> {
        *self = import.load(env)?;
        Ok(())
    }

    fn execute(&mut self, opts: &mut Options) -> Result<(), CaptureError> {
        Command::execute(self, opts)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

fn instantiate<T: Command>() -> Box<dyn Runnable> {
    Box::new(T::default())
}

/// A registered command.
#[derive(Clone)]
pub struct Entry {
    /// User-facing name
    pub name: String,
    /// Other names; an empty alias makes this the command run without a name
    pub aliases: Vec<String>,
    /// One-line description
    pub help_short: String,
    /// Full description
    pub help_long: String,
    make: fn() -> Box<dyn Runnable>,
}

impl Entry {
    /// An entry named `name` that captures a fresh `T`.
    pub fn new<T: Command>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            help_short: String::new(),
            help_long: String::new(),
            make: instantiate::<T>,
        }
    }

    /// Add an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the one-line description.
    pub fn with_help_short(mut self, help: impl Into<String>) -> Self {
        self.help_short = help.into();
        self
    }

    /// Set the full description.
    pub fn with_help_long(mut self, help: impl Into<String>) -> Self {
        self.help_long = help.into();
        self
    }

    fn instantiate(&self) -> Box<dyn Runnable> {
        (self.make)()
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("help_short", &self.help_short)
            .finish_non_exhaustive()
    }
}

/// A captured command, ready to execute or inspect.
pub struct Captured {
    name: String,
    command: Box<dyn Runnable>,
}

impl Captured {
    /// Name of the entry that was captured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the command's execute hook.
    pub fn execute(&mut self, opts: &mut Options) -> Result<(), CaptureError> {
        self.command.execute(opts)
    }

    /// Borrow the command as `T`, if that is its type.
    pub fn downcast_ref<T: Command>(&self) -> Option<&T> {
        self.command.as_any().downcast_ref::<T>()
    }

    /// Take the command as `T`, if that is its type.
    pub fn downcast<T: Command>(self) -> Option<T> {
        self.command.into_any().downcast::<T>().ok().map(|command| *command)
    }
}

impl fmt::Debug for Captured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Captured").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Commands by name.
///
/// # Example
///
/// ```
/// use argprompt::{Capture, Command, Entry, Options, Registry};
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Deserialize, Capture)]
/// #[serde(default)]
/// struct Echo {
///     message: String,
/// }
///
/// impl Command for Echo {}
///
/// let mut registry = Registry::new();
/// registry.add(Entry::new::<Echo>("echo").with_help_short("Print a message"));
///
/// let mut opts = Options::new().with_args(["ec", "--message", "hi"]);
/// let captured = registry.capture(&mut opts).unwrap().unwrap();
/// assert_eq!(captured.downcast_ref::<Echo>().unwrap().message, "hi");
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    by_name: BTreeMap<String, usize>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` under its name and aliases. Later registrations of
    /// the same name replace earlier ones in lookups.
    pub fn add(&mut self, entry: Entry) {
        let index = self.entries.len();
        self.by_name.insert(normalize(&entry.name), index);
        for alias in &entry.aliases {
            self.by_name.insert(normalize(alias), index);
        }
        self.entries.push(entry);
    }

    /// Every registered entry, in registration order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries matching `partial`: an exact name or alias alone, otherwise
    /// every entry with a name or alias starting with it.
    pub fn matches(&self, partial: &str) -> Vec<&Entry> {
        let name = normalize(partial);
        if let Some(&index) = self.by_name.get(&name) {
            return vec![&self.entries[index]];
        }
        if name.is_empty() {
            return Vec::new();
        }

        let mut indices: Vec<usize> = self
            .by_name
            .iter()
            .filter(|(key, _)| key.starts_with(&name))
            .map(|(_, &index)| index)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|index| &self.entries[index]).collect()
    }

    /// The entry `partial` names, when exactly one matches.
    pub fn entry_for(&self, partial: &str) -> Option<&Entry> {
        match self.matches(partial).as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Whether `partial` names exactly one entry.
    pub fn has(&self, partial: &str) -> bool {
        self.entry_for(partial).is_some()
    }

    /// The entry the next argument names, without consuming anything.
    pub fn peek(&self, opts: &Options) -> Option<&Entry> {
        self.entry_for(opts.args.first().map(String::as_str).unwrap_or(""))
    }

    /// Capture the command named by the first argument.
    ///
    /// Returns `Ok(None)` when `--help` was given and help was written
    /// instead. Prompting is on by default only when nothing but the command
    /// name was given; `--interactive false|true` overrides that.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoCommand`] without arguments and without a nameless
    /// command, [`CaptureError::CommandNotFound`] for an unknown or ambiguous
    /// name, [`CaptureError::MultipleImports`] when more than one import file
    /// is given, and any import or capture failure.
    pub fn capture(&self, opts: &mut Options) -> Result<Option<Captured>, CaptureError> {
        let before = opts.args.len();
        let help = take_arg("help", "", &mut opts.args, &opts.arg_prefix, false);
        if opts.args.len() != before {
            self.display_help(opts, &help)?;
            return Ok(None);
        }

        let name = opts.args.first().cloned().unwrap_or_default();
        if name.is_empty() && !self.has("") {
            return Err(CaptureError::NoCommand);
        }
        let entry = self
            .entry_for(&name)
            .ok_or_else(|| CaptureError::CommandNotFound(name.clone()))?;
        if !name.is_empty() {
            opts.args.remove(0);
        }

        let only_name = opts.args.is_empty();
        let interactive = take_arg("interactive", "", &mut opts.args, &opts.arg_prefix, true);
        let interactive = match interactive.as_str() {
            "" => only_name,
            value => matches!(value, "1" | "t" | "T" | "true" | "TRUE" | "True"),
        };

        let mut imports = Vec::new();
        for format in Format::all() {
            let path = take_arg(format.arg(), "", &mut opts.args, &opts.arg_prefix, false);
            if !path.is_empty() {
                imports.push(Import::file(path, format));
            }
        }
        if imports.len() > 1 {
            let given = imports.iter().map(|import| import.format().arg().to_string()).collect();
            return Err(CaptureError::MultipleImports(given));
        }

        let mut command = entry.instantiate();
        if let Some(import) = imports.first() {
            command.import(import, opts.env())?;
        }

        let disabled = opts.disable_prompt;
        if !interactive {
            opts.disable_prompt = true;
        }
        info!(command = %entry.name, interactive, "capturing command");
        let result = capture(opts, command.record_mut());
        opts.disable_prompt = disabled;
        result?;

        Ok(Some(Captured {
            name: entry.name.clone(),
            command,
        }))
    }

    /// Capture the named command, then execute it.
    pub fn execute(&self, opts: &mut Options) -> Result<(), CaptureError> {
        match self.capture(opts)? {
            Some(mut command) => {
                debug!(command = %command.name(), "executing");
                command.execute(opts)
            }
            None => Ok(()),
        }
    }

    fn display_help(&self, opts: &mut Options, name: &str) -> Result<(), CaptureError> {
        if name.is_empty() {
            return opts.write(&root_help(&self.entries));
        }
        match self.entry_for(name) {
            Some(entry) => {
                let mut command = entry.instantiate();
                let help = entry_help(opts, entry, command.record_mut());
                opts.write(&help)
            }
            None => {
                opts.write(&format!("{} is not a valid command. Valid commands:\n", name))?;
                opts.write(&root_help(&self.entries))
            }
        }
    }
}
