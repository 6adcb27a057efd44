// Allow large error types - capture errors carry the offending input
#![allow(clippy::result_large_err)]

//! Argprompt: fill a nested record from the environment, defaults,
//! command-line arguments and interactive prompts.
//!
//! Every field of a record is resolved through the same ordered pipeline:
//!
//! 1. **Load**: a zero-valued scalar is seeded from the first non-empty
//!    environment variable it declares, else from its declared default.
//! 2. **Arguments**: `--name value` tokens are matched (ignoring case and
//!    punctuation) and removed. Nested records, lists, arrays and maps get
//!    derived argument names like `--person-name`, `--tags` or `--point-1`.
//! 3. **Prompt**: when a terminal is attached, the user is asked for the
//!    value, with retries, choices, regex checks and verification.
//! 4. **Validate**: min/max bounds and choice membership are checked and
//!    every failure is reported together.
//! 5. **Update**: the record's update hook sees each field as it lands.
//!
//! # Quick Start
//!
//! ```
//! use argprompt::{capture, Capture, MockTerminal, Options};
//!
//! #[derive(Debug, Default, Capture)]
//! struct Profile {
//!     #[capture(prompt = "Your name", min = 2)]
//!     name: String,
//!     #[capture(env = "PROFILE_AGE", default = "30")]
//!     age: u32,
//!     #[capture(options = "small:s,medium:m,large:l")]
//!     size: String,
//! }
//!
//! let terminal = MockTerminal::with_answers(["Al", "", "lar"]);
//! let mut opts = Options::new().with_terminal(terminal.clone());
//! let mut profile = Profile::default();
//! capture(&mut opts, &mut profile).unwrap();
//!
//! assert_eq!(profile.name, "Al");
//! assert_eq!(profile.age, 30);
//! assert_eq!(profile.size, "l");
//! ```
//!
//! # Architecture
//!
//! There is no runtime reflection. A record exposes its fields through the
//! object-safe [`Record`] and [`Field`] traits, usually generated by
//! `#[derive(Capture)]`. Containers are visited through [`ListAccess`],
//! [`ArrayAccess`] and [`MapAccess`], and prompted values are parsed into a
//! staged copy that is only committed once accepted.
//!
//! All I/O goes through two seams so captures are fully testable:
//!
//! - [`ConfigEnv`] for environment variables and import files
//!   ([`RealEnv`], [`MockEnv`])
//! - [`Terminal`] for prompting ([`MockTerminal`], and `RealTerminal`
//!   with the `terminal` feature)
//!
//! # Module Structure
//!
//! - [`capture`](mod@capture): the pipeline and container handling
//! - [`prompt`]: the prompt engine and prompt line rendering
//! - [`property`]: per-field descriptors
//! - [`options`]: capture settings
//! - [`args`]: argument matching and argument names
//! - [`choices`]: choice tables with prefix matching
//! - [`registry`]: named commands, `--help` and imports
//! - [`error`]: [`CaptureError`] and the validation error types
//!
//! # Stillwater Integration
//!
//! | Type | Usage |
//! |------|-------|
//! | `Validation<T, E>` | Property and record validation results |
//! | `NonEmptyVec<T>` | Guaranteed non-empty validation error lists |
//! | `Semigroup` | Combining errors from several validators |

extern crate self as argprompt;

pub mod args;
pub mod capture;
pub mod choices;
pub mod env;
pub mod error;
pub mod flags;
pub mod help;
pub mod import;
pub mod options;
pub mod prelude;
pub mod prompt;
pub mod property;
pub mod registry;
pub mod terminal;
pub mod validate;
pub mod value;

pub use args::{
    array_arg, list_arg, map_key_arg, map_value_arg, normalize, record_arg, take_arg, ArgFormat,
    ArgNames, ArgTemplate,
};
pub use capture::capture;
pub use choices::{Choice, Choices};
pub use env::{ConfigEnv, MockEnv, RealEnv};
pub use error::{
    CaptureError, CaptureValidation, CaptureValidationExt, ParseError, SourceErrorKind,
    ValidationError, ValidationErrors,
};
pub use flags::Flags;
pub use help::{entry_help, format_help, property_help, root_help, wrap};
pub use import::{Format, Import};
pub use options::{default_answers, Options};
pub use prompt::{
    default_prompt_format, PromptContext, PromptFormat, PromptOnce, PromptRequest, PromptStatus,
    PromptTemplate,
};
pub use property::Property;
pub use registry::{Captured, Command, Entry, Registry};
#[cfg(feature = "terminal")]
pub use terminal::RealTerminal;
pub use terminal::{MockTerminal, Terminal};
pub use validate::{ensure, validate_property};
pub use value::{
    short_type_name, ArgParse, ArrayAccess, CustomPrompt, Field, Ignored, Kind, ListAccess,
    MapAccess, PromptParse, Record, Staging, UnmarshalText,
};

// Re-export stillwater types that are commonly used
pub use stillwater::{NonEmptyVec, Semigroup, Validation};

// Re-export derive macro when the feature is enabled
#[cfg(feature = "derive")]
pub use argprompt_derive::Capture;
