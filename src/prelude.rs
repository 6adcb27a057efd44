//! Convenient re-exports for common argprompt usage.
//!
//! ```
//! use argprompt::prelude::*;
//!
//! #[derive(Debug, Default, Capture)]
//! struct Login {
//!     user: String,
//!     #[capture(hidden, prompt = "Password")]
//!     password: String,
//! }
//!
//! let mut opts = Options::new().with_args(["--user", "al", "--password", "pw"]);
//! let mut login = Login::default();
//! capture(&mut opts, &mut login).unwrap();
//! assert_eq!(login.password, "pw");
//! ```

// ============================================================================
// Stillwater re-exports
// ============================================================================

/// Result type with error accumulation, returned by record validators.
pub use stillwater::Validation;

/// A vector guaranteed to hold at least one element.
pub use stillwater::NonEmptyVec;

/// Combine two values of the same type, used to merge validation errors.
pub use stillwater::Semigroup;

// ============================================================================
// Capture API
// ============================================================================

pub use crate::capture::capture;
pub use crate::choices::Choices;
pub use crate::env::{ConfigEnv, MockEnv, RealEnv};
pub use crate::error::{
    CaptureError, CaptureValidation, CaptureValidationExt, ValidationError, ValidationErrors,
};
pub use crate::flags::Flags;
pub use crate::import::{Format, Import};
pub use crate::options::Options;
pub use crate::property::Property;
pub use crate::registry::{Command, Entry, Registry};
pub use crate::terminal::{MockTerminal, Terminal};
pub use crate::validate::ensure;
pub use crate::value::{Field, Ignored, Kind, Record};

#[cfg(feature = "terminal")]
pub use crate::terminal::RealTerminal;

#[cfg(feature = "derive")]
pub use argprompt_derive::Capture;
