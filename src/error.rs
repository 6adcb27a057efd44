//! Error types for the argprompt capture library.
//!
//! Capture failures are reported through [`CaptureError`]. Property and
//! record validation accumulates into [`ValidationErrors`] using stillwater's
//! `Validation` type and `Semigroup` trait, so a record-level validator can
//! report every problem at once.

use std::fmt;
use std::io;

use stillwater::{NonEmptyVec, Semigroup, Validation};
use thiserror::Error;

/// Kinds of import loading errors.
#[derive(Debug, Clone)]
pub enum SourceErrorKind {
    /// Import file was not found
    NotFound { path: String },
    /// Import file could not be read
    IoError { message: String },
    /// Import content could not be deserialized
    ParseError {
        message: String,
        line: Option<u32>,
        column: Option<u32>,
    },
    /// Other import-specific error
    Other { message: String },
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceErrorKind::NotFound { path } => write!(f, "file not found: {}", path),
            SourceErrorKind::IoError { message } => write!(f, "I/O error: {}", message),
            SourceErrorKind::ParseError {
                message,
                line,
                column,
            } => {
                write!(f, "parse error: {}", message)?;
                if let Some(l) = line {
                    write!(f, " at line {}", l)?;
                    if let Some(c) = column {
                        write!(f, ", column {}", c)?;
                    }
                }
                Ok(())
            }
            SourceErrorKind::Other { message } => write!(f, "{}", message),
        }
    }
}

/// Text could not be converted into a value of the target type.
///
/// Returned by the built-in scalar parsers; the capture pipeline attaches the
/// property name and raw input when it surfaces as a [`CaptureError::Parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable name of the expected type
    pub expected: String,
    /// Why parsing failed
    pub message: String,
}

impl ParseError {
    /// Create a parse error for the expected type.
    pub fn new(expected: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}: {}", self.expected, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Name of the property that failed
    pub property: String,
    /// The offending value, if it can be shown
    pub value: Option<String>,
    /// What rule was broken, e.g. "has a min of 2"
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for a property.
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: None,
            message: message.into(),
        }
    }

    /// Attach the offending value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.message)
    }
}

/// A non-empty collection of validation errors.
///
/// Uses `NonEmptyVec` from stillwater to guarantee at least one error exists.
#[derive(Debug, Clone)]
pub struct ValidationErrors(pub NonEmptyVec<ValidationError>);

impl ValidationErrors {
    /// Create from a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Try to create from a vec, returning None if empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Get the first error (always exists).
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty (always false, but required for API consistency).
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Whether any error names the given property.
    pub fn names(&self, property: &str) -> bool {
        self.iter().any(|e| e.property == property)
    }
}

impl Semigroup for ValidationErrors {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::single(error)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len() == 1 {
            return write!(f, "{}", self.first());
        }
        writeln!(f, "Validation errors ({}):", self.len())?;
        for error in self.iter() {
            writeln!(f, "  {}", error)?;
        }
        Ok(())
    }
}

/// The validation result type returned by record-level validators.
pub type CaptureValidation = Validation<(), ValidationErrors>;

/// Extension trait for creating failing validations easily.
pub trait CaptureValidationExt {
    /// Create a failing validation with a single error.
    fn fail_with(error: ValidationError) -> CaptureValidation;

    /// Convert into a `Result`, wrapping failures as [`CaptureError::Validation`].
    fn into_capture_result(self) -> Result<(), CaptureError>;
}

impl CaptureValidationExt for CaptureValidation {
    fn fail_with(error: ValidationError) -> CaptureValidation {
        Validation::Failure(ValidationErrors::single(error))
    }

    fn into_capture_result(self) -> Result<(), CaptureError> {
        match self {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => Err(CaptureError::Validation(errors)),
        }
    }
}

/// Errors that can occur while capturing a record.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Argument, environment or default text could not be parsed
    #[error("{property}: cannot use \"{value}\", {source}")]
    Parse {
        property: String,
        value: String,
        #[source]
        source: ParseError,
    },

    /// Input matched none, or more than one, of the declared choices
    #[error("invalid conversion of \"{value}\"")]
    InvalidConversion { value: String },

    /// A min/max/choice rule or a record validator failed
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Prompt input did not match the declared regular expression
    #[error("input did not match /{pattern}/")]
    RegexFailed { pattern: String },

    /// The declared regular expression does not compile
    #[error("invalid regular expression /{pattern}/: {message}")]
    InvalidRegex { pattern: String, message: String },

    /// The verification input did not match the first input
    #[error("input could not be verified")]
    VerifyFailed,

    /// No valid value was given within the allowed tries
    #[error("no valid value was given")]
    NoPrompt,

    /// The user entered the quit token
    #[error("capture was quit")]
    Quit,

    /// The user entered the discard token
    #[error("value was discarded")]
    Discard,

    /// An import file failed to load before capture
    #[error("{source_name}: {kind}")]
    Import {
        source_name: String,
        kind: SourceErrorKind,
    },

    /// More than one import file was given for a command
    #[error("only one import file may be given, got --{}", .0.join(" and --"))]
    MultipleImports(Vec<String>),

    /// No command name was given and no default command exists
    #[error("No command given, try running with --help.")]
    NoCommand,

    /// The command name matched no registered command
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Prompting was forced but no terminal is attached
    #[error("prompting requires a terminal")]
    NoTerminal,

    /// Terminal I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A command's execute hook failed
    #[error(transparent)]
    Execute(Box<dyn std::error::Error + Send + Sync>),

    /// Error raised by user hooks
    #[error("{0}")]
    Custom(String),
}

impl CaptureError {
    /// Wrap a parse failure with the property and input that caused it.
    pub fn parse(property: &str, value: &str, source: ParseError) -> Self {
        CaptureError::Parse {
            property: property.to_string(),
            value: value.to_string(),
            source,
        }
    }

    /// Check if this is a quit or discard signal rather than a failure.
    pub fn is_control(&self) -> bool {
        matches!(self, CaptureError::Quit | CaptureError::Discard)
    }

    /// Check if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, CaptureError::Validation(_))
    }

    /// Get the validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            CaptureError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for CaptureError {
    fn from(errors: ValidationErrors) -> Self {
        CaptureError::Validation(errors)
    }
}
