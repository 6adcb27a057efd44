//! Import files: whole records loaded from JSON, YAML or XML before capture.
//!
//! An import replaces the starting value of a command. The capture that
//! follows only seeds scalars that are still zero, so imported values win
//! over environment variables and defaults while arguments and prompts can
//! still override them.
//!
//! # Example
//!
//! ```
//! use argprompt::{Format, Import, MockEnv};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct Profile {
//!     name: String,
//!     age: u32,
//! }
//!
//! let env = MockEnv::new().with_file("profile.json", r#"{"name": "Al"}"#);
//! let profile: Profile = Import::file("profile.json", Format::Json).load(&env).unwrap();
//! assert_eq!(profile.name, "Al");
//! assert_eq!(profile.age, 0);
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::env::ConfigEnv;
use crate::error::{CaptureError, SourceErrorKind};

/// Serialization format of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON through `serde_json`
    Json,
    /// YAML through `serde_yaml`
    #[cfg(feature = "yaml")]
    Yaml,
    /// XML through `quick-xml`
    #[cfg(feature = "xml")]
    Xml,
}

impl Format {
    /// Formats enabled in this build, in argument lookup order.
    pub fn all() -> Vec<Format> {
        let mut formats = vec![Format::Json];
        #[cfg(feature = "yaml")]
        formats.push(Format::Yaml);
        #[cfg(feature = "xml")]
        formats.push(Format::Xml);
        formats
    }

    /// The argument that names an import file of this format.
    pub fn arg(self) -> &'static str {
        match self {
            Format::Json => "json",
            #[cfg(feature = "yaml")]
            Format::Yaml => "yaml",
            #[cfg(feature = "xml")]
            Format::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arg())
    }
}

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Text(String),
}

/// A file or string to deserialize a record from.
#[derive(Debug, Clone)]
pub struct Import {
    origin: Origin,
    format: Format,
}

impl Import {
    /// Import the file at `path`.
    pub fn file(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            origin: Origin::File(path.into()),
            format,
        }
    }

    /// Import from in-memory content.
    pub fn string(content: impl Into<String>, format: Format) -> Self {
        Self {
            origin: Origin::Text(content.into()),
            format,
        }
    }

    /// The format in use.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Name used in error messages: the path, or `<string>`.
    pub fn name(&self) -> String {
        match &self.origin {
            Origin::File(path) => path.display().to_string(),
            Origin::Text(_) => "<string>".to_string(),
        }
    }

    /// Read and deserialize the import.
    ///
    /// # Errors
    ///
    /// [`CaptureError::Import`] when the file is missing or unreadable, or
    /// when its content does not deserialize into `T`.
    pub fn load<T: DeserializeOwned>(&self, env: &dyn ConfigEnv) -> Result<T, CaptureError> {
        let source_name = self.name();
        let content = match &self.origin {
            Origin::File(path) => env.read_file(path).map_err(|e| {
                let kind = if e.kind() == std::io::ErrorKind::NotFound {
                    SourceErrorKind::NotFound {
                        path: path.display().to_string(),
                    }
                } else {
                    SourceErrorKind::IoError {
                        message: e.to_string(),
                    }
                };
                CaptureError::Import {
                    source_name: source_name.clone(),
                    kind,
                }
            })?,
            Origin::Text(content) => content.clone(),
        };

        debug!(source = %source_name, format = %self.format, "importing");
        parse(&content, self.format).map_err(|kind| CaptureError::Import { source_name, kind })
    }
}

fn parse<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, SourceErrorKind> {
    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| SourceErrorKind::ParseError {
            message: e.to_string(),
            line: Some(e.line() as u32),
            column: Some(e.column() as u32),
        }),
        #[cfg(feature = "yaml")]
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| {
            let (line, column) = e.location().map_or((None, None), |loc| {
                (Some(loc.line() as u32), Some(loc.column() as u32))
            });
            SourceErrorKind::ParseError {
                message: e.to_string(),
                line,
                column,
            }
        }),
        #[cfg(feature = "xml")]
        Format::Xml => quick_xml::de::from_str(content).map_err(|e| SourceErrorKind::ParseError {
            message: e.to_string(),
            line: None,
            column: None,
        }),
    }
}
