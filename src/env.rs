//! Process environment and file access behind a seam.
//!
//! Properties that declare environment variables are seeded through
//! [`ConfigEnv::first_env`], and imports read their files through
//! [`ConfigEnv::read_file`]. Tests swap in [`MockEnv`].

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Where a capture reads environment variables and import files from.
///
/// ```
/// use argprompt::{ConfigEnv, MockEnv};
///
/// let env = MockEnv::new()
///     .with_env("PROFILE_NAME", "")
///     .with_env("USER", "al");
/// let names = ["PROFILE_NAME".to_string(), "USER".to_string()];
/// assert_eq!(env.first_env(&names), Some("al".to_string()));
/// ```
pub trait ConfigEnv: Send + Sync {
    /// Read an import file as UTF-8.
    ///
    /// # Errors
    ///
    /// `ErrorKind::NotFound` for a missing file, otherwise whatever the
    /// read failed with.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// The variable `name`, if set.
    fn get_env(&self, name: &str) -> Option<String>;

    /// The first of `names` holding a non-empty value, in declared order.
    fn first_env(&self, names: &[String]) -> Option<String> {
        names
            .iter()
            .find_map(|name| self.get_env(name).filter(|value| !value.is_empty()))
    }
}

/// The real process environment and file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealEnv;

impl ConfigEnv for RealEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn get_env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

#[derive(Debug, Clone)]
enum MockFile {
    Content(String),
    Unreadable,
}

/// In-memory variables and import files.
///
/// Files that were never added read as not found.
///
/// ```
/// use argprompt::env::{ConfigEnv, MockEnv};
///
/// let env = MockEnv::new()
///     .with_file("profile.json", r#"{ "name": "Al" }"#)
///     .with_env("ECHO_MESSAGE", "hi");
///
/// assert_eq!(env.get_env("ECHO_MESSAGE").as_deref(), Some("hi"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    files: HashMap<PathBuf, MockFile>,
    vars: HashMap<String, String>,
}

impl MockEnv {
    /// No variables and no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), MockFile::Content(content.into()));
        self
    }

    /// Add a file that exists but fails to read with `PermissionDenied`.
    pub fn with_unreadable_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), MockFile::Unreadable);
        self
    }

    /// Set a variable.
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl ConfigEnv for MockEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        match self.files.get(path) {
            Some(MockFile::Content(content)) => Ok(content.clone()),
            Some(MockFile::Unreadable) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("mock permission denied: {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock file not found: {}", path.display()),
            )),
        }
    }

    fn get_env(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_real_env_reads_manifest() {
        assert!(RealEnv.read_file(Path::new("Cargo.toml")).is_ok());
        assert!(RealEnv.read_file(Path::new("missing-import.json")).is_err());
    }

    #[test]
    fn test_mock_files() {
        let env = MockEnv::new()
            .with_file("cmd.json", "{}")
            .with_unreadable_file("secret.json");

        assert_eq!(env.read_file(Path::new("cmd.json")).unwrap(), "{}");
        assert_eq!(
            env.read_file(Path::new("secret.json")).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
        assert_eq!(
            env.read_file(Path::new("other.yaml")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_first_env_skips_unset_and_empty() {
        let env = MockEnv::new()
            .with_env("EMPTY", "")
            .with_env("SECOND", "2")
            .with_env("THIRD", "3");

        assert_eq!(env.first_env(&names(&["UNSET", "EMPTY", "SECOND", "THIRD"])), Some("2".to_string()));
        assert_eq!(env.first_env(&names(&["THIRD", "SECOND"])), Some("3".to_string()));
        assert_eq!(env.first_env(&names(&["UNSET", "EMPTY"])), None);
        assert_eq!(env.first_env(&[]), None);
    }
}
