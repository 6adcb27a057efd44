//! Integration tests for the command registry, help output and imports.

use argprompt::{
    Capture, CaptureError, Command, Entry, MockEnv, MockTerminal, Options, Registry,
    SourceErrorKind,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, Capture)]
#[serde(default)]
struct Echo {
    #[capture(help = "Text to print")]
    message: String,
    #[capture(default = "1")]
    times: u8,
}

impl Command for Echo {
    fn execute(&mut self, opts: &mut Options) -> Result<(), CaptureError> {
        let text = vec![self.message.as_str(); self.times as usize].join(" ");
        opts.values.insert("echo".to_string(), text);
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Capture)]
#[serde(default)]
struct Profile {
    #[capture(min = 2)]
    name: String,
}

impl Command for Profile {}

#[derive(Debug, Default, Deserialize, Capture)]
struct Print {}

impl Command for Print {
    fn execute(&mut self, _opts: &mut Options) -> Result<(), CaptureError> {
        Err(CaptureError::Custom("printer on fire".to_string()))
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.add(
        Entry::new::<Echo>("echo")
            .with_alias("e")
            .with_help_short("Print a message"),
    );
    registry.add(Entry::new::<Profile>("profile").with_help_short("Edit a profile"));
    registry.add(Entry::new::<Print>("print").with_help_short("Print a page"));
    registry
}

fn quiet(args: &[&str]) -> Options {
    Options::new()
        .with_args(args.iter().copied())
        .with_env(MockEnv::new())
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn test_matches_exact_alias_and_prefix() {
    let registry = registry();
    assert_eq!(registry.entries().len(), 3);
    assert_eq!(registry.entry_for("e").map(|e| e.name.as_str()), Some("echo"));
    assert_eq!(registry.entry_for("ECHO").map(|e| e.name.as_str()), Some("echo"));
    assert_eq!(registry.entry_for("prof").map(|e| e.name.as_str()), Some("profile"));
    assert_eq!(registry.matches("pr").len(), 2);
    assert!(!registry.has("pr"));
    assert!(!registry.has("zzz"));
}

#[test]
fn test_peek_does_not_consume() {
    let registry = registry();
    let opts = quiet(&["prof", "--name", "Al"]);
    assert_eq!(registry.peek(&opts).map(|e| e.name.as_str()), Some("profile"));
    assert_eq!(opts.args.len(), 3);
}

// ============================================================================
// Capture
// ============================================================================

#[test]
fn test_capture_by_prefix() {
    let mut opts = quiet(&["prof", "--name", "Al"]);
    let captured = registry().capture(&mut opts).unwrap().unwrap();
    assert_eq!(captured.name(), "profile");
    assert_eq!(captured.downcast_ref::<Profile>().map(|p| p.name.as_str()), Some("Al"));
    assert!(captured.downcast_ref::<Echo>().is_none());
    assert!(opts.args.is_empty());
}

#[test]
fn test_unknown_and_ambiguous_commands() {
    let err = registry().capture(&mut quiet(&["nope"])).unwrap_err();
    assert!(matches!(err, CaptureError::CommandNotFound(ref name) if name == "nope"));

    let err = registry().capture(&mut quiet(&["pr"])).unwrap_err();
    assert_eq!(err.to_string(), "Command not found: pr");
}

#[test]
fn test_no_command() {
    let err = registry().capture(&mut quiet(&[])).unwrap_err();
    assert!(matches!(err, CaptureError::NoCommand));
    assert_eq!(err.to_string(), "No command given, try running with --help.");
}

#[test]
fn test_nameless_default_command() {
    let mut registry = registry();
    registry.add(Entry::new::<Echo>("say").with_alias(""));
    let mut opts = quiet(&[]);
    let captured = registry.capture(&mut opts).unwrap().unwrap();
    assert_eq!(captured.name(), "say");
    let echo = captured.downcast::<Echo>().unwrap();
    assert_eq!(echo.times, 1);
}

#[test]
fn test_capture_errors_surface() {
    let err = registry().capture(&mut quiet(&["profile", "--name", "A"])).unwrap_err();
    assert!(err.validation_errors().unwrap().names("Name"));
}

#[test]
fn test_execute_runs_the_command() {
    let mut opts = quiet(&["echo", "--message", "hi", "--times", "3"]);
    registry().execute(&mut opts).unwrap();
    assert_eq!(opts.values.get("echo").map(String::as_str), Some("hi hi hi"));
}

#[test]
fn test_execute_errors_surface() {
    let err = registry().execute(&mut quiet(&["print"])).unwrap_err();
    assert_eq!(err.to_string(), "printer on fire");
}

// ============================================================================
// Interactive
// ============================================================================

#[test]
fn test_prompts_when_only_the_name_is_given() {
    let terminal = MockTerminal::with_answers(["hi", ""]);
    let mut opts = quiet(&["echo"]).with_terminal(terminal.clone());
    let captured = registry().capture(&mut opts).unwrap().unwrap();
    let echo = captured.downcast::<Echo>().unwrap();
    assert_eq!(echo.message, "hi");
    assert_eq!(echo.times, 1);
    assert_eq!(terminal.output(), "Message: Times (1): ");
}

#[test]
fn test_arguments_turn_prompting_off() {
    let terminal = MockTerminal::with_answers(["unused"]);
    let mut opts = quiet(&["echo", "--message", "hi"]).with_terminal(terminal.clone());
    registry().capture(&mut opts).unwrap();
    assert_eq!(terminal.output(), "");
    // The setting is restored for whatever runs next.
    assert!(opts.can_prompt());
}

#[test]
fn test_interactive_flag_forces_prompting() {
    let terminal = MockTerminal::with_answers(["", "2"]);
    let mut opts = quiet(&["echo", "--message", "hi", "--interactive"]).with_terminal(terminal.clone());
    let echo = registry()
        .capture(&mut opts)
        .unwrap()
        .and_then(|captured| captured.downcast::<Echo>())
        .unwrap();
    assert_eq!(echo.message, "hi");
    assert_eq!(echo.times, 2);
    assert_eq!(terminal.output(), "Message (hi): Times (1): ");
}

#[test]
fn test_interactive_false_without_other_args() {
    let terminal = MockTerminal::with_answers(["unused"]);
    let mut opts = quiet(&["echo", "--interactive", "false"]).with_terminal(terminal.clone());
    registry().capture(&mut opts).unwrap();
    assert_eq!(terminal.output(), "");
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_root_help() {
    let terminal = MockTerminal::new();
    let mut opts = quiet(&["--help"]).with_terminal(terminal.clone());
    assert!(registry().capture(&mut opts).unwrap().is_none());
    assert_eq!(
        terminal.output(),
        "echo     Print a message\nprofile  Edit a profile\nprint    Print a page\n"
    );
}

#[test]
fn test_command_help() {
    let terminal = MockTerminal::new();
    let mut opts = quiet(&["--help", "echo"]).with_terminal(terminal.clone());
    assert!(registry().capture(&mut opts).unwrap().is_none());
    assert_eq!(
        terminal.output(),
        "echo (aka e):\n  Print a message\n\
         Message\n  - Text to print\n  - A value of type string.\n  - Can be specified with the argument --message\n\
         Times\n  - A value of type u8.\n  - Has a default value of \"1\".\n  - Can be specified with the argument --times\n"
    );
}

#[test]
fn test_help_for_unknown_command() {
    let terminal = MockTerminal::new();
    let mut opts = quiet(&["--help", "zzz"]).with_terminal(terminal.clone());
    registry().execute(&mut opts).unwrap();
    assert!(terminal
        .output()
        .starts_with("zzz is not a valid command. Valid commands:\necho     Print a message\n"));
}

// ============================================================================
// Imports
// ============================================================================

#[test]
fn test_json_import_then_args() {
    let env = MockEnv::new().with_file("echo.json", r#"{"message": "from file", "times": 3}"#);
    let mut opts = Options::new()
        .with_args(["echo", "--json", "echo.json"])
        .with_env(env.clone());
    let echo = registry()
        .capture(&mut opts)
        .unwrap()
        .and_then(|captured| captured.downcast::<Echo>())
        .unwrap();
    assert_eq!(echo.message, "from file");
    assert_eq!(echo.times, 3);

    let mut opts = Options::new()
        .with_args(["echo", "--json", "echo.json", "--message", "override"])
        .with_env(env);
    let echo = registry()
        .capture(&mut opts)
        .unwrap()
        .and_then(|captured| captured.downcast::<Echo>())
        .unwrap();
    assert_eq!(echo.message, "override");
    assert_eq!(echo.times, 3);
}

#[test]
fn test_import_missing_file() {
    let err = registry()
        .capture(&mut quiet(&["echo", "--json", "missing.json"]))
        .unwrap_err();
    assert!(matches!(
        err,
        CaptureError::Import {
            kind: SourceErrorKind::NotFound { .. },
            ..
        }
    ));
}

#[test]
fn test_import_real_file() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("profile.json");
    std::fs::write(&path, r#"{"name": "Imported"}"#).expect("Failed to write import");

    let mut opts = Options::new().with_args(vec![
        "profile".to_string(),
        "--json".to_string(),
        path.display().to_string(),
    ]);
    let profile = registry()
        .capture(&mut opts)
        .unwrap()
        .and_then(|captured| captured.downcast::<Profile>())
        .unwrap();
    assert_eq!(profile.name, "Imported");
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_import() {
    let env = MockEnv::new().with_file("echo.yaml", "message: from yaml\n");
    let mut opts = Options::new()
        .with_args(["echo", "--yaml", "echo.yaml"])
        .with_env(env);
    let echo = registry()
        .capture(&mut opts)
        .unwrap()
        .and_then(|captured| captured.downcast::<Echo>())
        .unwrap();
    assert_eq!(echo.message, "from yaml");
    assert_eq!(echo.times, 1);
}

#[cfg(feature = "yaml")]
#[test]
fn test_second_import_is_rejected() {
    let env = MockEnv::new()
        .with_file("echo.json", r#"{"message": "from json"}"#)
        .with_file("echo.yaml", "message: from yaml\n");
    let mut opts = Options::new()
        .with_args(["echo", "--json", "echo.json", "--yaml", "echo.yaml"])
        .with_env(env);
    let err = registry().capture(&mut opts).unwrap_err();
    assert!(matches!(&err, CaptureError::MultipleImports(given) if given == &["json", "yaml"]));
    assert_eq!(err.to_string(), "only one import file may be given, got --json and --yaml");
}
