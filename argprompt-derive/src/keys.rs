//! Capture setting keys and their compile-time checks.
//!
//! The runtime `Property::set_tag` panics on the same conditions, so any
//! declaration the derive accepts is also accepted at runtime.

use regex::Regex;

/// Keys that are switched on by their presence.
pub fn is_flag_key(key: &str) -> bool {
    matches!(
        key,
        "multi" | "hidden" | "verify" | "empty" | "reprompt" | "hide_default"
    )
}

/// Keys that carry a value.
fn is_value_key(key: &str) -> bool {
    matches!(
        key,
        "prompt"
            | "tries"
            | "start"
            | "more"
            | "end"
            | "help"
            | "default"
            | "default_text"
            | "regex"
            | "env"
            | "arg"
            | "min"
            | "max"
            | "options"
    )
}

/// Check that `key = value` is a valid field setting.
pub fn check_tag(key: &str, value: &str) -> Result<(), String> {
    if !is_value_key(key) {
        return Err(unknown_key(key));
    }

    match key {
        "min" | "max" => value
            .parse::<f64>()
            .map(|_| ())
            .map_err(|_| format!("{} must be a number, got {:?}", key, value)),
        "tries" => value
            .parse::<usize>()
            .map(|_| ())
            .map_err(|_| format!("tries must be a whole number, got {:?}", value)),
        "regex" => Regex::new(value)
            .map(|_| ())
            .map_err(|e| format!("regex does not compile: {}", e)),
        _ => Ok(()),
    }
}

fn unknown_key(key: &str) -> String {
    let suggestion = match key {
        "option" | "choices" => Some("options"),
        "envs" | "env_var" => Some("env"),
        "minimum" | "min_length" => Some("min"),
        "maximum" | "max_length" => Some("max"),
        "pattern" => Some("regex"),
        "secret" | "sensitive" | "password" => Some("hidden"),
        "multiline" => Some("multi"),
        "confirm" => Some("verify"),
        "args" | "flag" => Some("arg"),
        _ => None,
    };
    match suggestion {
        Some(s) => format!("unknown capture setting '{}'; did you mean '{}'?", key, s),
        None => format!("unknown capture setting '{}'", key),
    }
}
