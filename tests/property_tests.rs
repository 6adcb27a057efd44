//! Property-based tests for argprompt using proptest.
//!
//! These tests check the invariants of argument matching, choice tables and
//! the capture pipeline for generated inputs, not just hand-picked examples.

use proptest::prelude::*;
use std::collections::BTreeSet;

use argprompt::{
    capture, normalize, take_arg, Capture, Choices, MockEnv, Options, Semigroup, ValidationError,
    ValidationErrors,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Plain tokens that never look like an argument name.
fn arb_plain_tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{1,8}", 0..6)
}

/// Argument names that can never normalize to `name`.
fn arb_other_args() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("--x[a-z_\\-]{0,6}", 0..6)
}

/// Distinct choice keys; each resolves to its uppercased self.
fn arb_choice_keys() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z]{2,8}", 1..6)
}

fn arb_validation_errors() -> impl Strategy<Value = ValidationErrors> {
    prop::collection::vec(("[A-Z][a-z]{1,8}", "[a-z ]{1,20}"), 1..4).prop_map(|pairs| {
        let errors = pairs
            .into_iter()
            .map(|(property, message)| ValidationError::new(property, message))
            .collect();
        ValidationErrors::from_vec(errors).expect("non-empty vec")
    })
}

fn choices_for(keys: &BTreeSet<String>) -> Choices {
    keys.iter()
        .fold(Choices::new(), |choices, key| choices.with(key.clone(), key.to_uppercase()))
}

// ============================================================================
// Normalize
// ============================================================================

proptest! {
    /// Property: normalizing twice is the same as normalizing once.
    #[test]
    fn normalize_is_idempotent(text in ".{0,30}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    /// Property: normalized text holds only lowercase letters and digits.
    #[test]
    fn normalize_keeps_only_lowercase_alphanumerics(text in ".{0,30}") {
        let normalized = normalize(&text);
        prop_assert!(normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    /// Property: punctuation and case never change the key.
    #[test]
    fn normalize_ignores_separators(words in prop::collection::vec("[a-z]{1,6}", 1..4)) {
        let kebab = words.join("-");
        let snake = words.join("_").to_uppercase();
        prop_assert_eq!(normalize(&kebab), normalize(&snake));
    }
}

// ============================================================================
// Argument Matching
// ============================================================================

proptest! {
    /// Property: a missing argument leaves the arguments untouched.
    #[test]
    fn take_arg_absent_is_a_no_op(args in arb_other_args(), default in "[a-z]{0,5}") {
        let mut remaining = args.clone();
        let value = take_arg("name", &default, &mut remaining, "--", false);
        prop_assert_eq!(value, default);
        prop_assert_eq!(remaining, args);
    }

    /// Property: a present argument yields its value and removes exactly
    /// the name and value tokens.
    #[test]
    fn take_arg_removes_name_and_value(
        before in arb_plain_tokens(),
        after in arb_plain_tokens(),
        value in "[a-z0-9]{1,8}",
    ) {
        let mut args = before.clone();
        args.push("--name".to_string());
        args.push(value.clone());
        args.extend(after.iter().cloned());

        let taken = take_arg("name", "", &mut args, "--", false);
        prop_assert_eq!(taken, value);

        let mut expected = before;
        expected.extend(after);
        prop_assert_eq!(args, expected);
    }

    /// Property: a flag with nothing after it reads as true.
    #[test]
    fn take_arg_trailing_flag_is_true(before in arb_plain_tokens()) {
        let mut args = before.clone();
        args.push("--Name".to_string());
        prop_assert_eq!(take_arg("name", "", &mut args, "--", true), "true");
        prop_assert_eq!(args, before);
    }
}

// ============================================================================
// Choice Tables
// ============================================================================

proptest! {
    /// Property: every declared key resolves to its own value.
    #[test]
    fn choices_resolve_declared_keys(keys in arb_choice_keys()) {
        let choices = choices_for(&keys);
        prop_assert_eq!(choices.len(), keys.len());
        for key in &keys {
            prop_assert_eq!(choices.convert(key).unwrap(), key.to_uppercase());
            prop_assert_eq!(choices.convert(&key.to_uppercase()).unwrap(), key.to_uppercase());
        }
    }

    /// Property: a prefix resolves exactly when it is a key or picks out a
    /// single key.
    #[test]
    fn choices_prefix_rule(keys in arb_choice_keys(), pick in any::<prop::sample::Index>(), cut in 1usize..8) {
        let choices = choices_for(&keys);
        let keys_vec: Vec<&String> = keys.iter().collect();
        let key = keys_vec[pick.index(keys_vec.len())];
        let prefix = &key[..cut.min(key.len())];

        let starting: Vec<&&String> = keys_vec.iter().filter(|k| k.starts_with(prefix)).collect();
        let result = choices.convert(prefix);
        if keys.contains(prefix) {
            prop_assert_eq!(result.unwrap(), prefix.to_uppercase());
        } else if starting.len() == 1 {
            prop_assert_eq!(result.unwrap(), starting[0].to_uppercase());
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Property: an empty table passes any input through.
    #[test]
    fn empty_choices_pass_through(input in ".{0,20}") {
        prop_assert_eq!(Choices::new().convert(&input).unwrap(), input);
    }
}

// ============================================================================
// Validation Errors
// ============================================================================

proptest! {
    /// Property: combining keeps every error, in order.
    #[test]
    fn validation_errors_combine_preserves_order(
        a in arb_validation_errors(),
        b in arb_validation_errors(),
    ) {
        let expected: Vec<String> = a.iter().chain(b.iter()).map(|e| e.to_string()).collect();
        let combined = a.combine(b);
        let actual: Vec<String> = combined.iter().map(|e| e.to_string()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property: combine is associative.
    #[test]
    fn validation_errors_combine_is_associative(
        a in arb_validation_errors(),
        b in arb_validation_errors(),
        c in arb_validation_errors(),
    ) {
        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        let left: Vec<String> = left.iter().map(|e| e.to_string()).collect();
        let right: Vec<String> = right.iter().map(|e| e.to_string()).collect();
        prop_assert_eq!(left, right);
    }
}

// ============================================================================
// Capture
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq, Capture)]
struct Server {
    #[capture(env = "SERVER_HOST")]
    host: String,
    #[capture(default = "8080")]
    port: u32,
    retries: Option<u8>,
}

proptest! {
    /// Property: arguments beat the environment, and the environment beats
    /// defaults.
    #[test]
    fn capture_precedence(
        arg_host in proptest::option::of("[a-z][a-z0-9.]{0,12}"),
        env_host in proptest::option::of("[a-z][a-z0-9.]{0,12}"),
        port in proptest::option::of(1u32..65535),
    ) {
        let mut args = Vec::new();
        if let Some(host) = &arg_host {
            args.push("--host".to_string());
            args.push(host.clone());
        }
        if let Some(port) = port {
            args.push("--port".to_string());
            args.push(port.to_string());
        }
        let mut env = MockEnv::new();
        if let Some(host) = &env_host {
            env = env.with_env("SERVER_HOST", host.clone());
        }

        let mut opts = Options::new().with_args(args).with_env(env);
        let mut server = Server::default();
        capture(&mut opts, &mut server).unwrap();

        let expected_host = arg_host.or(env_host).unwrap_or_default();
        prop_assert_eq!(server.host, expected_host);
        prop_assert_eq!(server.port, port.unwrap_or(8080));
        prop_assert_eq!(server.retries, None);
        prop_assert!(opts.args.is_empty());
    }

    /// Property: capturing a captured record again without input changes
    /// nothing.
    #[test]
    fn capture_is_idempotent(
        host in "[a-z]{1,12}",
        port in 1u32..65535,
        retries in proptest::option::of(any::<u8>()),
    ) {
        let mut args = vec!["--host".to_string(), host, "--port".to_string(), port.to_string()];
        if let Some(retries) = retries {
            args.push("--retries".to_string());
            args.push(retries.to_string());
        }

        let mut opts = Options::new().with_args(args).with_env(MockEnv::new());
        let mut server = Server::default();
        capture(&mut opts, &mut server).unwrap();
        let first = server.clone();

        let mut opts = Options::new().with_env(MockEnv::new().with_env("SERVER_HOST", "other"));
        capture(&mut opts, &mut server).unwrap();
        prop_assert_eq!(server, first);
    }
}
