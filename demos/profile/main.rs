//! Interactive profile example.
//!
//! Starts from `profile.json` when it exists, then fills in the rest from
//! environment variables, arguments and prompts, and prints the result as
//! JSON.
//!
//! Run with: cargo run --example profile
//! Or with args: cargo run --example profile -- --name Al --tags a --tags b
//! Or with env:  PROFILE_EMAIL=al@example.com cargo run --example profile

use std::collections::BTreeMap;
use std::path::Path;

use argprompt::prelude::*;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize, Capture)]
enum Theme {
    #[default]
    Light,
    Dark,
    #[capture(name = "High Contrast")]
    HighContrast,
}

#[derive(Debug, Default, Serialize, Deserialize, Capture)]
#[serde(default)]
struct Address {
    street: String,
    city: String,
    #[capture(regex = "^[0-9]{4,5}$", help = "Four or five digits")]
    postcode: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Capture)]
#[serde(default)]
#[capture(validate = "check_profile")]
struct Profile {
    #[capture(prompt = "Your name", min = 2)]
    name: String,

    #[capture(env = "PROFILE_EMAIL", empty)]
    email: String,

    #[capture(min = 13, max = 130)]
    age: Option<u8>,

    #[capture(default = "Light")]
    theme: Theme,

    #[capture(prompt = "Home address")]
    address: Option<Address>,

    #[capture(max = 5, more = "Another tag?")]
    tags: Vec<String>,

    #[capture(prompt = "-")]
    links: BTreeMap<String, String>,

    #[capture(hidden, verify, prompt = "Passphrase", empty)]
    #[serde(skip)]
    passphrase: String,
}

fn check_profile(profile: &Profile, _opts: &Options) -> CaptureValidation {
    ensure(
        profile.email.is_empty() || profile.email.contains('@'),
        "Email",
        "must contain @",
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut profile = if Path::new("profile.json").exists() {
        Import::file("profile.json", Format::Json)
            .load::<Profile>(&RealEnv)
            .unwrap_or_else(|error| {
                eprintln!("{}", error);
                std::process::exit(1);
            })
    } else {
        Profile::default()
    };

    let mut opts = Options::new().program().with_tries(3);
    match capture(&mut opts, &mut profile) {
        Ok(()) => {}
        Err(CaptureError::Quit) => return,
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    }

    match serde_json::to_string_pretty(&profile) {
        Ok(json) => println!("{}", json),
        Err(error) => eprintln!("Cannot print profile: {}", error),
    }
}
