//! Command registry example.
//!
//! Registers two commands and runs whichever the first argument names.
//! Unique prefixes and aliases work, `--help [command]` prints help, and
//! giving only the command name prompts for every value.
//!
//! Run with:
//!   cargo run --example echo -- echo --message hi --times 2
//!   cargo run --example echo -- ec                # prompts for each value
//!   cargo run --example echo -- --help echo
//!   RUST_LOG=argprompt=debug cargo run --example echo -- greet --name Al

use argprompt::prelude::*;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Print a message a number of times.
#[derive(Debug, Default, Deserialize, Capture)]
#[serde(default)]
struct Echo {
    #[capture(help = "Text to print")]
    message: String,

    #[capture(default = "1", min = 1, max = 10, help = "How many times to print it")]
    times: u8,

    #[capture(options = "none,upper,lower", default = "none")]
    case: String,
}

impl Command for Echo {
    fn execute(&mut self, _opts: &mut Options) -> Result<(), CaptureError> {
        let text = match self.case.as_str() {
            "upper" => self.message.to_uppercase(),
            "lower" => self.message.to_lowercase(),
            _ => self.message.clone(),
        };
        for _ in 0..self.times {
            println!("{}", text);
        }
        Ok(())
    }
}

/// Greet someone, optionally more than once.
#[derive(Debug, Default, Deserialize, Capture)]
#[serde(default)]
struct Greet {
    #[capture(prompt = "Who should be greeted", min = 1, env = "GREET_NAME")]
    name: String,

    #[capture(help = "Extra people to greet")]
    others: Vec<String>,
}

impl Command for Greet {
    fn execute(&mut self, _opts: &mut Options) -> Result<(), CaptureError> {
        println!("Hello, {}!", self.name);
        for other in &self.others {
            println!("Hello also, {}!", other);
        }
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut registry = Registry::new();
    registry.add(
        Entry::new::<Echo>("echo")
            .with_alias("say")
            .with_help_short("Print a message"),
    );
    registry.add(
        Entry::new::<Greet>("greet")
            .with_alias("hello")
            .with_help_short("Greet someone")
            .with_help_long("Greet someone by name, then greet everyone else listed."),
    );

    let mut opts = Options::new().program();
    if let Err(error) = registry.execute(&mut opts) {
        match error {
            CaptureError::Quit => {}
            CaptureError::Validation(errors) => {
                eprintln!("Invalid input ({}):", errors.len());
                for error in errors.iter() {
                    eprintln!("  - {}", error);
                }
                std::process::exit(1);
            }
            other => {
                eprintln!("{}", other);
                std::process::exit(1);
            }
        }
    }

    if !opts.args.is_empty() {
        eprintln!("Unused arguments: {}", opts.args.join(" "));
    }
}
