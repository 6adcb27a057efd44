//! Derive macro for the argprompt capture library.
//!
//! `#[derive(Capture)]` on a struct with named fields generates the
//! `Record` and `Field` implementations the capture pipeline walks. On a
//! fieldless enum it generates a scalar `Field` whose variants are offered
//! as choices.
//!
//! # Basic Usage
//!
//! ```ignore
//! use argprompt::Capture;
//!
//! #[derive(Default, Capture)]
//! struct Server {
//!     #[capture(env = "APP_HOST", default = "localhost")]
//!     host: String,
//!
//!     #[capture(prompt = "Port number", min = 1, max = 65535)]
//!     port: u16,
//! }
//! ```
//!
//! Each field becomes a property named after the field in PascalCase
//! (`fave_numbers` is `FaveNumbers`), matched by `--fave-numbers` and shown
//! as `FaveNumbers` when prompting.
//!
//! # Field Settings
//!
//! ## Values
//! - `name = "..."` - Property name
//! - `prompt = "..."` - Prompt text
//! - `help = "..."` - Help text
//! - `default = "..."` - Default applied to a zero value
//! - `default_text = "..."` - Default shown instead of the real default
//! - `env = "A,B"` - Environment variables, first non-empty wins
//! - `arg = "a,b"` - Argument names; `-` disables arguments
//! - `min = n`, `max = n` - Bounds on the value, length or count
//! - `options = "in:out,..."` - Choices
//! - `regex = "..."` - Pattern prompted input must match
//! - `tries = n` - Prompt attempts before giving up
//! - `start`, `more`, `end` - Container questions
//!
//! ## Flags
//! - `hidden` - Hide the typed input
//! - `verify` - Ask twice
//! - `empty` - Accept an empty answer
//! - `reprompt` - Prompt even when a value is already set
//! - `multi` - Read multiple lines
//! - `hide_default` - Do not show the default
//!
//! ## Structure
//! - `flatten` - Splice the fields of a nested record into this one
//! - `skip` - Leave the field out entirely
//!
//! # Record Hooks
//!
//! ```ignore
//! #[derive(Default, Capture)]
//! #[capture(update = "on_update", validate = "check_range")]
//! struct Range {
//!     start: u32,
//!     end: u32,
//! }
//!
//! fn check_range(range: &Range, _opts: &argprompt::Options) -> argprompt::CaptureValidation {
//!     argprompt::ensure(range.start <= range.end, "End", "must not be before Start")
//! }
//! ```

extern crate proc_macro;

mod capture;
mod codegen;
mod keys;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive the capture traits for a struct or fieldless enum.
///
/// The type must also implement `Default`; capture starts from and stages
/// through default values.
#[proc_macro_derive(Capture, attributes(capture))]
pub fn derive_capture(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match capture::derive_capture(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
