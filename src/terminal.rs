//! Line input and output for prompting.
//!
//! The capture pipeline never touches a terminal device directly. It reads
//! and writes through a [`Terminal`], so tests script answers with
//! [`MockTerminal`] and programs use [`RealTerminal`].

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// A source of prompt input and a sink for prompt output.
pub trait Terminal: Send {
    /// Read one line without its trailing newline. `hidden` asks for
    /// non-echoing input.
    ///
    /// Returns `ErrorKind::UnexpectedEof` once input is exhausted.
    fn read_line(&mut self, hidden: bool) -> io::Result<String>;

    /// Write text as-is; prompts do not end with a newline.
    fn write(&mut self, text: &str) -> io::Result<()>;
}

/// Standard input and output, with hidden input read through `console`.
#[cfg(feature = "terminal")]
#[derive(Debug, Clone)]
pub struct RealTerminal {
    term: console::Term,
}

#[cfg(feature = "terminal")]
impl RealTerminal {
    /// A terminal on stdin/stdout.
    pub fn new() -> Self {
        Self {
            term: console::Term::stdout(),
        }
    }
}

#[cfg(feature = "terminal")]
impl Default for RealTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "terminal")]
impl Terminal for RealTerminal {
    fn read_line(&mut self, hidden: bool) -> io::Result<String> {
        if hidden {
            return self.term.read_secure_line();
        }

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.term.write_str(text)?;
        self.term.flush()
    }
}

#[derive(Debug, Default)]
struct MockState {
    answers: VecDeque<String>,
    output: String,
    hidden_reads: usize,
}

/// Scripted terminal for tests.
///
/// Clones share the same script and output, so a test can hand one clone to
/// [`Options`](crate::Options) and inspect the other afterwards.
///
/// # Example
///
/// ```
/// use argprompt::{MockTerminal, Terminal};
///
/// let terminal = MockTerminal::with_answers(["Al"]);
/// let mut handle = terminal.clone();
/// handle.write("Name: ").unwrap();
/// assert_eq!(handle.read_line(false).unwrap(), "Al");
/// assert_eq!(terminal.output(), "Name: ");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTerminal {
    state: Arc<Mutex<MockState>>,
}

impl MockTerminal {
    /// A terminal with no scripted answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// A terminal that answers with `answers` in order.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terminal = Self::new();
        for answer in answers {
            terminal.push_answer(answer);
        }
        terminal
    }

    /// Queue another answer.
    pub fn push_answer(&self, answer: impl Into<String>) {
        self.lock().answers.push_back(answer.into());
    }

    /// Everything written so far.
    pub fn output(&self) -> String {
        self.lock().output.clone()
    }

    /// Answers not yet read.
    pub fn remaining(&self) -> usize {
        self.lock().answers.len()
    }

    /// How many reads asked for hidden input.
    pub fn hidden_reads(&self) -> usize {
        self.lock().hidden_reads
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Terminal for MockTerminal {
    fn read_line(&mut self, hidden: bool) -> io::Result<String> {
        let mut state = self.lock();
        if hidden {
            state.hidden_reads += 1;
        }
        state
            .answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answers left"))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.lock().output.push_str(text);
        Ok(())
    }
}
