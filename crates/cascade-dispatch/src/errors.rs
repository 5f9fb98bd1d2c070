//! Parse-error vocabulary and the per-command error accumulator.
//!
//! Parse and execution failures are reported as owned strings pushed onto
//! the owning command's [`ErrorLog`] in discovery order. Draining the log
//! (for printing) and clearing it are the same operation, so a successful
//! top-level dispatch always leaves every visited log empty.

use std::collections::VecDeque;

use thiserror::Error;

/// Fatal conditions discovered while parsing one command's argv.
///
/// The `Display` output of each variant is the exact message pushed onto
/// the command's [`ErrorLog`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// An option was left over and no subcommand exists that could claim it.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// An option was left over but no candidate subcommand name followed it.
    #[error("unexpected option: {0}")]
    UnexpectedOption(String),

    /// An option with required arity was given no argument.
    #[error("missing expected argument for option: {0}")]
    MissingOptionArgument(String),

    /// A positional argument was supplied to a command that takes none.
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    /// More positional arguments than the command's contract allows.
    #[error("too many arguments (expected up to {expected}, got {got})")]
    TooManyArguments { expected: usize, got: usize },

    /// Fewer positional arguments than an exact contract requires.
    #[error("expected {expected} argument(s), got {got}")]
    MissingArguments { expected: usize, got: usize },

    /// The scanner produced a result the registry cannot account for.
    /// Indicates an internal inconsistency between the built option table
    /// and the flag registry it was built from.
    #[error("unexpected: {0}")]
    Unexpected(String),
}

/// Ordered log of error messages for a single command.
///
/// Messages are pushed in the order problems are discovered and consumed
/// in that same order when reported.
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: VecDeque<String>,
}

impl ErrorLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the log.
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push_back(message.into());
    }

    /// Returns `true` if no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes and returns all messages in discovery order, leaving the
    /// log empty.
    pub fn drain(&mut self) -> Vec<String> {
        self.entries.drain(..).collect()
    }
}
