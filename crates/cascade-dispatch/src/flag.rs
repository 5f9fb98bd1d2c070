//! Flag descriptors and the per-command flag registry.
//!
//! A flag is identified by a short letter, a long name, or both. Flags are
//! immutable after registration except for the transient argument value
//! captured during a single parse pass.

use std::rc::Rc;

use crate::command::{CommandId, CommandTree};

/// Argument arity for a flag, following POSIX `getopt` conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagArity {
    /// The flag takes no argument.
    #[default]
    None,
    /// The flag requires an argument (`-f FILE`, `--file FILE`, `--file=FILE`).
    Required,
    /// The flag accepts an argument in attached form only (`--level=3`, `-l3`).
    Optional,
}

/// Identifies a flag within its owning command's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagId {
    pub(crate) command: CommandId,
    pub(crate) index: usize,
}

impl FlagId {
    /// The command this flag is registered on.
    pub fn command(&self) -> CommandId {
        self.command
    }
}

/// Callback invoked for a flag once it is certain the owning command will
/// execute. Runs before the command's own action, in left-to-right
/// discovery order.
pub type FlagCallback = Rc<dyn Fn(&mut CommandTree, FlagId) -> anyhow::Result<()>>;

/// A named, optionally-argumented switch recognized by one command.
pub struct Flag {
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) arity: FlagArity,
    pub(crate) help: String,
    pub(crate) callback: Option<FlagCallback>,
    pub(crate) terminates: bool,
    pub(crate) value: Option<String>,
    pub(crate) seen: bool,
}

impl Flag {
    pub(crate) fn new(
        short: Option<char>,
        long: Option<&str>,
        arity: FlagArity,
        help: &str,
    ) -> Self {
        assert!(
            short.is_some() || long.is_some_and(|l| !l.is_empty()),
            "flag requires a short letter or a long name"
        );
        Self {
            short,
            long: long.map(str::to_owned),
            arity,
            help: help.to_owned(),
            callback: None,
            terminates: false,
            value: None,
            seen: false,
        }
    }

    /// The short letter, if any.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The long name, if any.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Argument arity.
    pub fn arity(&self) -> FlagArity {
        self.arity
    }

    /// Help text supplied at registration.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The argument text captured during the last parse pass, if the flag
    /// was seen with an argument.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// `true` once the flag was seen during the last parse pass.
    pub fn is_set(&self) -> bool {
        self.seen
    }

    /// Whether `name` identifies this flag, by long name or by a
    /// single-letter short form.
    pub(crate) fn matches_name(&self, name: &str) -> bool {
        if self.long.as_deref() == Some(name) {
            return true;
        }
        let mut chars = name.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if self.short == Some(c))
    }
}

/// Finds a registered flag by its short letter.
pub(crate) fn find_by_short(flags: &[Flag], short: char) -> Option<usize> {
    flags.iter().position(|f| f.short == Some(short))
}

/// Finds a registered flag by its long name.
pub(crate) fn find_by_long(flags: &[Flag], long: &str) -> Option<usize> {
    flags.iter().position(|f| f.long.as_deref() == Some(long))
}
