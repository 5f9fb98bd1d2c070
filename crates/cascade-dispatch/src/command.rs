//! The command tree.
//!
//! Commands live in a flat arena owned by [`CommandTree`]; [`CommandId`]
//! is an opaque index into it. Ownership edges run parent to child only;
//! the parent back-reference is a non-owning id, so the tree is acyclic
//! by construction. A command is registered under exactly one parent,
//! exactly once.
//!
//! Registration is setup-time work: malformed registrations (a flag with
//! neither a short letter nor a long name, a duplicate child name) are
//! programmer errors and panic rather than flowing through the runtime
//! error accumulator.

use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::{ErrorLog, ParseError};
use crate::flag::{Flag, FlagArity, FlagCallback, FlagId};

/// Identifies a command node within its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(pub(crate) usize);

/// Positional-argument contract for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgCount {
    /// The command takes no positional arguments.
    #[default]
    None,
    /// The command takes exactly this many positional arguments.
    Exactly(usize),
    /// The command accepts any number of positional arguments.
    Any,
}

/// Action invoked when a command executes. The command's parsed flags and
/// positional arguments are available through the tree; errors are
/// reported by returning `Err` or by pushing onto the command's error
/// accumulator.
pub type CommandAction = Rc<dyn Fn(&mut CommandTree, CommandId) -> anyhow::Result<()>>;

pub(crate) struct CommandNode {
    pub(crate) name: String,
    pub(crate) help: String,
    pub(crate) group: Option<String>,
    pub(crate) action: Option<CommandAction>,
    pub(crate) expect_args: ArgCount,
    pub(crate) flags: Vec<Flag>,
    pub(crate) children: HashMap<String, CommandId>,
    pub(crate) ordered_children: Vec<CommandId>,
    pub(crate) parent: Option<CommandId>,
    pub(crate) settings: HashMap<String, String>,
    pub(crate) args: Vec<String>,
    pub(crate) errors: ErrorLog,
}

impl CommandNode {
    fn new(name: &str, help: &str, parent: Option<CommandId>) -> Self {
        Self {
            name: name.to_owned(),
            help: help.to_owned(),
            group: None,
            action: None,
            expect_args: ArgCount::None,
            flags: Vec::new(),
            children: HashMap::new(),
            ordered_children: Vec::new(),
            parent,
            settings: HashMap::new(),
            args: Vec::new(),
            errors: ErrorLog::new(),
        }
    }
}

/// The hierarchy of commands with parent/child relationships established
/// at setup time, plus all per-command state the dispatch algorithm
/// mutates: parsed flag values, positional buffers, and error logs.
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Creates a tree containing only the root command.
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            nodes: vec![CommandNode::new(name, help, None)],
        }
    }

    /// The root command.
    pub fn root(&self) -> CommandId {
        CommandId(0)
    }

    pub(crate) fn node(&self, id: CommandId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: CommandId) -> &mut CommandNode {
        &mut self.nodes[id.0]
    }

    /// Registers a subcommand under `parent`. Names must be unique among
    /// siblings; a duplicate is a setup error and panics.
    pub fn add_command(&mut self, parent: CommandId, name: &str, help: &str) -> CommandId {
        assert!(
            !self.node(parent).children.contains_key(name),
            "duplicate command: {name}"
        );
        let id = CommandId(self.nodes.len());
        self.nodes.push(CommandNode::new(name, help, Some(parent)));
        let parent = self.node_mut(parent);
        parent.children.insert(name.to_owned(), id);
        parent.ordered_children.push(id);
        id
    }

    /// Sets the action run when `cmd` executes.
    pub fn set_action<F>(&mut self, cmd: CommandId, action: F)
    where
        F: Fn(&mut CommandTree, CommandId) -> anyhow::Result<()> + 'static,
    {
        self.node_mut(cmd).action = Some(Rc::new(action));
    }

    /// Registers a flag on `cmd`. At least one of `short` and `long` must
    /// be supplied; neither is a setup error and panics.
    pub fn add_flag(
        &mut self,
        cmd: CommandId,
        short: Option<char>,
        long: Option<&str>,
        arity: FlagArity,
        help: &str,
    ) -> FlagId {
        let flag = Flag::new(short, long, arity, help);
        let node = self.node_mut(cmd);
        node.flags.push(flag);
        FlagId {
            command: cmd,
            index: node.flags.len() - 1,
        }
    }

    /// Attaches a callback to a flag. The callback runs once it is
    /// certain the owning command will execute; if `terminates` is set, a
    /// successful invocation short-circuits the rest of dispatch and
    /// reports overall success (the `--help`/`--version` pattern).
    pub fn set_flag_callback<F>(&mut self, flag: FlagId, callback: F, terminates: bool)
    where
        F: Fn(&mut CommandTree, FlagId) -> anyhow::Result<()> + 'static,
    {
        let f = self.flag_mut(flag);
        f.callback = Some(Rc::new(callback) as FlagCallback);
        f.terminates = terminates;
    }

    /// Declares the positional-argument contract for `cmd`. The default
    /// is [`ArgCount::None`].
    pub fn expect_args(&mut self, cmd: CommandId, count: ArgCount) {
        self.node_mut(cmd).expect_args = count;
    }

    /// Sets the group label used when rendering help for the parent's
    /// command list. Purely cosmetic.
    pub fn set_group(&mut self, cmd: CommandId, group: &str) {
        self.node_mut(cmd).group = Some(group.to_owned());
    }

    /// Display name of a command.
    pub fn name(&self, cmd: CommandId) -> &str {
        &self.node(cmd).name
    }

    /// Help text of a command.
    pub fn help(&self, cmd: CommandId) -> &str {
        &self.node(cmd).help
    }

    /// Group label of a command, if any.
    pub fn group(&self, cmd: CommandId) -> Option<&str> {
        self.node(cmd).group.as_deref()
    }

    /// Parent of a command; `None` for the root.
    pub fn parent(&self, cmd: CommandId) -> Option<CommandId> {
        self.node(cmd).parent
    }

    /// Children of `cmd` in registration order (for help display).
    pub fn children(&self, cmd: CommandId) -> &[CommandId] {
        &self.node(cmd).ordered_children
    }

    /// Looks up a direct child by name.
    pub fn child(&self, cmd: CommandId, name: &str) -> Option<CommandId> {
        self.node(cmd).children.get(name).copied()
    }

    /// The command's flag registry in registration order.
    pub fn flags(&self, cmd: CommandId) -> &[Flag] {
        &self.node(cmd).flags
    }

    pub(crate) fn flag(&self, id: FlagId) -> &Flag {
        &self.node(id.command).flags[id.index]
    }

    pub(crate) fn flag_mut(&mut self, id: FlagId) -> &mut Flag {
        &mut self.node_mut(id.command).flags[id.index]
    }

    /// Whether `name` (a long name or a short letter) was seen on `cmd`
    /// during the last parse pass.
    pub fn flag_is_set(&self, cmd: CommandId, name: &str) -> bool {
        self.node(cmd)
            .flags
            .iter()
            .any(|f| f.matches_name(name) && f.seen)
    }

    /// The argument captured for `name` on `cmd` during the last parse
    /// pass, if the flag was seen with an argument.
    pub fn flag_value(&self, cmd: CommandId, name: &str) -> Option<&str> {
        self.node(cmd)
            .flags
            .iter()
            .find(|f| f.matches_name(name))
            .and_then(Flag::value)
    }

    /// Positional arguments absorbed by `cmd` during the last dispatch.
    pub fn args(&self, cmd: CommandId) -> &[String] {
        &self.node(cmd).args
    }

    /// Stores a setting on `cmd`, replacing any previous value.
    pub fn set(&mut self, cmd: CommandId, key: &str, value: &str) {
        self.node_mut(cmd)
            .settings
            .insert(key.to_owned(), value.to_owned());
    }

    /// Looks up a setting on `cmd`, walking up through parents until
    /// found or the root is exhausted. A root-level setting is therefore
    /// visible to every descendant without copying.
    pub fn get(&self, cmd: CommandId, key: &str) -> Option<&str> {
        let mut current = Some(cmd);
        while let Some(id) = current {
            let node = self.node(id);
            if let Some(value) = node.settings.get(key) {
                return Some(value);
            }
            current = node.parent;
        }
        None
    }

    /// Appends a message to the command's error accumulator.
    pub fn push_error(&mut self, cmd: CommandId, message: impl Into<String>) {
        self.node_mut(cmd).errors.push(message);
    }

    pub(crate) fn push_parse_error(&mut self, cmd: CommandId, error: ParseError) {
        self.push_error(cmd, error.to_string());
    }

    /// Whether the command has accumulated errors.
    pub fn has_errors(&self, cmd: CommandId) -> bool {
        !self.node(cmd).errors.is_empty()
    }

    /// Removes and returns the command's accumulated errors in discovery
    /// order, leaving the accumulator empty.
    pub fn drain_errors(&mut self, cmd: CommandId) -> Vec<String> {
        self.node_mut(cmd).errors.drain()
    }

    /// Prints the command's accumulated errors to stderr, draining them.
    pub fn print_errors(&mut self, cmd: CommandId) {
        for message in self.drain_errors(cmd) {
            eprintln!("error: {message}");
        }
    }
}
