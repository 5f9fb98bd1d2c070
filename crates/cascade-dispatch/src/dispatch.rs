//! The dispatch algorithm.
//!
//! Given a command and its argv, scan options, defer flag callbacks,
//! collect unhandled flags and positional arguments, then decide whether
//! to delegate to a child command or execute locally:
//!
//! ```text
//! argv
//!   → SCANNING OPTIONS   (pending callbacks queued, unknowns retained)
//!   → COLLECTING ARGS    (remaining tokens, order preserved)
//!   → DELEGATING         (child argv = positionals + unhandled flags)
//!   | EXECUTING          (pending handlers, then the command action)
//! ```
//!
//! Exactly one command in the tree is active at any instant; recursion
//! depth equals tree depth along the single resolved path. The pending
//! and unhandled queues and the option table are locals of one call and
//! are released on every return path.
//!
//! By convention `argv[0]` is the invocation-name slot and is never
//! parsed: the process argv carries the program name there, and a
//! delegated argv carries the child's own name there (it is the
//! positional that matched the child).

use tracing::{trace, trace_span};

use crate::command::{ArgCount, CommandId, CommandTree};
use crate::errors::ParseError;
use crate::flag::{self, FlagId};
use crate::optable::OptTable;
use crate::scan::{ScanResult, Scanner};

impl CommandTree {
    /// Runs a top-level dispatch on the root command. `args` excludes the
    /// program name. Returns `true` on overall success; on failure the
    /// root's error accumulator holds the messages for commands that
    /// failed at the root, while a failed descendant has already printed
    /// its own.
    pub fn run<I, S>(&mut self, args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let root = self.root();
        let mut argv = vec![self.name(root).to_owned()];
        argv.extend(args.into_iter().map(Into::into));
        self.dispatch(root, argv)
    }

    /// Dispatches `argv` against `cmd`, recursing into at most one child.
    /// `argv[0]` is the invocation-name slot and is not parsed.
    pub fn dispatch(&mut self, cmd: CommandId, argv: Vec<String>) -> bool {
        let span = trace_span!("dispatch", command = %self.name(cmd));
        let _guard = span.entered();

        let args: Vec<String> = argv.into_iter().skip(1).collect();

        // Transform the flag registry into scanner tables; lives for this
        // call only.
        let table = OptTable::build(self.flags(cmd));
        let mut scanner = Scanner::new(&table, args);

        // Flag handlers to run once it is certain this command executes.
        let mut pending: Vec<FlagId> = Vec::new();
        // Options this registry cannot claim; they may belong to a
        // subcommand.
        let mut unhandled: Vec<String> = Vec::new();

        trace!("start parse loop");
        while let Some(result) = scanner.next_opt() {
            match result {
                ScanResult::Short { letter, arg } => {
                    let Some(index) = flag::find_by_short(self.flags(cmd), letter) else {
                        self.push_parse_error(cmd, ParseError::Unexpected(format!("-{letter}")));
                        return false;
                    };
                    trace!(option = %letter, "matched short option");
                    self.record_flag(cmd, index, arg, &mut pending);
                }
                ScanResult::Long { index, arg } => {
                    // A long option without a short equivalent: resolve
                    // by name, never by position.
                    let name = table.long[index].name.clone();
                    let Some(index) = flag::find_by_long(self.flags(cmd), &name) else {
                        self.push_parse_error(cmd, ParseError::Unexpected(format!("--{name}")));
                        return false;
                    };
                    trace!(option = %name, "matched long option");
                    self.record_flag(cmd, index, arg, &mut pending);
                }
                ScanResult::Unknown(token) => {
                    trace!(token = %token, "unrecognized option, retaining for a subcommand");
                    unhandled.push(token);
                }
                ScanResult::MissingArg(token) => {
                    self.push_parse_error(cmd, ParseError::MissingOptionArgument(token));
                    return false;
                }
            }
        }

        // Remaining non-option tokens, order preserved.
        let args = scanner.finish();

        let has_subcommands = !self.children(cmd).is_empty();
        let has_unhandled_flags = !unhandled.is_empty();
        let has_args = !args.is_empty();
        trace!(has_subcommands, has_unhandled_flags, has_args, "deciding");

        if !has_unhandled_flags && !has_args {
            return self.execute(cmd, &pending);
        }

        // An unhandled flag needs a subcommand that could claim it.
        if has_unhandled_flags && !has_subcommands {
            self.push_parse_error(cmd, ParseError::UnknownOption(unhandled[0].clone()));
            return false;
        }

        // An unhandled flag with no candidate subcommand name to
        // delegate to.
        if has_unhandled_flags && !has_args {
            self.push_parse_error(cmd, ParseError::UnexpectedOption(unhandled[0].clone()));
            return false;
        }

        if let Some(child) = self.child(cmd, &args[0]) {
            // Synthetic child argv: positionals first (args[0] doubles as
            // the child's invocation-name slot, and any further
            // subcommand name must precede the flags for the child's own
            // decision step), then the unhandled flags for the child's
            // scanner to claim.
            let mut child_argv = args;
            child_argv.extend(unhandled);
            trace!(subcommand = %self.name(child), "delegating");
            let ok = self.dispatch(child, child_argv);
            if !ok {
                // The child reported its own errors; this command does
                // not execute and does not duplicate them.
                self.print_errors(child);
            }
            return ok;
        }

        // No subcommand matched: this command absorbs the positionals.
        match self.node(cmd).expect_args {
            ArgCount::None => {
                self.push_parse_error(cmd, ParseError::UnexpectedArgument(args[0].clone()));
                false
            }
            ArgCount::Exactly(expected) if args.len() > expected => {
                self.push_parse_error(
                    cmd,
                    ParseError::TooManyArguments {
                        expected,
                        got: args.len(),
                    },
                );
                false
            }
            _ => {
                self.node_mut(cmd).args = args;
                self.execute(cmd, &pending)
            }
        }
    }

    fn record_flag(
        &mut self,
        cmd: CommandId,
        index: usize,
        arg: Option<String>,
        pending: &mut Vec<FlagId>,
    ) {
        let id = FlagId {
            command: cmd,
            index,
        };
        let flag = self.flag_mut(id);
        flag.seen = true;
        if arg.is_some() {
            flag.value = arg;
        }
        if flag.callback.is_some() {
            trace!("queueing pending flag handler");
            pending.push(id);
        }
    }

    fn execute(&mut self, cmd: CommandId, pending: &[FlagId]) -> bool {
        // 1. Run pending flag handlers in discovery order. A terminating
        //    handler that succeeds short-circuits with overall success.
        for &id in pending {
            let flag = self.flag(id);
            let Some(callback) = flag.callback.clone() else {
                continue;
            };
            let terminates = flag.terminates;
            trace!(flag = ?flag.long(), "running pending flag handler");
            match (*callback)(self, id) {
                Ok(()) if terminates => return true,
                Ok(()) => {}
                Err(err) => self.push_error(cmd, err.to_string()),
            }
        }

        // 2. A handler may have reported an error without terminating.
        if self.has_errors(cmd) {
            return false;
        }

        // 3. An exact contract also rejects too few arguments. Checked
        //    here, after the handlers, so `--help` on an
        //    argument-expecting command still short-circuits.
        if let ArgCount::Exactly(expected) = self.node(cmd).expect_args {
            let got = self.args(cmd).len();
            if got < expected {
                self.push_parse_error(cmd, ParseError::MissingArguments { expected, got });
                return false;
            }
        }

        // 4. Run the command action.
        if let Some(action) = self.node(cmd).action.clone() {
            trace!("running command action");
            if let Err(err) = (*action)(self, cmd) {
                self.push_error(cmd, err.to_string());
            }
        }

        // 5. The action may have reported errors of its own.
        !self.has_errors(cmd)
    }
}
