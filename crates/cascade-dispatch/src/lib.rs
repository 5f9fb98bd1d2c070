//! Recursive command tree dispatch for CLI applications.
//!
//! `cascade-dispatch` provides the command routing core for CLIs built
//! around nested subcommands: a command tree with per-command flag
//! registries, a POSIX-style option scanner, deferred flag callbacks,
//! and structured error accumulation. It performs no rendering of its
//! own; help and version output are ordinary flag callbacks and
//! subcommand actions supplied by the application.
//!
//! # Features
//!
//! - **Command tree**: named commands with children, registered once
//!   under one parent; lookup by name during delegation, registration
//!   order preserved for help display
//! - **Flag registries**: short and/or long forms, POSIX argument arity
//!   (none/required/optional), per-flag callbacks with an optional
//!   terminate-on-success marker for `--help`/`--version` style flags
//! - **Delegation**: tokens a command cannot claim are forwarded to a
//!   matched child command for a fresh dispatch pass, so a flag
//!   registered on a descendant works anywhere on the line
//! - **Error accumulation**: per-command ordered error logs, drained in
//!   discovery order when reporting
//! - **Inherited settings**: string key/value pairs resolved by walking
//!   the parent chain, so a root-level version string is visible to
//!   every descendant
//!
//! # Example
//!
//! ```rust
//! use cascade_dispatch::{ArgCount, CommandTree, FlagArity};
//!
//! let mut tree = CommandTree::new("app", "demo");
//! let root = tree.root();
//!
//! let greet = tree.add_command(root, "greet", "greet someone");
//! tree.expect_args(greet, ArgCount::Exactly(1));
//! tree.add_flag(greet, Some('l'), Some("loud"), FlagArity::None, "shout it");
//! tree.set_action(greet, |tree, cmd| {
//!     let name = &tree.args(cmd)[0];
//!     if tree.flag_is_set(cmd, "loud") {
//!         println!("HELLO, {}!", name.to_uppercase());
//!     } else {
//!         println!("hello, {name}");
//!     }
//!     Ok(())
//! });
//!
//! assert!(tree.run(["greet", "--loud", "world"]));
//! ```

mod command;
mod dispatch;
mod errors;
mod flag;
mod optable;
mod scan;

pub use command::{ArgCount, CommandAction, CommandId, CommandTree};

pub use errors::{ErrorLog, ParseError};

pub use flag::{Flag, FlagArity, FlagCallback, FlagId};

pub use optable::{LongOpt, OptTable};

pub use scan::{ScanResult, Scanner};
