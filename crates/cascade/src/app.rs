//! The sample application tree.
//!
//! Wires up a small CLI that exercises the dispatch engine end to end:
//! terminating help/version flags, grouped subcommands, a nested command
//! with its own flag registry, and actions that read flag values,
//! positional arguments, and inherited settings.

use cascade_dispatch::{ArgCount, CommandTree, FlagArity};

use crate::help;

/// Builds the full command tree. `name` becomes the root's display name,
/// normally the program's invocation name.
pub fn build(name: &str) -> CommandTree {
    let mut tree = CommandTree::new(name, "A layered command line built on recursive dispatch.");
    let root = tree.root();
    tree.set(root, "version", env!("CARGO_PKG_VERSION"));

    let version_flag = tree.add_flag(
        root,
        Some('v'),
        Some("version"),
        FlagArity::None,
        "print version",
    );
    tree.set_flag_callback(
        version_flag,
        |tree, id| {
            help::print_version(tree, id.command());
            Ok(())
        },
        true,
    );
    // Help and version are root-level flags: an ancestor's registry
    // claims a flag wherever it appears on the line, so registering
    // them per command would shadow the root's anyway. Per-command help
    // goes through the `help` subcommand or a command's own default
    // action.
    let help_flag = tree.add_flag(root, Some('h'), Some("help"), FlagArity::None, "print help");
    tree.set_flag_callback(
        help_flag,
        |tree, id| {
            help::print_help(tree, id.command());
            Ok(())
        },
        true,
    );

    // The bare program name prints help, same as `--help`.
    tree.set_action(root, |tree, cmd| {
        help::print_help(tree, cmd);
        Ok(())
    });

    let help_cmd = tree.add_command(root, "help", "print help");
    tree.expect_args(help_cmd, ArgCount::Any);
    tree.set_action(help_cmd, |tree, _| {
        let root = tree.root();
        help::print_help(tree, root);
        Ok(())
    });

    let version_cmd = tree.add_command(root, "version", "print version");
    tree.set_action(version_cmd, |tree, cmd| {
        help::print_version(tree, cmd);
        Ok(())
    });

    let echo = tree.add_command(root, "echo", "print the arguments back");
    tree.set_group(echo, "Text");
    tree.expect_args(echo, ArgCount::Any);
    tree.add_flag(
        echo,
        Some('u'),
        Some("upper"),
        FlagArity::None,
        "uppercase the output",
    );
    tree.set_action(echo, |tree, cmd| {
        let mut line = tree.args(cmd).join(" ");
        if tree.flag_is_set(cmd, "upper") {
            line = line.to_uppercase();
        }
        println!("{line}");
        Ok(())
    });

    let greet = tree.add_command(root, "greet", "greet someone by name");
    tree.set_group(greet, "Text");
    tree.expect_args(greet, ArgCount::Exactly(1));
    tree.add_flag(
        greet,
        Some('l'),
        Some("loud"),
        FlagArity::None,
        "shout the greeting",
    );
    tree.add_flag(
        greet,
        Some('g'),
        Some("greeting"),
        FlagArity::Required,
        "word to greet with (default: hello)",
    );
    tree.set_action(greet, |tree, cmd| {
        let name = tree.args(cmd)[0].clone();
        if name.is_empty() {
            anyhow::bail!("nothing to greet");
        }
        let word = tree.flag_value(cmd, "greeting").unwrap_or("hello");
        let mut line = format!("{word}, {name}!");
        if tree.flag_is_set(cmd, "loud") {
            line = line.to_uppercase();
        }
        println!("{line}");
        Ok(())
    });

    // A nested command whose children share state through an inherited
    // setting stored on the root.
    let stack = tree.add_command(root, "stack", "operate on the demo stack");
    tree.set_group(stack, "State");
    tree.set_action(stack, |tree, cmd| {
        help::print_help(tree, cmd);
        Ok(())
    });

    let push = tree.add_command(stack, "push", "push a value");
    tree.expect_args(push, ArgCount::Exactly(1));
    tree.add_flag(
        push,
        Some('q'),
        Some("quiet"),
        FlagArity::None,
        "suppress confirmation",
    );
    tree.set_action(push, |tree, cmd| {
        let value = tree.args(cmd)[0].clone();
        let root = tree.root();
        tree.set(root, "top", &value);
        if !tree.flag_is_set(cmd, "quiet") {
            println!("pushed {value}");
        }
        Ok(())
    });

    let pop = tree.add_command(stack, "pop", "pop the top value");
    tree.set_action(pop, |tree, cmd| {
        let Some(top) = tree.get(cmd, "top") else {
            anyhow::bail!("stack is empty");
        };
        println!("popped {top}");
        Ok(())
    });

    tree
}
