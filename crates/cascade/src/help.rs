//! Help and version rendering.
//!
//! Consumes a command's public flag registry and ordered child list to
//! produce usage text. This sits outside the dispatch contract: the
//! engine never renders help itself, it only runs the flag callbacks and
//! subcommand actions wired up here.
//!
//! Layout: a usage line, the flag list, ungrouped commands under
//! `Commands:`, then one section per group label in first-encounter
//! order. Names are padded to the widest entry so help text stays
//! aligned in two columns.

use cascade_dispatch::{CommandId, CommandTree, Flag};

fn flag_label(flag: &Flag) -> String {
    match (flag.short(), flag.long()) {
        (Some(s), Some(l)) => format!("-{s}, --{l}"),
        (Some(s), None) => format!("-{s}"),
        (None, Some(l)) => format!("    --{l}"),
        (None, None) => unreachable!("flag registration requires a short or long name"),
    }
}

fn max_width(tree: &CommandTree, cmd: CommandId) -> usize {
    let flags = tree
        .flags(cmd)
        .iter()
        .map(|f| flag_label(f).chars().count());
    let commands = tree
        .children(cmd)
        .iter()
        .map(|&c| tree.name(c).chars().count());
    flags.chain(commands).max().unwrap_or(0)
}

fn push_aligned(out: &mut String, name: &str, help: &str, width: usize) {
    out.push_str("  ");
    out.push_str(name);
    for _ in 0..width - name.chars().count() + 2 {
        out.push(' ');
    }
    out.push_str(help);
    out.push('\n');
}

/// Renders the full help text for `cmd`.
pub fn render_help(tree: &CommandTree, cmd: CommandId) -> String {
    let width = max_width(tree, cmd);
    let mut out = String::new();

    out.push_str(&format!(
        "Usage: {} [options] [command] [args]\n",
        tree.name(cmd)
    ));
    if !tree.help(cmd).is_empty() {
        out.push_str(&format!("\n{}\n", tree.help(cmd)));
    }

    if !tree.flags(cmd).is_empty() {
        out.push_str("\nOptions:\n");
        for flag in tree.flags(cmd) {
            push_aligned(&mut out, &flag_label(flag), flag.help(), width);
        }
    }

    let children = tree.children(cmd);

    // Ungrouped commands first, under a plain header.
    if children.iter().any(|&c| tree.group(c).is_none()) {
        out.push_str("\nCommands:\n");
        for &child in children {
            if tree.group(child).is_none() {
                push_aligned(&mut out, tree.name(child), tree.help(child), width);
            }
        }
    }

    // Then one section per group, in first-encounter order.
    let mut shown: Vec<&str> = Vec::new();
    for &child in children {
        let Some(group) = tree.group(child) else {
            continue;
        };
        if shown.contains(&group) {
            continue;
        }
        shown.push(group);
        out.push_str(&format!("\n{group}:\n"));
        for &member in children {
            if tree.group(member) == Some(group) {
                push_aligned(&mut out, tree.name(member), tree.help(member), width);
            }
        }
    }

    out
}

/// Renders the one-line version banner from the inherited "version"
/// setting.
pub fn render_version(tree: &CommandTree, cmd: CommandId) -> String {
    let root = tree.root();
    let version = tree.get(cmd, "version").unwrap_or("unknown");
    format!("{} version {}\n", tree.name(root), version)
}

/// Prints help for `cmd` to stdout.
pub fn print_help(tree: &CommandTree, cmd: CommandId) {
    print!("{}", render_help(tree, cmd));
}

/// Prints the version banner to stdout.
pub fn print_version(tree: &CommandTree, cmd: CommandId) {
    print!("{}", render_version(tree, cmd));
}
