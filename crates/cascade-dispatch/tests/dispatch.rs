//! Integration tests for the dispatch algorithm: delegation, deferred
//! flag callbacks, argument contracts, error accumulation, and settings
//! propagation across a real command tree.

use std::cell::Cell;
use std::rc::Rc;

use cascade_dispatch::{ArgCount, CommandTree, FlagArity};

/// A counter an action or flag callback can bump, for asserting what ran.
fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

#[test]
fn short_and_long_forms_produce_identical_values() {
    for form in [vec!["-g", "hi"], vec!["--greeting", "hi"], vec!["--greeting=hi"]] {
        let mut tree = CommandTree::new("app", "");
        let root = tree.root();
        tree.add_flag(root, Some('g'), Some("greeting"), FlagArity::Required, "");

        assert!(tree.run(form));
        assert_eq!(tree.flag_value(root, "greeting"), Some("hi"));
        assert_eq!(tree.flag_value(root, "g"), Some("hi"));
        assert!(tree.flag_is_set(root, "greeting"));
    }
}

#[test]
fn flag_callbacks_are_deferred_past_fatal_parse_errors() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();

    let ran = counter();
    let x = tree.add_flag(root, Some('x'), None, FlagArity::None, "");
    let ran_in = ran.clone();
    tree.set_flag_callback(
        x,
        move |_, _| {
            ran_in.set(ran_in.get() + 1);
            Ok(())
        },
        false,
    );
    tree.add_flag(root, Some('f'), Some("file"), FlagArity::Required, "");

    // -x is discovered first and queued, then --file hits a fatal missing
    // argument; the queued handler must never run.
    assert!(!tree.run(["-x", "--file"]));
    assert_eq!(ran.get(), 0);
    assert_eq!(
        tree.drain_errors(root),
        vec!["missing expected argument for option: --file"]
    );
}

#[test]
fn delegation_executes_only_the_deepest_matched_command() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();

    let root_runs = counter();
    let foo_runs = counter();
    let bar_runs = counter();

    let c = root_runs.clone();
    tree.set_action(root, move |_, _| {
        c.set(c.get() + 1);
        Ok(())
    });

    let foo = tree.add_command(root, "foo", "");
    let c = foo_runs.clone();
    tree.set_action(foo, move |_, _| {
        c.set(c.get() + 1);
        Ok(())
    });

    let bar = tree.add_command(foo, "bar", "");
    let c = bar_runs.clone();
    tree.set_action(bar, move |_, _| {
        c.set(c.get() + 1);
        Ok(())
    });

    assert!(tree.run(["foo", "bar"]));
    assert_eq!(root_runs.get(), 0);
    assert_eq!(foo_runs.get(), 0);
    assert_eq!(bar_runs.get(), 1);
}

#[test]
fn exact_argument_contract_rejects_zero_and_two() {
    let run_with = |args: Vec<&str>| {
        let mut tree = CommandTree::new("app", "");
        let root = tree.root();
        tree.expect_args(root, ArgCount::Exactly(1));
        let ok = tree.run(args);
        (ok, tree.drain_errors(root), tree.args(root).to_vec())
    };

    let (ok, errors, _) = run_with(vec![]);
    assert!(!ok);
    assert_eq!(errors, vec!["expected 1 argument(s), got 0"]);

    let (ok, errors, args) = run_with(vec!["one"]);
    assert!(ok);
    assert!(errors.is_empty());
    assert_eq!(args, vec!["one"]);

    let (ok, errors, _) = run_with(vec!["one", "two"]);
    assert!(!ok);
    assert_eq!(errors, vec!["too many arguments (expected up to 1, got 2)"]);
}

#[test]
fn unhandled_flags_are_forwarded_to_the_delegated_child() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    let child = tree.add_command(root, "child", "");
    tree.add_flag(child, None, Some("childflag"), FlagArity::None, "");

    assert!(tree.run(["child", "--childflag"]));
    assert!(tree.flag_is_set(child, "childflag"));
    assert!(!tree.has_errors(root));
    assert!(!tree.has_errors(child));
}

#[test]
fn forwarded_positionals_keep_their_order() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    let child = tree.add_command(root, "child", "");
    tree.expect_args(child, ArgCount::Any);

    assert!(tree.run(["child", "a", "b", "c"]));
    assert_eq!(tree.args(child), &["a", "b", "c"]);
}

#[test]
fn ancestor_flags_remain_valid_for_descendants() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    tree.add_flag(root, Some('V'), Some("verbose"), FlagArity::None, "");
    let sub = tree.add_command(root, "sub", "");
    let runs = counter();
    let c = runs.clone();
    tree.set_action(sub, move |_, _| {
        c.set(c.get() + 1);
        Ok(())
    });

    // --verbose is claimed by the root's registry before delegation.
    assert!(tree.run(["--verbose", "sub"]));
    assert_eq!(runs.get(), 1);
    assert!(tree.flag_is_set(root, "verbose"));
}

#[test]
fn unknown_option_without_subcommands_is_fatal() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();

    assert!(!tree.run(["--bogus"]));
    assert_eq!(tree.drain_errors(root), vec!["unknown option: --bogus"]);
}

#[test]
fn unhandled_flag_without_a_candidate_subcommand_is_fatal() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    tree.add_command(root, "child", "");

    // There is a subcommand registry, but no positional to name one.
    assert!(!tree.run(["--bogus"]));
    assert_eq!(tree.drain_errors(root), vec!["unexpected option: --bogus"]);
}

#[test]
fn no_argument_contract_rejects_stray_positionals() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    tree.add_command(root, "child", "");

    assert!(!tree.run(["stray"]));
    assert_eq!(tree.drain_errors(root), vec!["unexpected argument: stray"]);
}

#[test]
fn unbounded_contract_never_errors_on_count() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    tree.expect_args(root, ArgCount::Any);

    let many: Vec<String> = (0..50).map(|i| format!("arg{i}")).collect();
    assert!(tree.run(many.clone()));
    assert_eq!(tree.args(root), &many[..]);
}

#[test]
fn terminating_flag_short_circuits_the_action() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();

    let help_runs = counter();
    let action_runs = counter();

    let h = tree.add_flag(root, Some('h'), Some("help"), FlagArity::None, "");
    let c = help_runs.clone();
    tree.set_flag_callback(
        h,
        move |_, _| {
            c.set(c.get() + 1);
            Ok(())
        },
        true,
    );
    let c = action_runs.clone();
    tree.set_action(root, move |_, _| {
        c.set(c.get() + 1);
        Ok(())
    });

    assert!(tree.run(["--help"]));
    assert_eq!(help_runs.get(), 1);
    assert_eq!(action_runs.get(), 0);
}

#[test]
fn terminating_flag_on_an_argument_expecting_command_still_wins() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    let take = tree.add_command(root, "take", "");
    tree.expect_args(take, ArgCount::Exactly(1));
    let h = tree.add_flag(take, Some('h'), Some("help"), FlagArity::None, "");
    tree.set_flag_callback(h, |_, _| Ok(()), true);

    // No positional supplied, but --help short-circuits before the
    // argument-count check.
    assert!(tree.run(["take", "--help"]));
    assert!(!tree.has_errors(take));
}

#[test]
fn failing_flag_callback_blocks_execution() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();

    let action_runs = counter();
    let f = tree.add_flag(root, Some('b'), Some("boom"), FlagArity::None, "");
    tree.set_flag_callback(f, |_, _| Err(anyhow::anyhow!("boom failed")), true);
    let c = action_runs.clone();
    tree.set_action(root, move |_, _| {
        c.set(c.get() + 1);
        Ok(())
    });

    // A terminating flag only terminates on success; a failure is
    // accumulated and the command body never runs.
    assert!(!tree.run(["--boom"]));
    assert_eq!(action_runs.get(), 0);
    assert_eq!(tree.drain_errors(root), vec!["boom failed"]);
}

#[test]
fn action_errors_are_accumulated_and_fail_the_dispatch() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    tree.set_action(root, |_, _| Err(anyhow::anyhow!("action exploded")));

    assert!(!tree.run(Vec::<String>::new()));
    assert_eq!(tree.drain_errors(root), vec!["action exploded"]);
}

#[test]
fn action_can_push_errors_directly() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    tree.set_action(root, |tree, cmd| {
        tree.push_error(cmd, "first problem");
        tree.push_error(cmd, "second problem");
        Ok(())
    });

    assert!(!tree.run(Vec::<String>::new()));
    assert_eq!(
        tree.drain_errors(root),
        vec!["first problem", "second problem"]
    );
}

#[test]
fn failing_child_does_not_populate_the_parent_accumulator() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    let child = tree.add_command(root, "child", "");
    tree.set_action(child, |_, _| Err(anyhow::anyhow!("child failed")));

    assert!(!tree.run(["child"]));
    // The child printed and drained its own errors during delegation;
    // the parent simply did not execute.
    assert!(!tree.has_errors(root));
    assert!(!tree.has_errors(child));
}

#[test]
fn successful_dispatch_leaves_every_visited_accumulator_empty() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    let mid = tree.add_command(root, "mid", "");
    let leaf = tree.add_command(mid, "leaf", "");
    tree.set_action(leaf, |_, _| Ok(()));

    assert!(tree.run(["mid", "leaf"]));
    for cmd in [root, mid, leaf] {
        assert!(!tree.has_errors(cmd));
    }
}

#[test]
fn settings_set_on_the_root_are_visible_to_descendants() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    tree.set(root, "version", "0.1.0");
    let child = tree.add_command(root, "child", "");

    let seen = Rc::new(Cell::new(false));
    let seen_in = seen.clone();
    tree.set_action(child, move |tree, cmd| {
        assert_eq!(tree.get(cmd, "version"), Some("0.1.0"));
        seen_in.set(true);
        Ok(())
    });

    assert!(tree.run(["child"]));
    assert!(seen.get());
}

#[test]
fn flag_values_are_readable_from_the_action() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    let child = tree.add_command(root, "render", "");
    tree.add_flag(child, Some('o'), Some("output"), FlagArity::Required, "");
    tree.expect_args(child, ArgCount::Exactly(1));

    let captured = Rc::new(Cell::new(false));
    let captured_in = captured.clone();
    tree.set_action(child, move |tree, cmd| {
        assert_eq!(tree.flag_value(cmd, "output"), Some("out.txt"));
        assert_eq!(tree.args(cmd), &["in.txt"]);
        captured_in.set(true);
        Ok(())
    });

    // The attached form survives forwarding: the root does not recognize
    // --output, so it rides to the child as one token.
    assert!(tree.run(["render", "--output=out.txt", "in.txt"]));
    assert!(captured.get());
}

#[test]
fn flags_after_the_subcommand_name_are_forwarded_not_claimed() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    tree.add_flag(root, Some('q'), Some("quiet"), FlagArity::None, "");
    let child = tree.add_command(root, "child", "");
    tree.add_flag(child, Some('q'), Some("quiet"), FlagArity::None, "");

    // The root scanner sees and claims -q regardless of position; a flag
    // only the child knows rides along to the child.
    tree.add_flag(child, None, Some("deep"), FlagArity::None, "");
    assert!(tree.run(["child", "-q", "--deep"]));
    assert!(tree.flag_is_set(root, "quiet"));
    assert!(!tree.flag_is_set(child, "quiet"));
    assert!(tree.flag_is_set(child, "deep"));
}

#[test]
fn double_dash_stops_option_claiming() {
    let mut tree = CommandTree::new("app", "");
    let root = tree.root();
    tree.expect_args(root, ArgCount::Any);
    tree.add_flag(root, Some('q'), Some("quiet"), FlagArity::None, "");

    assert!(tree.run(["--", "-q", "literal"]));
    assert!(!tree.flag_is_set(root, "quiet"));
    assert_eq!(tree.args(root), &["-q", "literal"]);
}
