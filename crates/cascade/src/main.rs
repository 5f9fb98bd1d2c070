use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cascade::app;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let name = argv
        .first()
        .map(|s| Path::new(s))
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .unwrap_or("cascade")
        .to_owned();

    let mut tree = app::build(&name);
    tracing::debug!(name, "command tree built");
    let root = tree.root();
    let ok = tree.dispatch(root, argv);
    if !ok {
        tree.print_errors(root);
    }
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
