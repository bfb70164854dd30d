use std::process;

use budget_classify::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr at `warn` unless RUST_LOG says otherwise.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

fn main() {
    init_tracing();

    if let Err(e) = Cli::parse().execute() {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {cause}");
        }
        process::exit(1);
    }
}
