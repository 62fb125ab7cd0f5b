//! Diagnostic tracing for the command-line adapter.
//!
//! Reads `RUST_LOG`; when unset, episode lifecycle messages from the Maze
//! Explorer crates are shown and everything else is limited to warnings.
//! Output goes to stderr so it never interleaves with the maze printed on
//! stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "maze_explorer=info,warn";

/// Installs the global tracing subscriber.
pub(crate) fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
