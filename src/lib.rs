use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

pub mod clubs;
pub mod config;
pub mod dataset;
pub mod density;
pub mod error;
pub mod export;
pub mod head_to_head;
pub mod report;
pub mod state;
pub mod stats;

/// Logs to stderr. Only for runs that never take over the terminal.
pub fn init_logging() {
    init_with_writer(io::stderr, true);
}

/// Appends log lines to `path`, keeping them off the TUI's alternate screen.
pub fn init_file_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    init_with_writer(Mutex::new(file), false);
    Ok(())
}

fn init_with_writer<W>(writer: W, ansi: bool)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .try_init();
}
