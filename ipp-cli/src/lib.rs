//! IPPcode24 interpreter front end.
//!
//! This crate is the only place that turns typed errors into process exit
//! codes. Library crates return `Result`s; the binary calls
//! `std::process::exit` once, with the code the command produced.

pub mod cli;
pub mod commands;
pub mod stats;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `warn` level. Logs go to stderr so they
/// never mix with program output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
