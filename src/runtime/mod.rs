//! Process bootstrap shared by the binaries.

pub mod args;

pub use args::{parse_cli_args, CliArgs, CliSpec};

/// Load `.env`, then install the stderr `tracing` subscriber.
/// `RUST_LOG` selects the filter; unset or invalid falls back to `info`.
pub fn init_runtime() {
    crate::utils::env_guard::harden_env_setup();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
