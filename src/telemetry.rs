//! Tracing subscriber setup for the command-line binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn,energy_forecast=info";

/// Installs a stderr fmt subscriber filtered by `RUST_LOG`.
///
/// `verbose` lowers the crate's default level to `debug`; an explicit
/// `RUST_LOG` always wins. Calling this more than once is a no-op.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,energy_forecast=debug"
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
