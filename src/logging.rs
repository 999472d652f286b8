//! Logging setup for the command-line driver
//!
//! `RUST_LOG` takes precedence over the verbosity flag when it is set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "vic_batch=debug,info"
    } else {
        "vic_batch=info,warn"
    }
}

/// Install a compact stderr subscriber
pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_names(verbose)
                .compact(),
        )
        .init();
}
