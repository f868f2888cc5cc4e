use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the stdout progress logger.
///
/// `RUST_LOG` wins over `level`. Thread names are shown so every line says
/// which worker emitted it.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(std::io::stdout().is_terminal())
                .with_thread_names(true)
                .with_target(false),
        )
        .with(filter)
        .init();
}
