// Logging setup.
//
// Diagnostics go to stderr through `tracing`, so they never interleave with
// command results printed on stdout. `RUST_LOG` takes precedence over the
// configured level.

use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` if set and valid, otherwise `default_level`.
pub fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the stderr subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_stderr_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
