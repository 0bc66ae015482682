use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global stderr subscriber. `RUST_LOG` wins over `verbosity`,
/// which maps 0 to warn, 1 to info and anything higher to debug.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    // a second call (e.g. from tests) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
