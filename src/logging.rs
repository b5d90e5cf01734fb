use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Environment variable consulted when `--log-level` is not given.
pub const LOG_ENV: &str = "TALLY_LOG";

const DEFAULT_LEVEL: &str = "warn";

fn build_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
    }
}

/// Install the stderr logger. Stdout is reserved for tables, JSON and CSV.
pub fn init(level: Option<&str>) {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(build_filter(level));

    if let Err(e) = tracing_subscriber::registry().with(terminal_log).try_init() {
        eprintln!("Logging disabled: {e}");
    }
}
