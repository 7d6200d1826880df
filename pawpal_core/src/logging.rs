//! Logging setup for PawPal.
//!
//! Logs go to stderr so stdout stays free for the interactive session.
//! `PAWPAL_LOG` takes precedence over `RUST_LOG`; both accept `EnvFilter`
//! directives.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable checked before `RUST_LOG`
pub const LOG_ENV_VAR: &str = "PAWPAL_LOG";

/// Default level for a CLI verbosity count (`-v`, `-vv`)
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize logging, falling back to `default_level` when neither
/// environment variable holds a usable filter
pub fn init_with_level(default_level: &str) {
    let directives = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok();

    tracing_subscriber::registry()
        .with(build_filter(directives.as_deref(), default_level))
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn build_filter(directives: Option<&str>, default_level: &str) -> EnvFilter {
    directives
        .filter(|text| !text.trim().is_empty())
        .and_then(|text| EnvFilter::try_new(text).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

/// Initialize logging for tests (captured by the test harness)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
