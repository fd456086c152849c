#![forbid(unsafe_code)]

//! Logging facade.
//!
//! Every Glint crate logs through `tracing` with a `glint.*` target. This
//! module re-exports the macros and, behind the `subscriber` feature,
//! installs a process-wide subscriber filtered by the `GLINT_LOG`
//! environment variable (same syntax as `RUST_LOG`).

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "GLINT_LOG";

/// Filter applied when `GLINT_LOG` is unset.
pub const DEFAULT_FILTER: &str = "glint=info";

/// Output format for [`init_subscriber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
#[cfg(feature = "subscriber")]
pub fn init_subscriber(
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
