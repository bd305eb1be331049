//! Opt-in tracing setup for hosts embedding `chart-interaction`.
//!
//! Coordinator handlers log through `tracing` targets under
//! `chart_interaction::api`. Hosts either call one of the helpers below or
//! install their own subscriber.

/// Filter used when `RUST_LOG` is unset: warnings everywhere, handler
/// decisions from this crate.
pub const DEFAULT_FILTER: &str = "warn,chart_interaction=debug";

/// Filter directive that turns on per-event tracing for the interaction
/// handlers (pointer moves, timer polls, cache rebuilds).
#[must_use]
pub fn verbose_filter() -> String {
    format!("{DEFAULT_FILTER},chart_interaction::api=trace")
}

/// Installs a compact `fmt` subscriber honoring `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Like [`init_default_tracing`] with an explicit fallback directive.
#[must_use]
pub fn init_tracing_with_filter(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
