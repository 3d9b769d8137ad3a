//! Tracing setup for the host binary.
//!
//! The library itself only emits `tracing` events. Embedding applications
//! either call [`init_default_tracing`] or install their own subscriber.

/// Installs an env-filtered `tracing` subscriber when the `telemetry` feature
/// is enabled.
///
/// Returns `false` when the feature is disabled or a global subscriber was
/// already set by the host.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gantt_timeline=info")),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
