//! Logging initialization.
//!
//! Narrower than a full observability stack: no metrics or distributed
//! tracing, just a `tracing_subscriber` console sink configured from
//! [`ObservabilityConfig`] the same way the rest of this pack's services
//! wire up `tracing_subscriber` — an `EnvFilter` directive plus a choice of
//! pretty or JSON formatting.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Initialize the global tracing subscriber. Call once, at process startup.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::filter::ParseError> {
    let filter = EnvFilter::try_new(&config.log_directive)?;

    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        }
        LogFormat::Pretty => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    Ok(())
}
