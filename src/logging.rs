//! Tracing subscriber bootstrap
//!
//! The library only emits `tracing` events; hosts call [`init_logging`] once
//! (or install their own subscriber). `RUST_LOG` takes precedence over the
//! default directive.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_DIRECTIVE: &str = "enroll=info";

/// Install a formatted console subscriber as the global default
///
/// Fails, without panicking, when a global subscriber is already set.
pub fn init_logging(default_directive: Option<&str>) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive.unwrap_or(DEFAULT_DIRECTIVE)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
