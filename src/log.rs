use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::EnvFilter;

use crate::config::BridgeConfig;

/// Global flag to control per-call session debug logging
pub static SESSION_DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Set session debug logging on/off
pub fn set_session_debug(enabled: bool) {
    SESSION_DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
    tracing::info!(
        "Session debug logging {}",
        if enabled { "ENABLED" } else { "DISABLED" }
    );
}

/// Check if session debug logging is enabled
pub fn is_session_debug_enabled() -> bool {
    SESSION_DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Install the global tracing subscriber using the configured filter.
/// `RUST_LOG` wins over the config when set. A second call is a no-op.
pub fn init_tracing(config: &BridgeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Tracing initialised (filter: {})", config.log_filter);
    }
}

/// Session debug macro - only logs if session debug is enabled
#[macro_export]
macro_rules! session_debug {
    ($($arg:tt)*) => {
        if $crate::log::SESSION_DEBUG_ENABLED.load(std::sync::atomic::Ordering::Relaxed) {
            tracing::debug!($($arg)*);
        }
    };
}
