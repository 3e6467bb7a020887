//! Logging utilities for wadbreaker
//!
//! Structured logging via the `tracing` crate; parsers and the conversion
//! engine emit events at debug/info level through the standard macros.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether tracing has been initialized
static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize the default tracing subscriber.
///
/// Call once at application startup; further calls are ignored. The filter
/// honors `RUST_LOG` and defaults to `warn,wadbreaker=info`.
pub fn init_default() {
    if TRACING_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
        .is_ok()
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,wadbreaker=info"));

        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_default();
        init_default();
    }
}
