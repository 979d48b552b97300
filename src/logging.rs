//! Logging setup for the binary.
//!
//! The library only emits `tracing` events; this installs the subscriber that
//! prints them to stderr. `RUST_LOG` overrides the default filter.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

static INIT_ONCE: Once = Once::new();

/// Installs the stderr subscriber once. `verbose` lowers the default level
/// to `debug`.
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let default = if verbose { "refract_expand=debug" } else { "refract_expand=info" };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
            )
            .finish();
        // another subscriber may already be installed (tests, embedding)
        let _ = subscriber.try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(false);
        init(true);
    }
}
