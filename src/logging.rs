//! Opt-in log output for hosts that do not install their own subscriber.

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter, e.g. `retro=debug`.
pub const LOG_ENV: &str = "RETRO_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install a stderr subscriber filtered by `RETRO_LOG` (default `warn`).
///
/// Returns true if this call installed it, false if a global subscriber
/// already existed. Safe to call more than once.
#[unsafe(no_mangle)]
pub extern "C" fn retro_log_init() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_refused() {
        retro_log_init();
        assert!(!retro_log_init());
    }
}
