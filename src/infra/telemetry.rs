// ============================================================
// Layer 6 - Telemetry
// ============================================================
// The engine only emits `tracing` events; installing a
// subscriber is the host's call. `init_tracing` is the
// one-liner for hosts that have no subscriber of their own.
//
// A non-empty, parseable RUST_LOG replaces the default outright.
// Only when it is unset (or unusable) does the default directive
// apply, keeping this crate at `info` so per-stage shape logs
// (debug) stay quiet.
//
// Reference: tracing-subscriber documentation (EnvFilter)

use tracing_subscriber::EnvFilter;

/// Directive used when RUST_LOG is unset
pub const DEFAULT_DIRECTIVE: &str = "listing_price_engine=info";

/// Install a global fmt subscriber. Returns false when one is
/// already installed, which is harmless.
pub fn init_tracing() -> bool {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(filter_from(rust_log.as_deref()))
        .try_init()
        .is_ok()
}

fn filter_from(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing();
        // a subscriber is now installed, whoever got there first
        assert!(!init_tracing());
    }

    #[test]
    fn test_rust_log_overrides_default() {
        let filter = filter_from(Some("listing_price_engine=debug"));
        assert_eq!(filter.to_string(), "listing_price_engine=debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_unset_or_blank_rust_log_uses_default() {
        for rust_log in [None, Some(""), Some("   ")] {
            let filter = filter_from(rust_log);
            assert_eq!(filter.to_string(), DEFAULT_DIRECTIVE);
            assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        }
    }
}
