//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{Config, ProfilingMode};

/// Filter used by [`init`] when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,sizewatch=debug,sizewatch_ui=debug,taffy=warn";

pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a fmt subscriber. `RUST_LOG` wins over `filter` when present.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}

/// Apply logging and profiling settings from a [`Config`].
pub fn init_from_config(config: &Config) {
    init_with_filter(&config.log_filter);

    match config.profiling {
        ProfilingMode::Off => {}
        ProfilingMode::On => crate::profiling::enable(),
        ProfilingMode::WithWebServer => {
            crate::profiling::init_profiling(crate::profiling::ProfilingBackend::PuffinHttp)
        }
    }
}
