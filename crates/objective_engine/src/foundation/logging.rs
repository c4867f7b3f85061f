//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// The engine itself only emits through the `log` facade; hosts (and tests)
/// call this once to route records to stderr via `env_logger`. Calling it more
/// than once is harmless.
pub fn init() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}

/// Initialize logging with an explicit filter such as `"objective_engine=debug"`
pub fn init_with_filter(filter: &str) {
    let _ = env_logger::Builder::new()
        .parse_filters(filter)
        .is_test(cfg!(test))
        .try_init();
}

/// Initialize logging with the filter from a [`PlannerConfig`]
///
/// [`PlannerConfig`]: crate::config::PlannerConfig
pub fn init_from_config(config: &crate::config::PlannerConfig) {
    init_with_filter(&config.log_filter);
}
