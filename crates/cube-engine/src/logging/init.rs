use std::sync::Once;

/// Crates through which the GPU driver reports its own diagnostics.
pub const DRIVER_TARGETS: [&str; 4] = ["wgpu", "wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "cube_engine=debug,wgpu=warn").
///
/// `write_style` controls ANSI coloring behavior.
///
/// `driver_level` is applied to the [`DRIVER_TARGETS`] after the main filter,
/// so driver verbosity can be raised or lowered independently.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub driver_level: Option<log::LevelFilter>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            driver_level: Some(log::LevelFilter::Warn),
        }
    }
}

/// Flushes the logger when dropped.
///
/// Hold it in `main` for the lifetime of the program.
#[must_use = "dropping the guard immediately flushes and ends the logging session"]
#[derive(Debug)]
pub struct LoggingGuard {
    _private: (),
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        log::debug!("logging shut down");
        log::logger().flush();
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls only hand out another guard.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) -> LoggingGuard {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter.as_deref() {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        if let Some(level) = config.driver_level {
            for target in DRIVER_TARGETS {
                builder.filter_module(target, level);
            }
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            // Someone else installed a logger first; keep theirs.
            return;
        }

        log::debug!("logging initialized");
    });

    LoggingGuard { _private: () }
}

/// Maps a driver verbosity name ("trace" .. "error", "off") to a filter.
pub fn parse_driver_level(name: &str) -> Option<log::LevelFilter> {
    name.trim().parse().ok()
}
