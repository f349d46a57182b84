//! Logging utilities.
//!
//! This module centralizes logger initialization. Components log through the
//! `log` facade; `main` installs the `env_logger` backend once and keeps the
//! returned guard alive until shutdown. GPU driver messages arrive through the
//! same facade and are filtered per [`LoggingConfig::driver_level`].

mod init;

pub use init::{DRIVER_TARGETS, LoggingConfig, LoggingGuard, init_logging, parse_driver_level};
