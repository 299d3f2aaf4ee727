//! Shared utilities for the governance workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
