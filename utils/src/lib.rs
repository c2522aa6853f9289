//! Shared utilities for the overlay services.

pub mod logging;

pub use logging::{init_logging, LogFormat, ParseLogFormatError};
