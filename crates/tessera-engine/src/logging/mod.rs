//! Logger setup for binaries and tests.
//!
//! Library code only talks to the `log` facade; this module is where a binary
//! picks `env_logger` as the sink.

mod init;

pub use init::{LoggingConfig, init_logging};
