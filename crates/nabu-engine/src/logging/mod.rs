//! Logger setup for binaries.
//!
//! Library crates only emit through the `log` facade; whoever owns `main`
//! calls [`init_logging`] once to choose the backend and filter.

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
