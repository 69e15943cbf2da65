//! nanoclaw-utils: Common utilities shared across nanoclaw crates
//!
//! This crate provides:
//! - Unified error types ([`NanoclawError`], [`Result`])
//! - Logging infrastructure ([`init_logging`], [`LogConfig`])
//! - IPC directory layout and XDG paths ([`paths`] module)
//! - Atomic JSON writes with unique file names ([`atomic`] module)
//! - Consuming IPC directories ([`inbox`] module)

pub mod atomic;
pub mod error;
pub mod inbox;
pub mod logging;
pub mod paths;

// Re-export main types at crate root for convenience
pub use atomic::{unique_stem, write_ipc_file, write_json_atomic};
pub use error::{NanoclawError, Result};
pub use inbox::JsonInbox;
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogOutput};
pub use paths::IpcLayout;
