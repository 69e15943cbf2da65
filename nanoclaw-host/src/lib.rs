//! nanoclaw-host: the privileged side of the IPC boundary
//!
//! Reads what sandboxed workers drop into their IPC directories, decides
//! per source group whether each request is allowed, and applies it.

pub mod config;
pub mod env_file;
pub mod executor;
pub mod processor;
pub mod sink;
pub mod store;
pub mod watcher;

pub use config::{ConfigLoader, HostConfig};
pub use executor::{ExecError, ThingsExecutor};
pub use processor::{Applied, IpcProcessor, MessageSink, Rejected, TaskScheduler};
pub use sink::LogSink;
pub use store::{RegisteredGroup, StoredTask, TaskStore};
pub use watcher::{IpcScanner, IpcWatcher};
