//! Path utilities for nanoclaw
//!
//! Two views of the IPC tree exist. The worker sees a single group's IPC
//! directory (mounted at `/workspace/ipc` inside the container). The host
//! sees every group under one base directory:
//!
//! ```text
//! <ipc_base>/
//!   errors/
//!   <group_folder>/
//!     messages/
//!     tasks/
//!     things-requests/
//!     things-responses/
//!     current_tasks.json
//! ```
//!
//! Host configuration lives in XDG directories.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Application identifier for XDG directories
const APP_NAME: &str = "nanoclaw";

/// IPC directory as mounted inside the worker container
pub const WORKER_IPC_DIR: &str = "/workspace/ipc";

/// Fire-and-forget chat messages
pub const MESSAGES_DIR: &str = "messages";

/// Fire-and-forget task and group records
pub const TASKS_DIR: &str = "tasks";

/// Things CLI requests awaiting the host
pub const THINGS_REQUESTS_DIR: &str = "things-requests";

/// Things CLI responses awaiting the worker
pub const THINGS_RESPONSES_DIR: &str = "things-responses";

/// Host-maintained task snapshot
pub const TASKS_SNAPSHOT_FILE: &str = "current_tasks.json";

/// Quarantine for unparseable IPC files (host side, under the base dir)
pub const ERRORS_DIR: &str = "errors";

/// Directory layout for one group's IPC namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpcLayout {
    root: PathBuf,
}

impl IpcLayout {
    /// Layout rooted at an explicit directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout for a group folder beneath the host's IPC base directory
    pub fn for_group(base: &Path, group_folder: &str) -> Self {
        Self::new(base.join(group_folder))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn messages_dir(&self) -> PathBuf {
        self.root.join(MESSAGES_DIR)
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join(TASKS_DIR)
    }

    pub fn requests_dir(&self) -> PathBuf {
        self.root.join(THINGS_REQUESTS_DIR)
    }

    pub fn responses_dir(&self) -> PathBuf {
        self.root.join(THINGS_RESPONSES_DIR)
    }

    /// Path of the response file correlated with `request_id`
    pub fn response_file(&self, request_id: &str) -> PathBuf {
        self.responses_dir().join(format!("{}.json", request_id))
    }

    pub fn tasks_snapshot(&self) -> PathBuf {
        self.root.join(TASKS_SNAPSHOT_FILE)
    }
}

impl Default for IpcLayout {
    fn default() -> Self {
        Self::new(WORKER_IPC_DIR)
    }
}

/// Quarantine directory for unparseable IPC files
pub fn errors_dir(ipc_base: &Path) -> PathBuf {
    ipc_base.join(ERRORS_DIR)
}

/// Get project directories
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Get the configuration directory
///
/// Location: `$XDG_CONFIG_HOME/nanoclaw` or `~/.config/nanoclaw`
pub fn config_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(fallback_config_dir)
}

/// Get the host configuration file path
///
/// Location: `$XDG_CONFIG_HOME/nanoclaw/host.toml`
pub fn host_config_file() -> PathBuf {
    config_dir().join("host.toml")
}

/// Get the data directory (persistent task store)
///
/// Location: `$XDG_DATA_HOME/nanoclaw` or `~/.local/share/nanoclaw`
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(fallback_data_dir)
}

/// Get the state directory
///
/// Location: `$XDG_STATE_HOME/nanoclaw` or `~/.local/state/nanoclaw`
pub fn state_dir() -> PathBuf {
    project_dirs()
        .and_then(|p| p.state_dir().map(|d| d.to_path_buf()))
        .unwrap_or_else(fallback_state_dir)
}

/// Get the log directory
///
/// Location: `$XDG_STATE_HOME/nanoclaw/log`
pub fn log_dir() -> PathBuf {
    state_dir().join("log")
}

/// Default host-side IPC base directory
///
/// Location: `$XDG_DATA_HOME/nanoclaw/ipc`
pub fn default_ipc_base() -> PathBuf {
    data_dir().join("ipc")
}

/// Default task store file
///
/// Location: `$XDG_DATA_HOME/nanoclaw/tasks.json`
pub fn default_task_store() -> PathBuf {
    data_dir().join("tasks.json")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

// Fallback implementations when ProjectDirs is unavailable

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

fn fallback_config_dir() -> PathBuf {
    home_dir().join(".config").join(APP_NAME)
}

fn fallback_state_dir() -> PathBuf {
    home_dir().join(".local").join("state").join(APP_NAME)
}

fn fallback_data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join(APP_NAME)
}
