//! Configuration schema structs

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nanoclaw_utils::paths;

/// Root configuration (`host.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub ipc: IpcConfig,
    pub things: ThingsConfig,
    pub store: StoreConfig,
}

/// IPC directory settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    /// Directory holding one IPC subdirectory per group
    pub base_dir: PathBuf,
    /// Fallback scan interval in milliseconds (default: 1000)
    pub poll_interval_ms: u64,
    /// Folder of the privileged group (default: "main")
    pub main_group_folder: String,
    /// Chat jid of the main group; registered at startup when set
    pub main_group_jid: Option<String>,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            base_dir: paths::default_ipc_base(),
            poll_interval_ms: 1000,
            main_group_folder: "main".into(),
            main_group_jid: None,
        }
    }
}

impl IpcConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Things CLI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThingsConfig {
    /// Path to the `things` binary
    pub binary: PathBuf,
    /// `.env` file holding `THINGS_AUTH_TOKEN`
    pub env_file: PathBuf,
    /// Per-invocation timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ThingsConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("/opt/homebrew/bin/things"),
            env_file: PathBuf::from(".env"),
            timeout_secs: 30,
        }
    }
}

impl ThingsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Task store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding tasks and registered groups
    pub tasks_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tasks_path: paths::default_task_store(),
        }
    }
}
