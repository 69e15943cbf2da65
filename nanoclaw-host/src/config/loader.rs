//! Configuration loader

use std::path::Path;

use nanoclaw_utils::{paths, NanoclawError, Result};

use super::HostConfig;

/// Shortest accepted fallback scan interval
const MIN_POLL_INTERVAL_MS: u64 = 50;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<HostConfig> {
        let path = paths::host_config_file();
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            Ok(HostConfig::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<HostConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| NanoclawError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parse configuration from string
    pub fn parse(content: &str, path: &Path) -> Result<HostConfig> {
        toml::from_str(content).map_err(|e| NanoclawError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate configuration
    pub fn validate(config: &HostConfig) -> Result<()> {
        if config.ipc.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(NanoclawError::config(format!(
                "ipc.poll_interval_ms must be at least {}",
                MIN_POLL_INTERVAL_MS
            )));
        }

        if config.things.timeout_secs < 1 {
            return Err(NanoclawError::config("things.timeout_secs must be at least 1"));
        }

        if let Some(jid) = &config.ipc.main_group_jid {
            if jid.trim().is_empty() {
                return Err(NanoclawError::config("ipc.main_group_jid must not be empty when set"));
            }
        }

        let main = config.ipc.main_group_folder.trim();
        if main.is_empty() {
            return Err(NanoclawError::config("ipc.main_group_folder must not be empty"));
        }
        if main.contains('/') || main == "." || main == ".." {
            return Err(NanoclawError::config(
                "ipc.main_group_folder must be a plain folder name",
            ));
        }

        Ok(())
    }

    /// Load (from `path` if given) and validate
    pub fn load_and_validate(path: Option<&Path>) -> Result<HostConfig> {
        let config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load()?,
        };
        Self::validate(&config)?;
        Ok(config)
    }
}
