//! Command-line arguments for the host daemon

use clap::Parser;
use std::path::PathBuf;

use nanoclaw_host::HostConfig;

/// nanoclaw-host - processes worker IPC and runs Things commands
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file (defaults to host.toml in the user config directory)
    #[arg(long, short = 'c', env = "NANOCLAW_CONFIG")]
    pub config: Option<PathBuf>,

    /// IPC base directory, overriding `ipc.base_dir`
    #[arg(long, env = "NANOCLAW_IPC_BASE")]
    pub ipc_dir: Option<PathBuf>,

    /// Things CLI binary, overriding `things.binary`
    #[arg(long, env = "NANOCLAW_THINGS_BIN")]
    pub things_bin: Option<PathBuf>,

    /// Also write logs to host.log in the state directory
    #[arg(long, default_value_t = false)]
    pub log_file: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut HostConfig) {
        if let Some(dir) = &self.ipc_dir {
            config.ipc.base_dir = dir.clone();
        }
        if let Some(bin) = &self.things_bin {
            config.things.binary = bin.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["nanoclaw-host"]);
        assert!(!args.log_file);
        assert!(args.ipc_dir.is_none());
        assert!(args.things_bin.is_none());
    }

    #[test]
    fn test_overrides_applied() {
        let args = Args::parse_from([
            "nanoclaw-host",
            "--ipc-dir",
            "/srv/ipc",
            "--things-bin",
            "/usr/local/bin/things",
            "--log-file",
        ]);
        let mut config = HostConfig::default();
        args.apply(&mut config);

        assert!(args.log_file);
        assert_eq!(config.ipc.base_dir, PathBuf::from("/srv/ipc"));
        assert_eq!(config.things.binary, PathBuf::from("/usr/local/bin/things"));
        assert_eq!(config.ipc.main_group_folder, "main");
    }

    #[test]
    fn test_config_short_flag() {
        let args = Args::parse_from(["nanoclaw-host", "-c", "/etc/nanoclaw.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/etc/nanoclaw.toml")));
    }
}
