//! Things CLI executor
//!
//! Runs `<binary> <command> <args...>` for allow-listed commands only. The
//! auth token is read from the env file on every call so rotating it does
//! not need a restart.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use nanoclaw_protocol::{is_allowed_command, ThingsRequest, ThingsResponse};
use nanoclaw_utils::NanoclawError;

use crate::config::ThingsConfig;
use crate::env_file::read_env_file;

/// Variable the Things CLI reads its auth token from
pub const AUTH_TOKEN_VAR: &str = "THINGS_AUTH_TOKEN";

/// Why a Things invocation produced no output
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Unknown Things command: {0}")]
    UnknownCommand(String),

    #[error("Failed to run {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        source: std::io::Error,
    },

    #[error("Things command timed out after {}", describe_timeout(.0))]
    TimedOut(Duration),

    /// Non-zero exit; carries stderr or the exit status
    #[error("{0}")]
    Failed(String),

    #[error("Failed to read env file: {0}")]
    Env(#[from] NanoclawError),
}

/// Whole seconds when exact, milliseconds otherwise
fn describe_timeout(timeout: &Duration) -> String {
    if timeout.subsec_millis() == 0 {
        format!("{} seconds", timeout.as_secs())
    } else {
        format!("{} ms", timeout.as_millis())
    }
}

/// Executes Things CLI commands on behalf of workers
#[derive(Debug, Clone)]
pub struct ThingsExecutor {
    binary: PathBuf,
    env_file: PathBuf,
    timeout: Duration,
}

impl ThingsExecutor {
    pub fn new(binary: impl Into<PathBuf>, env_file: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            env_file: env_file.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ThingsConfig) -> Self {
        Self::new(&config.binary, &config.env_file, config.timeout())
    }

    /// Run one command and return its stdout
    pub async fn execute(&self, command: &str, args: &[String]) -> Result<String, ExecError> {
        if !is_allowed_command(command) {
            return Err(ExecError::UnknownCommand(command.to_string()));
        }

        let env = read_env_file(&self.env_file, &[AUTH_TOKEN_VAR])?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(token) = env.get(AUTH_TOKEN_VAR) {
            cmd.env(AUTH_TOKEN_VAR, token);
        }

        debug!(command, args = ?args, "Running Things CLI");

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| ExecError::Spawn {
                binary: self.binary.clone(),
                source: e,
            })?,
            Err(_) => return Err(ExecError::TimedOut(self.timeout)),
        };

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            Err(ExecError::Failed(format!("Things CLI exited with {}", output.status)))
        } else {
            Err(ExecError::Failed(stderr))
        }
    }

    /// Answer a request; never fails, errors become the response's `error`
    pub async fn respond(&self, request: &ThingsRequest) -> ThingsResponse {
        match self.execute(&request.command, &request.cli_args).await {
            Ok(output) => ThingsResponse::success(output),
            Err(e) => {
                warn!(
                    request_id = %request.request_id,
                    group = %request.group_folder,
                    command = %request.command,
                    error = %e,
                    "Things command failed"
                );
                ThingsResponse::failure(e.to_string())
            }
        }
    }
}
