//! File-based channel from the worker to the host
//!
//! Messages and task records are fire-and-forget drops. Things requests are
//! request/response: the worker drops a request and polls for the matching
//! response file until a deadline.

use std::path::Path;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use nanoclaw_protocol::{now_iso, MessageIpc, TaskIpc, ThingsRequest, ThingsResponse};
use nanoclaw_utils::inbox::{read_json, remove_quietly};
use nanoclaw_utils::{unique_stem, write_ipc_file, write_json_atomic, IpcLayout, Result};

/// Polling parameters for request/response calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(200),
            timeout: Duration::from_secs(10),
        }
    }
}

/// How a Things request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThingsOutcome {
    /// The command ran; output may be empty
    Output(String),
    /// The host reported a failure
    RemoteError(String),
    /// No response before the deadline
    TimedOut(Duration),
}

impl ThingsOutcome {
    /// Text for the tool result
    pub fn message(&self) -> String {
        match self {
            Self::Output(text) if text.is_empty() => "(no output)".into(),
            Self::Output(text) => text.clone(),
            Self::RemoteError(error) => format!("Error: {}", error),
            Self::TimedOut(after) => format!(
                "Error: Things request timed out after {} seconds",
                after.as_secs()
            ),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Output(_))
    }
}

/// Writer/poller over one group's IPC directory
#[derive(Debug, Clone)]
pub struct IpcChannel {
    layout: IpcLayout,
    group_folder: String,
    config: ChannelConfig,
}

impl IpcChannel {
    pub fn new(layout: IpcLayout, group_folder: impl Into<String>) -> Self {
        Self {
            layout,
            group_folder: group_folder.into(),
            config: ChannelConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ChannelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn layout(&self) -> &IpcLayout {
        &self.layout
    }

    /// Drop a record into `messages/`, returning its file name
    pub fn send_message(&self, record: &MessageIpc) -> Result<String> {
        write_ipc_file(&self.layout.messages_dir(), record)
    }

    /// Drop a record into `tasks/`, returning its file name
    pub fn send_task(&self, record: &TaskIpc) -> Result<String> {
        let filename = write_ipc_file(&self.layout.tasks_dir(), record)?;
        debug!(kind = record.kind(), file = %filename, "Queued task record");
        Ok(filename)
    }

    /// Ask the host to run the Things CLI and wait for its answer
    ///
    /// Errors only when the request itself cannot be written.
    pub async fn things_request(&self, command: &str, cli_args: Vec<String>) -> Result<ThingsOutcome> {
        let request_id = unique_stem();
        let request = ThingsRequest {
            request_id: request_id.clone(),
            command: command.to_string(),
            cli_args,
            group_folder: self.group_folder.clone(),
            timestamp: now_iso(),
        };

        let request_path = self.layout.requests_dir().join(format!("{}.json", request_id));
        write_json_atomic(&request_path, &request)?;
        debug!(request_id = %request_id, command, "Things request written");

        let response_path = self.layout.response_file(&request_id);
        let deadline = Instant::now() + self.config.timeout;

        loop {
            if let Some(response) = try_read_response(&response_path) {
                remove_quietly(&response_path);
                return Ok(match response.into_outcome() {
                    Ok(output) => ThingsOutcome::Output(output),
                    Err(error) => ThingsOutcome::RemoteError(error),
                });
            }

            if Instant::now() >= deadline {
                warn!(request_id = %request_id, command, "Things request timed out");
                return Ok(ThingsOutcome::TimedOut(self.config.timeout));
            }
            sleep(self.config.poll_interval).await;
        }
    }
}

/// `None` while the response is missing or not yet parseable
fn try_read_response(path: &Path) -> Option<ThingsResponse> {
    if !path.exists() {
        return None;
    }
    match read_json(path) {
        Ok(response) => Some(response),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Response not readable yet");
            None
        }
    }
}
