//! Fire-and-forget IPC records
//!
//! Messages go to `messages/`, everything else to `tasks/`. Both are
//! internally tagged by `type`. Field names follow the JSON the host and
//! worker have always exchanged, which mixes camelCase attribution fields
//! with snake_case schedule fields.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{ContextMode, ScheduleType};

/// Current time as an ISO-8601 UTC string with millisecond precision
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Records written to `messages/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageIpc {
    Message(ChatMessage),
}

/// Text to deliver to a chat while the agent is still running
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub chat_jid: String,
    pub text: String,
    /// Role name shown as the sender, when the transport supports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub group_folder: String,
    pub timestamp: String,
}

/// Records written to `tasks/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskIpc {
    ScheduleTask(ScheduleTask),
    PauseTask(TaskControl),
    ResumeTask(TaskControl),
    CancelTask(TaskControl),
    RegisterGroup(RegisterGroup),
    RefreshGroups(RefreshGroups),
}

impl TaskIpc {
    /// Wire name of the record type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ScheduleTask(_) => "schedule_task",
            Self::PauseTask(_) => "pause_task",
            Self::ResumeTask(_) => "resume_task",
            Self::CancelTask(_) => "cancel_task",
            Self::RegisterGroup(_) => "register_group",
            Self::RefreshGroups(_) => "refresh_groups",
        }
    }
}

/// Create a scheduled task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTask {
    pub prompt: String,
    pub schedule_type: ScheduleType,
    pub schedule_value: String,
    #[serde(default)]
    pub context_mode: ContextMode,
    #[serde(rename = "targetJid")]
    pub target_jid: String,
    #[serde(rename = "createdBy")]
    pub created_by: String,
    #[serde(rename = "isMain", default)]
    pub is_main: bool,
    pub timestamp: String,
}

/// Pause, resume or cancel an existing task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskControl {
    pub task_id: String,
    pub group_folder: String,
    #[serde(default)]
    pub is_main: bool,
    pub timestamp: String,
}

/// Register a chat so the agent responds there (main only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterGroup {
    pub jid: String,
    pub name: String,
    pub folder: String,
    pub trigger: String,
    pub timestamp: String,
}

/// Ask the host to re-read group metadata from the chat transport (main only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshGroups {
    pub timestamp: String,
}
