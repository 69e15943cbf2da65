//! Tool handlers
//!
//! Each handler validates its arguments, writes at most one IPC file and
//! turns the outcome into a `ToolResult`. Only malformed arguments surface
//! as `McpError`; everything else, including IPC write failures, is a tool
//! error the agent can read.

use std::fs;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use nanoclaw_protocol::{
    now_iso, visible_to, ChatMessage, ContextMode, MessageIpc, RegisterGroup, Schedule,
    ScheduleTask, ScheduleType, TaskControl, TaskIpc, TaskSnapshot,
};

use crate::channel::IpcChannel;
use crate::context::AgentContext;
use crate::things::{AddArgs, DeleteArgs, ListArgs, SearchArgs, ThingsCall, UpdateArgs};

use super::error::McpError;
use super::protocol::ToolResult;

#[derive(Debug, Deserialize)]
struct SendMessageArgs {
    text: String,
    sender: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScheduleTaskArgs {
    prompt: String,
    schedule_type: ScheduleType,
    schedule_value: String,
    #[serde(default)]
    context_mode: ContextMode,
    target_group_jid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskIdArgs {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct RegisterGroupArgs {
    jid: String,
    name: String,
    folder: String,
    trigger: String,
}

/// Parse tool arguments; a missing `arguments` object counts as empty
fn parse_args<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, McpError> {
    let arguments = if arguments.is_null() {
        serde_json::json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn check_limit(limit: Option<u64>) -> Result<(), McpError> {
    match limit {
        Some(0) => Err(McpError::InvalidParams(
            "limit must be a positive integer".into(),
        )),
        _ => Ok(()),
    }
}

/// Which control record a task id tool writes
#[derive(Debug, Clone, Copy)]
enum TaskAction {
    Pause,
    Resume,
    Cancel,
}

impl TaskAction {
    fn record(self, control: TaskControl) -> TaskIpc {
        match self {
            Self::Pause => TaskIpc::PauseTask(control),
            Self::Resume => TaskIpc::ResumeTask(control),
            Self::Cancel => TaskIpc::CancelTask(control),
        }
    }

    fn confirmation(self) -> &'static str {
        match self {
            Self::Pause => "pause requested",
            Self::Resume => "resume requested",
            Self::Cancel => "cancellation requested",
        }
    }
}

/// Tool surface bound to one worker's context
#[derive(Debug, Clone)]
pub struct ToolHandlers {
    ctx: Arc<AgentContext>,
    channel: IpcChannel,
}

impl ToolHandlers {
    pub fn new(ctx: Arc<AgentContext>, channel: IpcChannel) -> Self {
        Self { ctx, channel }
    }

    /// Handlers using the default channel settings for `ctx`
    pub fn for_context(ctx: AgentContext) -> Self {
        let channel = IpcChannel::new(ctx.layout(), ctx.group_folder.clone());
        Self::new(Arc::new(ctx), channel)
    }

    pub fn context(&self) -> &AgentContext {
        &self.ctx
    }

    /// Dispatch a tool call by name
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> Result<ToolResult, McpError> {
        debug!(tool = name, "Tool call");
        match name {
            "send_message" => self.send_message(parse_args(arguments)?),
            "schedule_task" => self.schedule_task(parse_args(arguments)?),
            "list_tasks" => Ok(self.list_tasks()),
            "pause_task" => self.control_task(TaskAction::Pause, parse_args(arguments)?),
            "resume_task" => self.control_task(TaskAction::Resume, parse_args(arguments)?),
            "cancel_task" => self.control_task(TaskAction::Cancel, parse_args(arguments)?),
            "register_group" => self.register_group(parse_args(arguments)?),
            "things_list" => {
                let args: ListArgs = parse_args(arguments)?;
                check_limit(args.limit)?;
                Ok(self.things(&args).await)
            }
            "things_search" => {
                let args: SearchArgs = parse_args(arguments)?;
                check_limit(args.limit)?;
                Ok(self.things(&args).await)
            }
            "things_add" => Ok(self.things(&parse_args::<AddArgs>(arguments)?).await),
            "things_update" => Ok(self.things(&parse_args::<UpdateArgs>(arguments)?).await),
            "things_delete" => Ok(self.things(&parse_args::<DeleteArgs>(arguments)?).await),
            _ => Err(McpError::UnknownTool(name.into())),
        }
    }

    fn send_message(&self, args: SendMessageArgs) -> Result<ToolResult, McpError> {
        let record = MessageIpc::Message(ChatMessage {
            chat_jid: self.ctx.chat_jid.clone(),
            text: args.text,
            sender: args.sender.filter(|s| !s.is_empty()),
            group_folder: self.ctx.group_folder.clone(),
            timestamp: now_iso(),
        });

        Ok(match self.channel.send_message(&record) {
            Ok(_) => ToolResult::text("Message sent."),
            Err(e) => write_failed(e),
        })
    }

    fn schedule_task(&self, args: ScheduleTaskArgs) -> Result<ToolResult, McpError> {
        if let Err(e) = Schedule::parse(args.schedule_type, &args.schedule_value) {
            return Ok(ToolResult::error(e.to_string()));
        }

        // Only main may schedule for another chat
        let target_jid = match args.target_group_jid.filter(|j| !j.is_empty()) {
            Some(jid) if self.ctx.is_main => jid,
            _ => self.ctx.chat_jid.clone(),
        };

        let record = TaskIpc::ScheduleTask(ScheduleTask {
            prompt: args.prompt,
            schedule_type: args.schedule_type,
            schedule_value: args.schedule_value.clone(),
            context_mode: args.context_mode,
            target_jid,
            created_by: self.ctx.group_folder.clone(),
            is_main: self.ctx.is_main,
            timestamp: now_iso(),
        });

        Ok(match self.channel.send_task(&record) {
            Ok(filename) => ToolResult::text(format!(
                "Task scheduled ({}): {} - {}",
                filename, args.schedule_type, args.schedule_value
            )),
            Err(e) => write_failed(e),
        })
    }

    fn list_tasks(&self) -> ToolResult {
        let path = self.channel.layout().tasks_snapshot();
        if !path.exists() {
            return ToolResult::text("No scheduled tasks found.");
        }

        let tasks: Vec<TaskSnapshot> = match fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(tasks) => tasks,
            Err(e) => return ToolResult::text(format!("Error reading tasks: {}", e)),
        };

        let lines: Vec<String> = visible_to(&tasks, &self.ctx.group_folder, self.ctx.is_main)
            .map(TaskSnapshot::summary_line)
            .collect();

        if lines.is_empty() {
            ToolResult::text("No scheduled tasks found.")
        } else {
            ToolResult::text(format!("Scheduled tasks:\n{}", lines.join("\n")))
        }
    }

    fn control_task(&self, action: TaskAction, args: TaskIdArgs) -> Result<ToolResult, McpError> {
        let record = action.record(TaskControl {
            task_id: args.task_id.clone(),
            group_folder: self.ctx.group_folder.clone(),
            is_main: self.ctx.is_main,
            timestamp: now_iso(),
        });

        Ok(match self.channel.send_task(&record) {
            Ok(_) => ToolResult::text(format!("Task {} {}.", args.task_id, action.confirmation())),
            Err(e) => write_failed(e),
        })
    }

    fn register_group(&self, args: RegisterGroupArgs) -> Result<ToolResult, McpError> {
        if !self.ctx.is_main {
            return Ok(ToolResult::error("Only the main group can register new groups."));
        }

        let name = args.name.clone();
        let record = TaskIpc::RegisterGroup(RegisterGroup {
            jid: args.jid,
            name: args.name,
            folder: args.folder,
            trigger: args.trigger,
            timestamp: now_iso(),
        });

        Ok(match self.channel.send_task(&record) {
            Ok(_) => ToolResult::text(format!(
                "Group \"{}\" registered. It will start receiving messages immediately.",
                name
            )),
            Err(e) => write_failed(e),
        })
    }

    async fn things(&self, call: &impl ThingsCall) -> ToolResult {
        let command = call.command();
        match self.channel.things_request(&command, call.cli_args()).await {
            Ok(outcome) if outcome.is_error() => ToolResult::error(outcome.message()),
            Ok(outcome) => ToolResult::text(outcome.message()),
            Err(e) => write_failed(e),
        }
    }
}

fn write_failed(e: nanoclaw_utils::NanoclawError) -> ToolResult {
    warn!(error = %e, "IPC write failed");
    ToolResult::error(format!("Failed to write IPC file: {}", e))
}
