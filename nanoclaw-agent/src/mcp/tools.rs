//! MCP tool definitions for nanoclaw
//!
//! Defines the tools exposed to the agent through the MCP protocol.

use nanoclaw_protocol::{ContextMode, ScheduleType, SearchStatus, ThingsView};

use super::protocol::Tool;

const SCHEDULE_TASK_DESCRIPTION: &str = r#"Schedule a recurring or one-time task. The task will run as a full agent with access to all tools.

CONTEXT MODE - Choose based on task type:
• "group": Task runs in the group's conversation context, with access to chat history. Use for tasks that need context about ongoing discussions, user preferences, or recent interactions.
• "isolated": Task runs in a fresh session with no conversation history. Include all necessary context in the prompt itself.

If unsure which mode to use, ask the user. Examples:
- "Remind me about our discussion" → group (needs conversation context)
- "Check the weather every morning" → isolated (self-contained task)
- "Follow up on my request" → group (needs to know what was requested)
- "Generate a daily report" → isolated (just needs instructions in prompt)

MESSAGING BEHAVIOR - The task agent's output is sent to the user or group. It can also use send_message for immediate delivery, or wrap output in <internal> tags to suppress it. Say in the prompt whether the agent should always send a message, only send one when there is something to report, or never send one.

SCHEDULE VALUE FORMAT (all times are LOCAL timezone):
• cron: Standard cron expression (e.g., "*/5 * * * *" for every 5 minutes, "0 9 * * *" for daily at 9am LOCAL time)
• interval: Milliseconds between runs (e.g., "300000" for 5 minutes, "3600000" for 1 hour)
• once: Local time WITHOUT "Z" suffix (e.g., "2026-02-01T15:30:00"). Do NOT use UTC/Z suffix."#;

fn names<T, const N: usize>(values: [T; N], as_str: fn(&T) -> &'static str) -> Vec<&'static str> {
    values.iter().map(as_str).collect()
}

fn task_id_schema(verb: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "task_id": {
                "type": "string",
                "description": format!("The task ID to {}", verb)
            }
        },
        "required": ["task_id"]
    })
}

/// Get all tool definitions for the nanoclaw MCP server
pub fn get_tool_definitions() -> Vec<Tool> {
    let views = names(ThingsView::ALL, ThingsView::as_str);
    let statuses = names(SearchStatus::ALL, SearchStatus::as_str);
    let schedule_types = names(ScheduleType::ALL, ScheduleType::as_str);
    let context_modes = names([ContextMode::Group, ContextMode::Isolated], ContextMode::as_str);

    vec![
        Tool {
            name: "send_message".into(),
            description: "Send a message to the user or group immediately while you're still running. Use this for progress updates or to send multiple messages. You can call this multiple times. When running as a scheduled task your final output is NOT sent to the user, so use this tool if you need to communicate with the user or group.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The message text to send"
                    },
                    "sender": {
                        "type": "string",
                        "description": "Your role/identity name (e.g. \"Researcher\"). When set, messages appear from a dedicated bot in Telegram."
                    }
                },
                "required": ["text"]
            }),
        },
        Tool {
            name: "schedule_task".into(),
            description: SCHEDULE_TASK_DESCRIPTION.into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "What the agent should do when the task runs. For isolated mode, include all necessary context here."
                    },
                    "schedule_type": {
                        "type": "string",
                        "enum": schedule_types,
                        "description": "cron=recurring at specific times, interval=recurring every N ms, once=run once at specific time"
                    },
                    "schedule_value": {
                        "type": "string",
                        "description": "cron: \"*/5 * * * *\" | interval: milliseconds like \"300000\" | once: local timestamp like \"2026-02-01T15:30:00\" (no Z suffix!)"
                    },
                    "context_mode": {
                        "type": "string",
                        "enum": context_modes,
                        "default": "group",
                        "description": "group=runs with chat history and memory, isolated=fresh session (include context in prompt)"
                    },
                    "target_group_jid": {
                        "type": "string",
                        "description": "(Main group only) JID of the group to schedule the task for. Defaults to the current group."
                    }
                },
                "required": ["prompt", "schedule_type", "schedule_value"]
            }),
        },
        Tool {
            name: "list_tasks".into(),
            description: "List all scheduled tasks. From main: shows all tasks. From other groups: shows only that group's tasks.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        Tool {
            name: "pause_task".into(),
            description: "Pause a scheduled task. It will not run until resumed.".into(),
            input_schema: task_id_schema("pause"),
        },
        Tool {
            name: "resume_task".into(),
            description: "Resume a paused task.".into(),
            input_schema: task_id_schema("resume"),
        },
        Tool {
            name: "cancel_task".into(),
            description: "Cancel and delete a scheduled task.".into(),
            input_schema: task_id_schema("cancel"),
        },
        Tool {
            name: "register_group".into(),
            description: "Register a new WhatsApp group so the agent can respond to messages there. Main group only.\n\nUse available_groups.json to find the JID for a group. The folder name should be lowercase with hyphens (e.g., \"family-chat\").".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "jid": {
                        "type": "string",
                        "description": "The WhatsApp JID (e.g., \"120363336345536173@g.us\")"
                    },
                    "name": {
                        "type": "string",
                        "description": "Display name for the group"
                    },
                    "folder": {
                        "type": "string",
                        "description": "Folder name for group files (lowercase, hyphens, e.g., \"family-chat\")"
                    },
                    "trigger": {
                        "type": "string",
                        "description": "Trigger word (e.g., \"@Andy\")"
                    }
                },
                "required": ["jid", "name", "folder", "trigger"]
            }),
        },
        Tool {
            name: "things_list".into(),
            description: format!(
                "List todos from Things 3. Views: {}. Returns JSON with UUID, title, project, area, status, deadline, notes.",
                views.join(", ")
            ),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "view": {
                        "type": "string",
                        "enum": views,
                        "default": "today",
                        "description": "Which Things view to list"
                    },
                    "project": {
                        "type": "string",
                        "description": "Filter by project name or ID"
                    },
                    "area": {
                        "type": "string",
                        "description": "Filter by area name or ID"
                    },
                    "tag": {
                        "type": "string",
                        "description": "Filter by tag"
                    },
                    "search": {
                        "type": "string",
                        "description": "Case-insensitive substring match on title or notes"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Max results (default: 50)"
                    },
                    "sort": {
                        "type": "string",
                        "description": "Sort fields, e.g. \"-deadline,title\""
                    }
                }
            }),
        },
        Tool {
            name: "things_search".into(),
            description: "Search todos in Things 3 by keyword. Searches title and notes. Returns JSON with UUID, title, project, area, status, deadline.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query (case-insensitive substring match)"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Max results (default: 50)"
                    },
                    "status": {
                        "type": "string",
                        "enum": statuses,
                        "description": "Filter by status (default: incomplete)"
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "things_add".into(),
            description: "Add a new todo to Things 3.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Todo title" },
                    "notes": { "type": "string", "description": "Notes for the todo" },
                    "deadline": { "type": "string", "description": "Deadline date (YYYY-MM-DD)" },
                    "list": { "type": "string", "description": "Project or area name to add to" },
                    "tags": { "type": "string", "description": "Comma-separated tag names, e.g. \"work,urgent\"" },
                    "when": {
                        "type": "string",
                        "description": "When to schedule: today, tomorrow, evening, anytime, someday, or a date/datetime string"
                    }
                },
                "required": ["title"]
            }),
        },
        Tool {
            name: "things_update".into(),
            description: "Update an existing todo in Things 3. Use to rename, reschedule, complete, cancel, or move a todo. Requires THINGS_AUTH_TOKEN in .env.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "Todo UUID (from things_list or things_search)" },
                    "title": { "type": "string", "description": "New title for the todo" },
                    "notes": { "type": "string", "description": "Replace notes with this text" },
                    "append_notes": { "type": "string", "description": "Append text to existing notes" },
                    "deadline": { "type": "string", "description": "New deadline date (YYYY-MM-DD)" },
                    "list": { "type": "string", "description": "Move to this project or area name" },
                    "tags": { "type": "string", "description": "Replace all tags with this comma-separated list" },
                    "add_tags": { "type": "string", "description": "Add these comma-separated tags without removing existing ones" },
                    "when": {
                        "type": "string",
                        "description": "Reschedule: today, tomorrow, evening, someday, or a date/datetime string"
                    },
                    "completed": { "type": "boolean", "description": "Mark as completed (true) or incomplete (false)" },
                    "canceled": { "type": "boolean", "description": "Mark as canceled (true) or incomplete (false)" }
                },
                "required": ["id"]
            }),
        },
        Tool {
            name: "things_delete".into(),
            description: "Delete (trash) a todo in Things 3 by UUID.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Todo UUID to delete (from things_list or things_search)"
                    }
                },
                "required": ["id"]
            }),
        },
    ]
}

/// Check if a tool name is known
pub fn is_known_tool(name: &str) -> bool {
    matches!(
        name,
        "send_message"
            | "schedule_task"
            | "list_tasks"
            | "pause_task"
            | "resume_task"
            | "cancel_task"
            | "register_group"
            | "things_list"
            | "things_search"
            | "things_add"
            | "things_update"
            | "things_delete"
    )
}
