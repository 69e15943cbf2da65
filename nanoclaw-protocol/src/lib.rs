//! nanoclaw-protocol: Shared IPC file definitions
//!
//! This crate defines every JSON record exchanged between the sandboxed
//! agent (worker) and the privileged host through the IPC directory, plus
//! the schedule grammar both sides validate against.

pub mod messages;
pub mod schedule;
pub mod snapshot;
pub mod things;

// Re-export main types at crate root
pub use messages::{
    now_iso, ChatMessage, MessageIpc, RefreshGroups, RegisterGroup, ScheduleTask, TaskControl,
    TaskIpc,
};
pub use schedule::{validate_schedule, ContextMode, Schedule, ScheduleError, ScheduleType};
pub use snapshot::{visible_to, TaskSnapshot, TaskStatus};
pub use things::{is_allowed_command, SearchStatus, ThingsRequest, ThingsResponse, ThingsView};
