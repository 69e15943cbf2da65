//! Task snapshot (`current_tasks.json`)
//!
//! Written by the host after every task mutation, read directly by the
//! worker's `list_tasks` tool without a round trip.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleType;

/// Lifecycle state of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Paused,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

/// One row of the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: String,
    pub prompt: String,
    pub schedule_type: ScheduleType,
    pub schedule_value: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub next_run: Option<String>,
    #[serde(rename = "groupFolder")]
    pub group_folder: String,
}

/// Characters of the prompt shown per listed task
const PROMPT_PREVIEW_CHARS: usize = 50;

impl TaskSnapshot {
    /// `- [id] prompt... (type: value) - status, next: when`
    pub fn summary_line(&self) -> String {
        let preview: String = self.prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
        format!(
            "- [{}] {}... ({}: {}) - {}, next: {}",
            self.id,
            preview,
            self.schedule_type,
            self.schedule_value,
            self.status.as_str(),
            self.next_run.as_deref().filter(|s| !s.is_empty()).unwrap_or("N/A"),
        )
    }
}

/// Rows visible to a group: main sees everything
pub fn visible_to<'a>(
    tasks: &'a [TaskSnapshot],
    group_folder: &'a str,
    is_main: bool,
) -> impl Iterator<Item = &'a TaskSnapshot> + 'a {
    tasks
        .iter()
        .filter(move |t| is_main || t.group_folder == group_folder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, group: &str) -> TaskSnapshot {
        TaskSnapshot {
            id: id.into(),
            prompt: "Send the daily weather summary for Lisbon".into(),
            schedule_type: ScheduleType::Cron,
            schedule_value: "0 9 * * *".into(),
            status: TaskStatus::Active,
            next_run: Some("2026-02-02T09:00:00.000Z".into()),
            group_folder: group.into(),
        }
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            task("task-1", "main").summary_line(),
            "- [task-1] Send the daily weather summary for Lisbon... (cron: 0 9 * * *) - active, next: 2026-02-02T09:00:00.000Z"
        );
    }

    #[test]
    fn test_summary_truncates_prompt() {
        let mut t = task("task-2", "main");
        t.prompt = "x".repeat(80);
        t.next_run = None;
        let line = t.summary_line();
        assert!(line.contains(&format!("{}...", "x".repeat(50))));
        assert!(!line.contains(&"x".repeat(51)));
        assert!(line.ends_with("next: N/A"));
    }

    #[test]
    fn test_summary_truncates_on_char_boundary() {
        let mut t = task("task-3", "main");
        t.prompt = "é".repeat(60);
        assert!(t.summary_line().contains(&"é".repeat(50)));
    }

    #[test]
    fn test_visibility() {
        let tasks = vec![task("a", "main"), task("b", "dev"), task("c", "family")];

        let ids: Vec<_> = visible_to(&tasks, "dev", false).map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);

        assert_eq!(visible_to(&tasks, "main", true).count(), 3);
    }

    #[test]
    fn test_snapshot_wire_format() {
        let value = serde_json::to_value(task("a", "dev")).unwrap();
        assert_eq!(value["groupFolder"], "dev");
        assert_eq!(value["schedule_type"], "cron");
        assert_eq!(value["status"], "active");
    }

    #[test]
    fn test_snapshot_accepts_null_next_run() {
        let json = r#"[{"id":"t","prompt":"p","schedule_type":"once","schedule_value":"2026-02-01T10:00:00","status":"completed","next_run":null,"groupFolder":"g"}]"#;
        let rows: Vec<TaskSnapshot> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].status, TaskStatus::Completed);
        assert!(rows[0].next_run.is_none());
    }
}
