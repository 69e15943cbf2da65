//! JSON-file task store
//!
//! Holds scheduled tasks and registered groups in one file, rewritten
//! atomically after every change. Running due tasks is not this module's
//! job; it only keeps the records the scheduler reads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nanoclaw_protocol::{ContextMode, ScheduleType, TaskSnapshot, TaskStatus};
use nanoclaw_utils::atomic::{random_token, timestamp_millis};
use nanoclaw_utils::inbox::read_json;
use nanoclaw_utils::{write_json_atomic, Result};

use crate::processor::TaskScheduler;

/// A chat the agent responds in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredGroup {
    pub name: String,
    pub folder: String,
    pub trigger: String,
    pub added_at: String,
}

/// A scheduled task as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTask {
    pub id: String,
    pub group_folder: String,
    pub chat_jid: String,
    pub prompt: String,
    pub schedule_type: ScheduleType,
    pub schedule_value: String,
    #[serde(default)]
    pub context_mode: ContextMode,
    pub status: TaskStatus,
    #[serde(default)]
    pub next_run: Option<String>,
    pub created_at: String,
}

impl StoredTask {
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id.clone(),
            prompt: self.prompt.clone(),
            schedule_type: self.schedule_type,
            schedule_value: self.schedule_value.clone(),
            status: self.status,
            next_run: self.next_run.clone(),
            group_folder: self.group_folder.clone(),
        }
    }
}

/// `task-<millis>-<token>`
pub fn new_task_id() -> String {
    format!("task-{}-{}", timestamp_millis(), random_token(6))
}

/// ISO-8601 UTC with milliseconds, as stored in `next_run`
pub fn to_iso(at: DateTime<Local>) -> String {
    at.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    tasks: Vec<StoredTask>,
    /// Keyed by chat jid
    #[serde(default)]
    groups: BTreeMap<String, RegisteredGroup>,
}

/// File-backed implementation of [`TaskScheduler`]
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    state: StoreState,
}

impl TaskStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            read_json(&path)?
        } else {
            StoreState::default()
        };
        info!(
            path = %path.display(),
            tasks = state.tasks.len(),
            groups = state.groups.len(),
            "Task store opened"
        );
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[StoredTask] {
        &self.state.tasks
    }

    fn persist(&self) -> Result<()> {
        write_json_atomic(&self.path, &self.state)?;
        debug!(path = %self.path.display(), "Task store saved");
        Ok(())
    }
}

impl TaskScheduler for TaskStore {
    fn registered_groups(&self) -> &BTreeMap<String, RegisteredGroup> {
        &self.state.groups
    }

    fn register_group(&mut self, jid: &str, group: RegisteredGroup) -> Result<()> {
        self.state.groups.insert(jid.to_string(), group);
        self.persist()
    }

    fn create_task(&mut self, task: StoredTask) -> Result<()> {
        self.state.tasks.push(task);
        self.persist()
    }

    fn task(&self, id: &str) -> Option<&StoredTask> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<bool> {
        match self.state.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.status = status;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_task(&mut self, id: &str) -> Result<bool> {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.id != id);
        if self.state.tasks.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn snapshot(&self) -> Vec<TaskSnapshot> {
        self.state.tasks.iter().map(StoredTask::snapshot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn task(id: &str, folder: &str) -> StoredTask {
        StoredTask {
            id: id.into(),
            group_folder: folder.into(),
            chat_jid: format!("{}@g.us", folder),
            prompt: "water the plants".into(),
            schedule_type: ScheduleType::Interval,
            schedule_value: "86400000".into(),
            context_mode: ContextMode::Isolated,
            status: TaskStatus::Active,
            next_run: None,
            created_at: "2026-02-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn test_open_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        assert!(store.tasks().is_empty());
        assert!(store.registered_groups().is_empty());
    }

    #[test]
    fn test_changes_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = TaskStore::open(&path).unwrap();
        store.create_task(task("t1", "dev")).unwrap();
        store.create_task(task("t2", "dev")).unwrap();
        assert!(store.set_status("t1", TaskStatus::Paused).unwrap());
        assert!(store.delete_task("t2").unwrap());
        store
            .register_group(
                "dev@g.us",
                RegisteredGroup {
                    name: "Dev".into(),
                    folder: "dev".into(),
                    trigger: "@Andy".into(),
                    added_at: "t".into(),
                },
            )
            .unwrap();

        let reopened = TaskStore::open(&path).unwrap();
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.task("t1").unwrap().status, TaskStatus::Paused);
        assert_eq!(reopened.registered_groups()["dev@g.us"].folder, "dev");
    }

    #[test]
    fn test_missing_task_operations() {
        let dir = TempDir::new().unwrap();
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        assert!(!store.set_status("nope", TaskStatus::Paused).unwrap());
        assert!(!store.delete_task("nope").unwrap());
        assert!(!dir.path().join("tasks.json").exists());
    }

    #[test]
    fn test_snapshot_rows() {
        let dir = TempDir::new().unwrap();
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        store.create_task(task("t1", "family")).unwrap();

        let rows = store.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group_folder, "family");
        assert_eq!(rows[0].schedule_type, ScheduleType::Interval);
    }

    #[test]
    fn test_task_id_shape() {
        let id = new_task_id();
        let parts: Vec<_> = id.splitn(3, '-').collect();
        assert_eq!(parts[0], "task");
        assert!(parts[1].parse::<u64>().is_ok());
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_corrupt_store_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{").unwrap();
        assert!(TaskStore::open(&path).is_err());
    }
}
