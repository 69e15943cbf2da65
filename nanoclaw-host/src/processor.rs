//! Message and task IPC processing
//!
//! The group a record came from is the name of the directory it was found
//! in. Fields inside the record (`groupFolder`, `isMain`) are never trusted
//! for authorization; a worker can write anything into its own files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};

use nanoclaw_protocol::{
    now_iso, visible_to, MessageIpc, RegisterGroup, Schedule, ScheduleError, ScheduleTask,
    TaskControl, TaskIpc, TaskSnapshot, TaskStatus,
};
use nanoclaw_utils::inbox::quarantine;
use nanoclaw_utils::paths::{errors_dir, ERRORS_DIR};
use nanoclaw_utils::{write_json_atomic, IpcLayout, JsonInbox, NanoclawError, Result};

use crate::store::{new_task_id, to_iso, RegisteredGroup, StoredTask};

/// Task and group persistence the processor writes through
pub trait TaskScheduler {
    /// Registered groups keyed by chat jid
    fn registered_groups(&self) -> &BTreeMap<String, RegisteredGroup>;
    fn register_group(&mut self, jid: &str, group: RegisteredGroup) -> Result<()>;
    fn create_task(&mut self, task: StoredTask) -> Result<()>;
    fn task(&self, id: &str) -> Option<&StoredTask>;
    /// `false` when no such task exists
    fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<bool>;
    /// `false` when no such task exists
    fn delete_task(&mut self, id: &str) -> Result<bool>;
    fn snapshot(&self) -> Vec<TaskSnapshot>;
}

/// Outbound side of the chat transport
pub trait MessageSink {
    fn send_message(&self, chat_jid: &str, text: &str, sender: Option<&str>) -> Result<()>;
    /// Re-read group metadata from the transport
    fn refresh_groups(&self) -> Result<()>;
}

/// What a processed record did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    MessageSent,
    TaskCreated(String),
    TaskPaused(String),
    TaskResumed(String),
    TaskCancelled(String),
    GroupRegistered(String),
    GroupsRefreshed,
}

/// Why a well-formed record was dropped
#[derive(Debug, thiserror::Error)]
pub enum Rejected {
    #[error("group '{group}' is not allowed to {action}")]
    Unauthorized { group: String, action: &'static str },

    #[error("chat {0} is not a registered group")]
    UnregisteredTarget(String),

    #[error("task {0} not found")]
    UnknownTask(String),

    #[error("invalid group folder '{0}'")]
    InvalidFolder(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Store(#[from] NanoclawError),
}

/// Whether `folder` is usable as a single directory name
pub fn is_valid_folder(folder: &str) -> bool {
    !folder.is_empty()
        && folder != ERRORS_DIR
        && !folder.starts_with('.')
        && !folder.contains(|c: char| c == '/' || c == '\\')
}

/// Group folders currently present under `ipc_base`
pub fn group_folders(ipc_base: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(ipc_base) else {
        return Vec::new();
    };
    let mut folders: Vec<String> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| is_valid_folder(name))
        .collect();
    folders.sort();
    folders
}

/// Applies message and task records on behalf of their source group
pub struct IpcProcessor<S, M> {
    ipc_base: PathBuf,
    main_folder: String,
    scheduler: S,
    sink: M,
}

impl<S: TaskScheduler, M: MessageSink> IpcProcessor<S, M> {
    pub fn new(ipc_base: impl Into<PathBuf>, main_folder: impl Into<String>, scheduler: S, sink: M) -> Self {
        Self {
            ipc_base: ipc_base.into(),
            main_folder: main_folder.into(),
            scheduler,
            sink,
        }
    }

    pub fn ipc_base(&self) -> &Path {
        &self.ipc_base
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn sink(&self) -> &M {
        &self.sink
    }

    pub fn is_main(&self, folder: &str) -> bool {
        folder == self.main_folder
    }

    /// Register the main group under `jid` if it is not registered yet
    ///
    /// Returns whether a registration was written.
    pub fn seed_main_group(&mut self, jid: &str) -> Result<bool> {
        if self.scheduler.registered_groups().contains_key(jid) {
            return Ok(false);
        }
        self.scheduler.register_group(
            jid,
            RegisteredGroup {
                name: self.main_folder.clone(),
                folder: self.main_folder.clone(),
                trigger: String::new(),
                added_at: now_iso(),
            },
        )?;
        info!(jid, folder = %self.main_folder, "Main group registered");
        Ok(true)
    }

    /// Drain `messages/` and `tasks/` of one group
    ///
    /// Unparseable files go to the errors directory. Snapshots are
    /// rewritten once if any task record changed state.
    pub fn drain_group(&mut self, folder: &str) {
        let layout = IpcLayout::for_group(&self.ipc_base, folder);

        let messages = JsonInbox::new(layout.messages_dir());
        for path in self.pending(&messages) {
            if let Some(record) = self.take::<MessageIpc>(&messages, &path, folder) {
                if let Err(e) = self.process_message(folder, record) {
                    warn!(group = folder, error = %e, "Message dropped");
                }
            }
        }

        let tasks = JsonInbox::new(layout.tasks_dir());
        let mut changed = false;
        for path in self.pending(&tasks) {
            if let Some(record) = self.take::<TaskIpc>(&tasks, &path, folder) {
                let kind = record.kind();
                match self.process_task(folder, record) {
                    Ok(applied) => {
                        info!(group = folder, kind, ?applied, "Task IPC applied");
                        changed = true;
                    }
                    Err(e) => warn!(group = folder, kind, error = %e, "Task IPC rejected"),
                }
            }
        }

        if changed {
            if let Err(e) = self.write_snapshots() {
                warn!(error = %e, "Failed to write task snapshots");
            }
        }
    }

    fn pending(&self, inbox: &JsonInbox) -> Vec<PathBuf> {
        inbox.pending().unwrap_or_else(|e| {
            warn!(dir = %inbox.dir().display(), error = %e, "Cannot list IPC directory");
            Vec::new()
        })
    }

    fn take<T: serde::de::DeserializeOwned>(&self, inbox: &JsonInbox, path: &Path, folder: &str) -> Option<T> {
        match inbox.take(path) {
            Ok(record) => Some(record),
            Err(NanoclawError::InvalidIpcFile { message, .. }) => {
                warn!(group = folder, path = %path.display(), error = %message, "Unparseable IPC file");
                if let Err(e) = quarantine(path, &errors_dir(&self.ipc_base), folder) {
                    warn!(path = %path.display(), error = %e, "Failed to quarantine IPC file");
                }
                None
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "IPC file vanished or unreadable");
                None
            }
        }
    }

    /// Deliver a message if the source group owns the target chat
    pub fn process_message(&mut self, source: &str, record: MessageIpc) -> std::result::Result<Applied, Rejected> {
        let MessageIpc::Message(msg) = record;

        let owns_chat = self
            .scheduler
            .registered_groups()
            .get(&msg.chat_jid)
            .is_some_and(|g| g.folder == source);
        if !(self.is_main(source) || owns_chat) {
            return Err(Rejected::Unauthorized {
                group: source.to_string(),
                action: "message this chat",
            });
        }

        self.sink
            .send_message(&msg.chat_jid, &msg.text, msg.sender.as_deref())?;
        debug!(group = source, chat = %msg.chat_jid, "Message delivered");
        Ok(Applied::MessageSent)
    }

    /// Apply one task record from `source`
    pub fn process_task(&mut self, source: &str, record: TaskIpc) -> std::result::Result<Applied, Rejected> {
        match record {
            TaskIpc::ScheduleTask(task) => self.schedule_task(source, task),
            TaskIpc::PauseTask(control) => {
                let id = self.control_task(source, &control, Some(TaskStatus::Paused))?;
                Ok(Applied::TaskPaused(id))
            }
            TaskIpc::ResumeTask(control) => {
                let id = self.control_task(source, &control, Some(TaskStatus::Active))?;
                Ok(Applied::TaskResumed(id))
            }
            TaskIpc::CancelTask(control) => {
                let id = self.control_task(source, &control, None)?;
                Ok(Applied::TaskCancelled(id))
            }
            TaskIpc::RegisterGroup(group) => self.register_group(source, group),
            TaskIpc::RefreshGroups(_) => {
                self.require_main(source, "refresh groups")?;
                self.sink.refresh_groups()?;
                Ok(Applied::GroupsRefreshed)
            }
        }
    }

    fn require_main(&self, source: &str, action: &'static str) -> std::result::Result<(), Rejected> {
        if self.is_main(source) {
            Ok(())
        } else {
            Err(Rejected::Unauthorized {
                group: source.to_string(),
                action,
            })
        }
    }

    fn schedule_task(&mut self, source: &str, task: ScheduleTask) -> std::result::Result<Applied, Rejected> {
        let target_folder = self
            .scheduler
            .registered_groups()
            .get(&task.target_jid)
            .map(|g| g.folder.clone())
            .ok_or_else(|| Rejected::UnregisteredTarget(task.target_jid.clone()))?;

        if !self.is_main(source) && target_folder != source {
            return Err(Rejected::Unauthorized {
                group: source.to_string(),
                action: "schedule tasks for other groups",
            });
        }

        let schedule = Schedule::parse(task.schedule_type, &task.schedule_value)?;
        let next_run = schedule.next_run(Local::now()).map(to_iso);

        let id = new_task_id();
        self.scheduler.create_task(StoredTask {
            id: id.clone(),
            group_folder: target_folder,
            chat_jid: task.target_jid,
            prompt: task.prompt,
            schedule_type: task.schedule_type,
            schedule_value: task.schedule_value,
            context_mode: task.context_mode,
            status: TaskStatus::Active,
            next_run,
            created_at: now_iso(),
        })?;
        Ok(Applied::TaskCreated(id))
    }

    /// `None` status cancels (deletes) the task
    fn control_task(
        &mut self,
        source: &str,
        control: &TaskControl,
        status: Option<TaskStatus>,
    ) -> std::result::Result<String, Rejected> {
        let owner = self
            .scheduler
            .task(&control.task_id)
            .map(|t| t.group_folder.clone())
            .ok_or_else(|| Rejected::UnknownTask(control.task_id.clone()))?;

        if !self.is_main(source) && owner != source {
            return Err(Rejected::Unauthorized {
                group: source.to_string(),
                action: "control tasks of other groups",
            });
        }

        let found = match status {
            Some(status) => self.scheduler.set_status(&control.task_id, status)?,
            None => self.scheduler.delete_task(&control.task_id)?,
        };
        if !found {
            return Err(Rejected::UnknownTask(control.task_id.clone()));
        }
        Ok(control.task_id.clone())
    }

    fn register_group(&mut self, source: &str, group: RegisterGroup) -> std::result::Result<Applied, Rejected> {
        self.require_main(source, "register groups")?;
        if !is_valid_folder(&group.folder) {
            return Err(Rejected::InvalidFolder(group.folder));
        }

        let folder = group.folder.clone();
        self.scheduler.register_group(
            &group.jid,
            RegisteredGroup {
                name: group.name,
                folder: group.folder,
                trigger: group.trigger,
                added_at: now_iso(),
            },
        )?;
        info!(jid = %group.jid, folder = %folder, "Group registered");
        Ok(Applied::GroupRegistered(folder))
    }

    /// Rewrite `current_tasks.json` for every known group
    pub fn write_snapshots(&self) -> Result<()> {
        let rows = self.scheduler.snapshot();

        let mut folders = group_folders(&self.ipc_base);
        folders.extend(
            self.scheduler
                .registered_groups()
                .values()
                .map(|g| g.folder.clone()),
        );
        folders.push(self.main_folder.clone());
        folders.sort();
        folders.dedup();

        for folder in folders.iter().filter(|f| is_valid_folder(f)) {
            let visible: Vec<&TaskSnapshot> =
                visible_to(&rows, folder, self.is_main(folder)).collect();
            let path = IpcLayout::for_group(&self.ipc_base, folder).tasks_snapshot();
            write_json_atomic(&path, &visible)?;
        }
        debug!(groups = folders.len(), tasks = rows.len(), "Task snapshots written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use nanoclaw_protocol::{ChatMessage, ContextMode, RefreshGroups, ScheduleType};
    use nanoclaw_utils::inbox::read_json;
    use nanoclaw_utils::write_ipc_file;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSink {
        sent: RefCell<Vec<(String, String)>>,
        refreshes: RefCell<usize>,
    }

    impl MessageSink for RecordingSink {
        fn send_message(&self, chat_jid: &str, text: &str, _sender: Option<&str>) -> Result<()> {
            self.sent.borrow_mut().push((chat_jid.into(), text.into()));
            Ok(())
        }

        fn refresh_groups(&self) -> Result<()> {
            *self.refreshes.borrow_mut() += 1;
            Ok(())
        }
    }

    fn processor(dir: &TempDir) -> IpcProcessor<TaskStore, RecordingSink> {
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        for folder in ["main", "dev"] {
            store
                .register_group(
                    &format!("{}@g.us", folder),
                    RegisteredGroup {
                        name: folder.into(),
                        folder: folder.into(),
                        trigger: "@Andy".into(),
                        added_at: "t".into(),
                    },
                )
                .unwrap();
        }
        IpcProcessor::new(dir.path().join("ipc"), "main", store, RecordingSink::default())
    }

    fn message(jid: &str) -> MessageIpc {
        MessageIpc::Message(ChatMessage {
            chat_jid: jid.into(),
            text: "hello".into(),
            sender: None,
            group_folder: "whatever".into(),
            timestamp: now_iso(),
        })
    }

    fn schedule(target: &str, schedule_type: ScheduleType, value: &str) -> TaskIpc {
        TaskIpc::ScheduleTask(ScheduleTask {
            prompt: "stand-up reminder".into(),
            schedule_type,
            schedule_value: value.into(),
            context_mode: ContextMode::Group,
            target_jid: target.into(),
            created_by: "x".into(),
            is_main: true,
            timestamp: now_iso(),
        })
    }

    fn control(id: &str) -> TaskControl {
        TaskControl {
            task_id: id.into(),
            group_folder: "main".into(),
            is_main: true,
            timestamp: now_iso(),
        }
    }

    // ==================== Message Authorization Tests ====================

    #[test]
    fn test_message_to_own_chat_delivered() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        assert_eq!(p.process_message("dev", message("dev@g.us")).unwrap(), Applied::MessageSent);
        assert_eq!(p.sink().sent.borrow().len(), 1);
    }

    #[test]
    fn test_message_to_foreign_chat_dropped() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let err = p.process_message("dev", message("main@g.us")).unwrap_err();
        assert!(matches!(err, Rejected::Unauthorized { .. }));
        assert!(p.sink().sent.borrow().is_empty());
    }

    #[test]
    fn test_main_messages_anywhere() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        assert!(p.process_message("main", message("dev@g.us")).is_ok());
        assert!(p.process_message("main", message("unknown@g.us")).is_ok());
    }

    // ==================== Scheduling Tests ====================

    #[test]
    fn test_schedule_own_group() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);

        let applied = p
            .process_task("dev", schedule("dev@g.us", ScheduleType::Interval, "60000"))
            .unwrap();
        let Applied::TaskCreated(id) = applied else {
            panic!("expected TaskCreated");
        };

        let task = p.scheduler().task(&id).unwrap();
        assert_eq!(task.group_folder, "dev");
        assert_eq!(task.status, TaskStatus::Active);
        assert!(task.next_run.is_some());
    }

    #[test]
    fn test_non_main_cannot_target_other_group() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let err = p
            .process_task("dev", schedule("main@g.us", ScheduleType::Cron, "0 9 * * *"))
            .unwrap_err();
        assert!(matches!(err, Rejected::Unauthorized { .. }));
        assert!(p.scheduler().snapshot().is_empty());
    }

    #[test]
    fn test_main_targets_any_registered_group() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        assert!(p
            .process_task("main", schedule("dev@g.us", ScheduleType::Once, "2030-01-01T09:00:00"))
            .is_ok());
        let err = p
            .process_task("main", schedule("nobody@g.us", ScheduleType::Once, "2030-01-01T09:00:00"))
            .unwrap_err();
        assert!(matches!(err, Rejected::UnregisteredTarget(_)));
    }

    #[test]
    fn test_overflowing_interval_stored_without_next_run() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let tasks_dir = IpcLayout::for_group(p.ipc_base(), "dev").tasks_dir();
        write_ipc_file(&tasks_dir, &schedule("dev@g.us", ScheduleType::Interval, "10000000000000000")).unwrap();

        p.drain_group("dev");

        let rows = p.scheduler().snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].schedule_value, "10000000000000000");
        assert_eq!(rows[0].next_run, None);
    }

    #[test]
    fn test_host_revalidates_schedule() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let err = p
            .process_task("dev", schedule("dev@g.us", ScheduleType::Once, "2030-01-01T09:00:00Z"))
            .unwrap_err();
        assert!(matches!(err, Rejected::Schedule(ScheduleError::TimezoneSuffix { .. })));
    }

    // ==================== Task Control Tests ====================

    #[test]
    fn test_pause_resume_cancel_own_task() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let Applied::TaskCreated(id) = p
            .process_task("dev", schedule("dev@g.us", ScheduleType::Interval, "60000"))
            .unwrap()
        else {
            panic!("expected TaskCreated");
        };

        p.process_task("dev", TaskIpc::PauseTask(control(&id))).unwrap();
        assert_eq!(p.scheduler().task(&id).unwrap().status, TaskStatus::Paused);

        p.process_task("dev", TaskIpc::ResumeTask(control(&id))).unwrap();
        assert_eq!(p.scheduler().task(&id).unwrap().status, TaskStatus::Active);

        p.process_task("dev", TaskIpc::CancelTask(control(&id))).unwrap();
        assert!(p.scheduler().task(&id).is_none());
    }

    #[test]
    fn test_cannot_control_foreign_task() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let Applied::TaskCreated(id) = p
            .process_task("main", schedule("main@g.us", ScheduleType::Interval, "60000"))
            .unwrap()
        else {
            panic!("expected TaskCreated");
        };

        // The record claims main; the directory says dev
        let err = p.process_task("dev", TaskIpc::CancelTask(control(&id))).unwrap_err();
        assert!(matches!(err, Rejected::Unauthorized { .. }));
        assert!(p.scheduler().task(&id).is_some());

        let err = p.process_task("dev", TaskIpc::PauseTask(control("missing"))).unwrap_err();
        assert!(matches!(err, Rejected::UnknownTask(_)));
    }

    // ==================== Group Tests ====================

    #[test]
    fn test_register_group_main_only() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let record = || {
            TaskIpc::RegisterGroup(RegisterGroup {
                jid: "fam@g.us".into(),
                name: "Family".into(),
                folder: "family-chat".into(),
                trigger: "@Andy".into(),
                timestamp: now_iso(),
            })
        };

        assert!(matches!(
            p.process_task("dev", record()).unwrap_err(),
            Rejected::Unauthorized { .. }
        ));
        assert_eq!(
            p.process_task("main", record()).unwrap(),
            Applied::GroupRegistered("family-chat".into())
        );
        assert_eq!(p.scheduler().registered_groups()["fam@g.us"].name, "Family");
    }

    #[test]
    fn test_seed_main_group_enables_main_scheduling() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        let mut p = IpcProcessor::new(dir.path().join("ipc"), "main", store, RecordingSink::default());

        let err = p
            .process_task("main", schedule("main@g.us", ScheduleType::Interval, "60000"))
            .unwrap_err();
        assert!(matches!(err, Rejected::UnregisteredTarget(_)));

        assert!(p.seed_main_group("main@g.us").unwrap());
        assert!(!p.seed_main_group("main@g.us").unwrap());
        assert_eq!(p.scheduler().registered_groups()["main@g.us"].folder, "main");

        assert!(p
            .process_task("main", schedule("main@g.us", ScheduleType::Interval, "60000"))
            .is_ok());
    }

    #[test]
    fn test_register_group_rejects_path_folder() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let record = TaskIpc::RegisterGroup(RegisterGroup {
            jid: "x@g.us".into(),
            name: "X".into(),
            folder: "../../etc".into(),
            trigger: "@Andy".into(),
            timestamp: now_iso(),
        });
        assert!(matches!(
            p.process_task("main", record).unwrap_err(),
            Rejected::InvalidFolder(_)
        ));
    }

    #[test]
    fn test_refresh_groups_main_only() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let record = || TaskIpc::RefreshGroups(RefreshGroups { timestamp: now_iso() });

        assert!(p.process_task("dev", record()).is_err());
        assert_eq!(p.process_task("main", record()).unwrap(), Applied::GroupsRefreshed);
        assert_eq!(*p.sink().refreshes.borrow(), 1);
    }

    // ==================== Directory Drain Tests ====================

    #[test]
    fn test_drain_group_writes_snapshots() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let dev = IpcLayout::for_group(p.ipc_base(), "dev");

        write_ipc_file(&dev.tasks_dir(), &schedule("dev@g.us", ScheduleType::Interval, "60000")).unwrap();
        write_ipc_file(&dev.messages_dir(), &message("dev@g.us")).unwrap();
        p.drain_group("dev");

        assert!(JsonInbox::new(dev.tasks_dir()).pending().unwrap().is_empty());
        assert!(JsonInbox::new(dev.messages_dir()).pending().unwrap().is_empty());
        assert_eq!(p.sink().sent.borrow().len(), 1);

        let dev_rows: Vec<TaskSnapshot> = read_json(&dev.tasks_snapshot()).unwrap();
        assert_eq!(dev_rows.len(), 1);
        let main_rows: Vec<TaskSnapshot> =
            read_json(&IpcLayout::for_group(p.ipc_base(), "main").tasks_snapshot()).unwrap();
        assert_eq!(main_rows.len(), 1);
    }

    #[test]
    fn test_snapshot_hides_other_groups() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        p.process_task("main", schedule("main@g.us", ScheduleType::Interval, "60000"))
            .unwrap();
        p.write_snapshots().unwrap();

        let dev_rows: Vec<TaskSnapshot> =
            read_json(&IpcLayout::for_group(p.ipc_base(), "dev").tasks_snapshot()).unwrap();
        assert!(dev_rows.is_empty());
    }

    #[test]
    fn test_bad_file_quarantined() {
        let dir = TempDir::new().unwrap();
        let mut p = processor(&dir);
        let dev = IpcLayout::for_group(p.ipc_base(), "dev");
        std::fs::create_dir_all(dev.tasks_dir()).unwrap();
        std::fs::write(dev.tasks_dir().join("1-bad.json"), "{\"type\":\"drop_tables\"}").unwrap();

        p.drain_group("dev");

        assert!(!dev.tasks_dir().join("1-bad.json").exists());
        assert!(errors_dir(p.ipc_base()).join("dev-1-bad.json").exists());
    }

    #[test]
    fn test_group_folders_skip_errors_dir() {
        let dir = TempDir::new().unwrap();
        for name in ["main", "dev", "errors", ".hidden"] {
            std::fs::create_dir_all(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("stray.json"), "{}").unwrap();
        assert_eq!(group_folders(dir.path()), vec!["dev", "main"]);
    }
}
