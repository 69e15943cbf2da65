//! Identity of the group this worker serves
//!
//! The host sets these variables when it launches the container; they are
//! read once at startup and passed into the tool surface.

use std::path::PathBuf;

use nanoclaw_utils::paths::WORKER_IPC_DIR;
use nanoclaw_utils::{IpcLayout, NanoclawError, Result};

pub const ENV_CHAT_JID: &str = "NANOCLAW_CHAT_JID";
pub const ENV_GROUP_FOLDER: &str = "NANOCLAW_GROUP_FOLDER";
pub const ENV_IS_MAIN: &str = "NANOCLAW_IS_MAIN";
pub const ENV_IPC_DIR: &str = "NANOCLAW_IPC_DIR";

/// Per-worker identity and IPC location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentContext {
    /// Chat this worker answers in
    pub chat_jid: String,
    /// Tenant folder name, used for attribution and task filtering
    pub group_folder: String,
    /// Privileged context allowed to act on other groups
    pub is_main: bool,
    /// Root of this group's IPC directory
    pub ipc_dir: PathBuf,
}

impl AgentContext {
    pub fn new(chat_jid: impl Into<String>, group_folder: impl Into<String>, is_main: bool) -> Self {
        Self {
            chat_jid: chat_jid.into(),
            group_folder: group_folder.into(),
            is_main,
            ipc_dir: PathBuf::from(WORKER_IPC_DIR),
        }
    }

    pub fn with_ipc_dir(mut self, ipc_dir: impl Into<PathBuf>) -> Self {
        self.ipc_dir = ipc_dir.into();
        self
    }

    /// Read the context from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the context through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| NanoclawError::MissingEnv(key.to_string()))
        };

        let chat_jid = required(ENV_CHAT_JID)?;
        let group_folder = required(ENV_GROUP_FOLDER)?;
        let is_main = lookup(ENV_IS_MAIN).as_deref() == Some("1");
        let ipc_dir = lookup(ENV_IPC_DIR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(WORKER_IPC_DIR));

        Ok(Self {
            chat_jid,
            group_folder,
            is_main,
            ipc_dir,
        })
    }

    pub fn layout(&self) -> IpcLayout {
        IpcLayout::new(&self.ipc_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_main() {
        let ctx = AgentContext::from_lookup(lookup(&[
            (ENV_CHAT_JID, "main@g.us"),
            (ENV_GROUP_FOLDER, "main"),
            (ENV_IS_MAIN, "1"),
        ]))
        .unwrap();

        assert_eq!(ctx.chat_jid, "main@g.us");
        assert_eq!(ctx.group_folder, "main");
        assert!(ctx.is_main);
        assert_eq!(ctx.ipc_dir, PathBuf::from("/workspace/ipc"));
    }

    #[test]
    fn test_is_main_requires_exactly_one() {
        for value in ["0", "true", "yes", ""] {
            let ctx = AgentContext::from_lookup(lookup(&[
                (ENV_CHAT_JID, "dev@g.us"),
                (ENV_GROUP_FOLDER, "dev"),
                (ENV_IS_MAIN, value),
            ]))
            .unwrap();
            assert!(!ctx.is_main, "{:?}", value);
        }
    }

    #[test]
    fn test_missing_required_variable() {
        let err = AgentContext::from_lookup(lookup(&[(ENV_GROUP_FOLDER, "dev")])).unwrap_err();
        assert!(matches!(err, NanoclawError::MissingEnv(ref k) if k == ENV_CHAT_JID));

        let err = AgentContext::from_lookup(lookup(&[
            (ENV_CHAT_JID, "dev@g.us"),
            (ENV_GROUP_FOLDER, ""),
        ]))
        .unwrap_err();
        assert!(matches!(err, NanoclawError::MissingEnv(ref k) if k == ENV_GROUP_FOLDER));
    }

    #[test]
    fn test_ipc_dir_override() {
        let ctx = AgentContext::from_lookup(lookup(&[
            (ENV_CHAT_JID, "dev@g.us"),
            (ENV_GROUP_FOLDER, "dev"),
            (ENV_IPC_DIR, "/tmp/ipc/dev"),
        ]))
        .unwrap();
        assert_eq!(ctx.layout().tasks_dir(), PathBuf::from("/tmp/ipc/dev/tasks"));
    }
}
