//! IPC directory watcher
//!
//! Filesystem events wake the scanner early; a periodic tick covers missed
//! events and platforms where watching is unavailable. Things requests run
//! as separate tasks so a slow CLI call never holds up message delivery.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, FileIdMap};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use nanoclaw_protocol::ThingsRequest;
use nanoclaw_utils::inbox::{is_json_file, quarantine};
use nanoclaw_utils::paths::errors_dir;
use nanoclaw_utils::{write_json_atomic, IpcLayout, JsonInbox, NanoclawError, Result};

use crate::executor::ThingsExecutor;
use crate::processor::{group_folders, IpcProcessor, MessageSink, TaskScheduler};

/// A request id must be usable as a single file name
fn is_safe_request_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// One pass over every group directory
pub struct IpcScanner<S, M> {
    processor: IpcProcessor<S, M>,
    executor: ThingsExecutor,
    in_flight: JoinSet<()>,
}

impl<S: TaskScheduler, M: MessageSink> IpcScanner<S, M> {
    pub fn new(processor: IpcProcessor<S, M>, executor: ThingsExecutor) -> Self {
        Self {
            processor,
            executor,
            in_flight: JoinSet::new(),
        }
    }

    pub fn processor(&self) -> &IpcProcessor<S, M> {
        &self.processor
    }

    pub fn ipc_base(&self) -> &Path {
        self.processor.ipc_base()
    }

    /// Process everything currently waiting
    pub fn scan(&mut self) {
        for folder in group_folders(self.processor.ipc_base()) {
            self.processor.drain_group(&folder);
            self.dispatch_things(&folder);
        }
    }

    /// Start one executor task per pending Things request of `folder`
    fn dispatch_things(&mut self, folder: &str) {
        let layout = IpcLayout::for_group(self.processor.ipc_base(), folder);
        let inbox = JsonInbox::new(layout.requests_dir());

        let pending = match inbox.pending() {
            Ok(pending) => pending,
            Err(e) => {
                warn!(group = folder, error = %e, "Cannot list Things requests");
                return;
            }
        };

        for path in pending {
            let mut request: ThingsRequest = match inbox.take(&path) {
                Ok(request) => request,
                Err(NanoclawError::InvalidIpcFile { message, .. }) => {
                    warn!(group = folder, path = %path.display(), error = %message, "Unparseable Things request");
                    self.quarantine(&path, folder);
                    continue;
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Things request vanished");
                    continue;
                }
            };

            if !is_safe_request_id(&request.request_id) {
                warn!(group = folder, request_id = %request.request_id, "Things request with unusable id dropped");
                continue;
            }
            if request.group_folder != folder {
                warn!(
                    group = folder,
                    claimed = %request.group_folder,
                    "Things request claims another group"
                );
                request.group_folder = folder.to_string();
            }

            let executor = self.executor.clone();
            let response_path = layout.response_file(&request.request_id);
            self.in_flight.spawn(async move {
                let response = executor.respond(&request).await;
                match write_json_atomic(&response_path, &response) {
                    Ok(()) => debug!(request_id = %request.request_id, "Things response written"),
                    Err(e) => error!(request_id = %request.request_id, error = %e, "Failed to write Things response"),
                }
            });
        }
    }

    fn quarantine(&self, path: &Path, folder: &str) {
        if let Err(e) = quarantine(path, &errors_dir(self.processor.ipc_base()), folder) {
            warn!(path = %path.display(), error = %e, "Failed to quarantine IPC file");
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Wait for one running Things request; `None` when idle
    pub async fn next_completed(&mut self) -> Option<()> {
        match self.in_flight.join_next().await? {
            Ok(()) => Some(()),
            Err(e) => {
                error!(error = %e, "Things request task failed");
                Some(())
            }
        }
    }

    /// Wait until every running Things request has answered
    pub async fn wait_idle(&mut self) {
        while self.next_completed().await.is_some() {}
    }
}

/// Event-driven loop around an [`IpcScanner`]
pub struct IpcWatcher<S, M> {
    scanner: IpcScanner<S, M>,
    poll_interval: Duration,
    rx: mpsc::UnboundedReceiver<Result<Vec<Event>>>,
    /// Debouncer handle (kept alive)
    _debouncer: Debouncer<RecommendedWatcher, FileIdMap>,
}

impl<S: TaskScheduler, M: MessageSink> IpcWatcher<S, M> {
    /// Watch the scanner's IPC base recursively
    pub fn new(scanner: IpcScanner<S, M>, poll_interval: Duration) -> Result<Self> {
        let base: PathBuf = scanner.ipc_base().to_path_buf();
        std::fs::create_dir_all(&base).map_err(|e| NanoclawError::DirCreate {
            path: base.clone(),
            source: e,
        })?;

        let (tx, rx) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(
            Duration::from_millis(50),
            None,
            move |result: DebounceEventResult| {
                let events = result
                    .map(|events| events.into_iter().map(|e| e.event).collect())
                    .map_err(|errs| NanoclawError::internal(format!("Watch error: {:?}", errs)));
                let _ = tx.send(events);
            },
        )
        .map_err(|e| NanoclawError::internal(format!("Failed to create watcher: {}", e)))?;

        debouncer
            .watcher()
            .watch(&base, RecursiveMode::Recursive)
            .map_err(|e| NanoclawError::internal(format!("Failed to watch {}: {}", base.display(), e)))?;

        Ok(Self {
            scanner,
            poll_interval,
            rx,
            _debouncer: debouncer,
        })
    }

    /// Whether an event may have produced a new IPC file
    fn is_ipc_event(event: &Event) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
            && event.paths.iter().any(|p| is_json_file(p))
    }

    /// Run until `shutdown` resolves, then finish in-flight requests
    pub async fn run<F>(mut self, shutdown: F) -> IpcScanner<S, M>
    where
        F: std::future::Future<Output = ()>,
    {
        info!(
            base = %self.scanner.ipc_base().display(),
            poll_ms = self.poll_interval.as_millis() as u64,
            "IPC watcher started"
        );

        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => self.scanner.scan(),
                Some(result) = self.rx.recv() => match result {
                    Ok(events) => {
                        if events.iter().any(Self::is_ipc_event) {
                            self.scanner.scan();
                        }
                    }
                    Err(e) => warn!("IPC watch error: {}", e),
                },
                Some(()) = self.scanner.next_completed(), if self.scanner.in_flight() > 0 => {}
            }
        }

        info!(in_flight = self.scanner.in_flight(), "IPC watcher stopping");
        self.scanner.wait_idle().await;
        self.scanner
    }
}
