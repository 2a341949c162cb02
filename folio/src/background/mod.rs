pub mod data_loader;

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Tracks running background tasks by id
pub struct BackgroundTaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
    writes_spawned: u64,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            writes_spawned: 0,
        }
    }

    /// Spawn a data loading task, aborting any running task with the same id
    /// so a stale response can never overwrite a newer one
    pub fn spawn_load_task<F>(&mut self, task_id: String, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.tasks.remove(&task_id) {
            handle.abort();
        }
        self.reap_finished();
        self.tasks.insert(task_id, tokio::spawn(future));
    }

    /// Spawn a write that must run to completion. A later write with the same
    /// label runs alongside it instead of replacing it.
    pub fn spawn_write_task<F>(&mut self, label: &str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.reap_finished();
        self.writes_spawned += 1;
        let task_id = format!("{}/{}", label, self.writes_spawned);
        self.tasks.insert(task_id, tokio::spawn(future));
    }

    pub fn running(&self) -> usize {
        self.tasks.values().filter(|h| !h.is_finished()).count()
    }

    fn reap_finished(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }

    /// Cancel all running tasks (used on shutdown)
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
