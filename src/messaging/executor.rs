/// Background task executor
///
/// Runs tasks on worker threads and posts their results back as events.

use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread;

use super::events::{Event, TaskOutput};
use super::tasks::Task;
use crate::encoder::Encoder;
use crate::fs_access::FileSystem;

/// Task executor that runs background work and reports on the event queue
#[derive(Clone)]
pub struct TaskExecutor {
    events: Sender<Event>,
    fs: Arc<dyn FileSystem>,
    encoder: Arc<dyn Encoder>,
}

impl TaskExecutor {
    /// Create a new executor posting results to `events`
    pub fn new(events: Sender<Event>, fs: Arc<dyn FileSystem>, encoder: Arc<dyn Encoder>) -> Self {
        Self { events, fs, encoder }
    }

    /// Execute a task immediately (blocking)
    pub fn execute_sync(&self, task: Task) -> TaskOutput {
        tracing::debug!("Running task {} inline", task.label());
        task.run(self.fs.as_ref(), self.encoder.as_ref())
    }

    /// Start a task on a worker thread. Its result arrives as `Event::TaskFinished`.
    pub fn submit(&self, task: Task) {
        let label = task.label();
        tracing::info!("Starting background task: {}", label);

        let events = self.events.clone();
        let fs = Arc::clone(&self.fs);
        let encoder = Arc::clone(&self.encoder);
        let fallback = task.clone();

        let spawned = thread::Builder::new()
            .name(format!("task-{}", label))
            .spawn(move || {
                let output = task.run(fs.as_ref(), encoder.as_ref());
                tracing::info!("Background task {} finished (ok: {})", label, output.is_ok());
                // Receiver gone means the app already shut down; drop the result
                let _ = events.send(Event::TaskFinished(output));
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn worker for {}: {}", label, e);
            let _ = self.events.send(Event::TaskFinished(fallback.spawn_failed(e)));
        }
    }
}
