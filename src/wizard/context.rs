//! What a step gets to see while it runs

use chrono::{DateTime, Local};

use crate::config::Settings;
use crate::fs_access::FileSystem;
use crate::messaging::Task;
use crate::state::SharedConfig;

/// Borrowed view of the wizard's surroundings, rebuilt for every event.
///
/// Steps read and write `config`, consult `settings` and the filesystem for
/// quick checks, and queue slow work with [`StepContext::spawn`]. Queued tasks
/// are collected by the event loop after the step returns.
pub struct StepContext<'a> {
    pub config: &'a mut SharedConfig,
    pub settings: &'a Settings,
    pub fs: &'a dyn FileSystem,
    /// Reference instant for resolving time windows
    pub now: DateTime<Local>,
    tasks: Vec<Task>,
}

impl<'a> StepContext<'a> {
    pub fn new(
        config: &'a mut SharedConfig,
        settings: &'a Settings,
        fs: &'a dyn FileSystem,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            config,
            settings,
            fs,
            now,
            tasks: Vec::new(),
        }
    }

    /// Queue a background task
    pub fn spawn(&mut self, task: Task) {
        tracing::debug!("Step queued task: {}", task.label());
        self.tasks.push(task);
    }

    /// Take the tasks queued so far
    pub fn take_tasks(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.tasks)
    }
}
