//! Application event loop
//!
//! Owns the wizard state and processes one event at a time. When the wizard
//! completes, the configured render runs in the background while a progress
//! screen is shown. Results that arrive after the run has ended are dropped.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossbeam_channel::Sender;
use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::config::Settings;
use crate::encoder::Encoder;
use crate::error::{AppResult, EncodeError, WizardError};
use crate::fs_access::FileSystem;
use crate::messaging::{Event, EventQueue, Task, TaskExecutor, TaskOutput};
use crate::render::{RenderJob, RenderReport};
use crate::state::{FlowState, SharedConfig};
use crate::tui::view;
use crate::wizard::{Advance, Step, StepContext, WizardFlow};

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    Rendered(RenderReport),
    Cancelled,
    /// The wizard stopped on a fatal error
    Failed(Arc<WizardError>),
    /// The wizard finished but the encoder did not
    RenderFailed(EncodeError),
}

/// Coarse phase of the application
#[derive(Debug)]
pub enum Phase {
    Wizard,
    Rendering(RenderJob),
    Finished(RunOutcome),
}

pub struct App {
    settings: Settings,
    fs: Arc<dyn FileSystem>,
    queue: EventQueue,
    executor: TaskExecutor,
    config: SharedConfig,
    flow: WizardFlow<Step>,
    phase: Phase,
    clock: fn() -> DateTime<Local>,
    ticks: usize,
}

impl App {
    pub fn new(settings: Settings, fs: Arc<dyn FileSystem>, encoder: Arc<dyn Encoder>) -> Self {
        let queue = EventQueue::new();
        let executor = TaskExecutor::new(queue.sender(), Arc::clone(&fs), encoder);
        Self {
            settings,
            fs,
            queue,
            executor,
            config: SharedConfig::new(),
            flow: WizardFlow::new(Step::all()),
            phase: Phase::Wizard,
            clock: Local::now,
            ticks: 0,
        }
    }

    /// Replace the clock used to resolve time windows
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Sender for posting events from other threads
    pub fn sender(&self) -> Sender<Event> {
        self.queue.sender()
    }

    /// Activate the first step
    pub fn start(&mut self) {
        let now = (self.clock)();
        let mut ctx = StepContext::new(&mut self.config, &self.settings, self.fs.as_ref(), now);
        let advance = self.flow.start(&mut ctx);
        let tasks = ctx.take_tasks();
        self.after_advance(advance, tasks);
    }

    /// Wait up to `timeout` for one event and process it.
    /// Returns false once the run has finished.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        match self.queue.next_timeout(timeout) {
            Some(event) => self.handle_event(event),
            None => self.ticks = self.ticks.wrapping_add(1),
        }
        !self.is_finished()
    }

    pub fn handle_event(&mut self, event: Event) {
        match &self.phase {
            Phase::Wizard => {
                let now = (self.clock)();
                let mut ctx = StepContext::new(&mut self.config, &self.settings, self.fs.as_ref(), now);
                let advance = self.flow.advance(event, &mut ctx);
                let tasks = ctx.take_tasks();
                self.after_advance(advance, tasks);
            }
            Phase::Rendering(_) => match event {
                Event::TaskFinished(TaskOutput::Rendered(result)) => {
                    let outcome = match result {
                        Ok(report) => {
                            tracing::info!(
                                "Rendered {} frames to {}",
                                report.frame_count,
                                report.output_path.display()
                            );
                            RunOutcome::Rendered(report)
                        }
                        Err(err) => {
                            tracing::error!("Render failed: {}", err);
                            RunOutcome::RenderFailed(err)
                        }
                    };
                    self.phase = Phase::Finished(outcome);
                }
                Event::Cancel => {
                    tracing::warn!("Cancelled while rendering; the encoder is left to finish on its own");
                    self.phase = Phase::Finished(RunOutcome::Cancelled);
                }
                other => tracing::debug!("Ignoring {} while rendering", other.description()),
            },
            Phase::Finished(_) => {
                tracing::debug!("Discarding late event: {}", event.description());
            }
        }
    }

    fn after_advance(&mut self, advance: Advance, tasks: Vec<Task>) {
        if advance == Advance::Continue {
            for task in tasks {
                self.executor.submit(task);
            }
            return;
        }

        if !tasks.is_empty() {
            tracing::debug!("Dropping {} tasks queued by a finished wizard", tasks.len());
        }

        self.phase = match self.flow.state() {
            FlowState::Completed => match RenderJob::from_config(&self.config) {
                Ok(job) => {
                    tracing::info!(
                        "Wizard complete, rendering {} images to {}",
                        job.images.len(),
                        job.output_path.display()
                    );
                    self.executor.submit(Task::Render { job: job.clone() });
                    Phase::Rendering(job)
                }
                Err(err) => Phase::Finished(RunOutcome::Failed(Arc::new(err))),
            },
            FlowState::Failed(err) => Phase::Finished(RunOutcome::Failed(Arc::clone(err))),
            FlowState::Cancelled => Phase::Finished(RunOutcome::Cancelled),
            FlowState::Running { .. } => Phase::Wizard,
        };
    }

    /// Draw and pump events until the run finishes
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> AppResult<RunOutcome> {
        let tick = Duration::from_millis(self.settings.tick_ms.max(1));
        self.start();

        loop {
            terminal.draw(|frame| view::draw(frame, &self))?;
            if !self.pump(tick) {
                break;
            }
        }

        let late = self.queue.drain();
        if !late.is_empty() {
            tracing::debug!("Discarded {} late events", late.len());
        }

        Ok(self.into_outcome())
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn flow(&self) -> &WizardFlow<Step> {
        &self.flow
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Redraw counter, drives the spinners
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn into_outcome(self) -> RunOutcome {
        match self.phase {
            Phase::Finished(outcome) => outcome,
            // Leaving the loop early counts as a cancel
            Phase::Wizard | Phase::Rendering(_) => RunOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tests::RecordingEncoder;
    use crate::fs_access::memory::MemoryFs;
    use crate::messaging::KeyInput;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()
    }

    fn settings() -> Settings {
        Settings {
            input_root: PathBuf::from("/in"),
            output_root: PathBuf::from("/out"),
            ..Settings::default()
        }
    }

    fn app(fs: MemoryFs) -> App {
        App::new(settings(), Arc::new(fs), Arc::new(RecordingEncoder::default())).with_clock(noon)
    }

    #[test]
    fn test_cancel_ends_run() {
        let mut app = app(MemoryFs::new().dir("/in"));
        app.start();
        app.handle_event(Event::Cancel);

        assert!(app.is_finished());
        assert!(matches!(app.into_outcome(), RunOutcome::Cancelled));
    }

    #[test]
    fn test_scan_failure_fails_run() {
        let mut app = app(MemoryFs::new());
        app.start();

        // The scan of the missing input root reports back through the queue
        while app.pump(Duration::from_secs(5)) {}
        match app.into_outcome() {
            RunOutcome::Failed(err) => assert!(matches!(*err, WizardError::Io { .. })),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_late_events_are_discarded() {
        let mut app = app(MemoryFs::new().dir("/in"));
        app.start();
        app.handle_event(Event::Cancel);

        app.handle_event(Event::TaskFinished(TaskOutput::FoldersScanned(Ok(vec![]))));
        app.handle_event(Event::Key(KeyInput::Enter));
        assert!(matches!(app.phase(), Phase::Finished(RunOutcome::Cancelled)));
    }

    #[test]
    fn test_render_result_finishes_run() {
        let mut app = app(MemoryFs::new().dir("/in"));
        app.phase = Phase::Rendering(RenderJob {
            input_dir: PathBuf::from("/in/cam"),
            images: vec!["a.jpg".into()],
            output_path: PathBuf::from("/out/a.mp4"),
            frames_per_second: 1.0,
        });

        app.handle_event(Event::Key(KeyInput::Enter));
        assert!(!app.is_finished());

        let report = RenderReport {
            output_path: PathBuf::from("/out/a.mp4"),
            frame_count: 1,
        };
        app.handle_event(Event::TaskFinished(TaskOutput::Rendered(Ok(report.clone()))));
        match app.into_outcome() {
            RunOutcome::Rendered(r) => assert_eq!(r, report),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
