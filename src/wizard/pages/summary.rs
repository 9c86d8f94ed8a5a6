//! Step 6: show the collected configuration and wait for the go-ahead

use std::path::PathBuf;
use std::time::Duration;

use crate::error::WizardError;
use crate::messaging::{Event, KeyInput};
use crate::state::SharedConfig;
use crate::time_window::TimeWindow;
use crate::wizard::context::StepContext;
use crate::wizard::flow::{StepBehavior, StepSignal};
use crate::wizard::steps::WizardStep;

/// Snapshot of everything the render will use
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub window: TimeWindow,
    pub frames_per_second: f64,
    pub image_count: usize,
    pub predicted_duration: Duration,
}

impl Summary {
    pub fn from_config(config: &SharedConfig) -> Result<Self, WizardError> {
        Ok(Self {
            input_dir: config.require_input_dir()?.to_path_buf(),
            output_path: config.require_output_path()?.to_path_buf(),
            window: config.require_window()?,
            frames_per_second: config.require_frames_per_second()?,
            image_count: config.require_ordered_images()?.len(),
            predicted_duration: config.predicted_duration(),
        })
    }

    /// Length of the time window
    pub fn window_span(&self) -> chrono::Duration {
        self.window.span()
    }
}

#[derive(Debug, Default)]
pub struct SummaryPage {
    summary: Option<Summary>,
}

impl SummaryPage {
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }
}

impl StepBehavior for SummaryPage {
    fn title(&self) -> &'static str {
        WizardStep::ConfirmSummary.title()
    }

    fn initialize(&mut self, ctx: &mut StepContext<'_>) -> Result<(), WizardError> {
        let summary = Summary::from_config(ctx.config)?;
        tracing::info!(
            input = %summary.input_dir.display(),
            output = %summary.output_path.display(),
            images = summary.image_count,
            fps = summary.frames_per_second,
            "Configuration complete"
        );
        self.summary = Some(summary);
        Ok(())
    }

    fn handle(&mut self, event: Event, _ctx: &mut StepContext<'_>) -> StepSignal {
        match event {
            Event::Key(KeyInput::Enter) => StepSignal::Complete,
            _ => StepSignal::StillActive,
        }
    }
}
