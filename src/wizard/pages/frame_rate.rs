//! Step 5: pick a frame-rate strategy, enter a value and accept the result

use std::time::Duration;

use crate::error::{InputError, StrategyError, WizardError};
use crate::messaging::{Event, KeyInput};
use crate::state::predicted_duration;
use crate::wizard::context::StepContext;
use crate::wizard::flow::{StepBehavior, StepSignal};
use crate::wizard::frame_rate::{FrameRateStrategy, ImageSequence};
use crate::wizard::steps::WizardStep;
use crate::wizard::text_input::TextInput;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatePhase {
    ChoosingStrategy,
    Editing,
    Confirming { fps: f64, duration: Duration },
}

#[derive(Debug)]
pub struct FrameRatePage {
    phase: RatePhase,
    selected: usize,
    input: TextInput,
    error: Option<InputError>,
}

impl Default for FrameRatePage {
    fn default() -> Self {
        Self {
            phase: RatePhase::ChoosingStrategy,
            selected: 0,
            input: TextInput::new(),
            error: None,
        }
    }
}

impl FrameRatePage {
    pub fn phase(&self) -> RatePhase {
        self.phase
    }

    pub fn strategy(&self) -> FrameRateStrategy {
        FrameRateStrategy::ALL[self.selected]
    }

    pub fn input(&self) -> &str {
        self.input.value()
    }

    pub fn error(&self) -> Option<&InputError> {
        self.error.as_ref()
    }

    /// Back to strategy selection with a clean slate
    fn restart(&mut self) {
        self.phase = RatePhase::ChoosingStrategy;
        self.input.clear();
        self.error = None;
    }

    fn choose(&mut self, key: KeyInput) {
        let count = FrameRateStrategy::ALL.len();
        match key {
            KeyInput::Up => self.selected = (self.selected + count - 1) % count,
            KeyInput::Down => self.selected = (self.selected + 1) % count,
            KeyInput::Enter => {
                tracing::debug!("Frame rate strategy: {}", self.strategy());
                self.phase = RatePhase::Editing;
            }
            _ => {}
        }
    }

    fn edit(&mut self, key: KeyInput, ctx: &mut StepContext<'_>) -> StepSignal {
        match key {
            KeyInput::Char('q') => {
                self.restart();
                StepSignal::StillActive
            }
            KeyInput::Enter => match self.convert(ctx) {
                Ok(fps) => {
                    let count = ctx.config.ordered_images().len();
                    let duration = predicted_duration(count, fps);
                    tracing::info!("Frame rate {:.2} gives about {}s of video", fps, duration.as_secs());
                    self.error = None;
                    self.phase = RatePhase::Confirming { fps, duration };
                    StepSignal::StillActive
                }
                Err(StrategyError::Input(err)) => {
                    tracing::debug!("Rejected frame rate input: {}", err);
                    self.error = Some(err);
                    StepSignal::StillActive
                }
                Err(StrategyError::Fatal(err)) => StepSignal::Fatal(err),
            },
            other => {
                self.input.apply(other);
                StepSignal::StillActive
            }
        }
    }

    fn convert(&self, ctx: &StepContext<'_>) -> Result<f64, StrategyError> {
        let images = ImageSequence {
            dir: ctx.config.require_input_dir()?,
            names: ctx.config.require_ordered_images()?,
            fs: ctx.fs,
        };
        self.strategy().convert(self.input.value(), &images)
    }
}

impl StepBehavior for FrameRatePage {
    fn title(&self) -> &'static str {
        WizardStep::SelectFrameRate.title()
    }

    fn initialize(&mut self, _ctx: &mut StepContext<'_>) -> Result<(), WizardError> {
        *self = Self::default();
        Ok(())
    }

    fn handle(&mut self, event: Event, ctx: &mut StepContext<'_>) -> StepSignal {
        let Event::Key(key) = event else {
            return StepSignal::StillActive;
        };

        match self.phase {
            RatePhase::ChoosingStrategy => {
                self.choose(key);
                StepSignal::StillActive
            }
            RatePhase::Editing => self.edit(key, ctx),
            RatePhase::Confirming { fps, .. } => match key {
                KeyInput::Char('y') | KeyInput::Char('Y') => {
                    ctx.config.set_frames_per_second(fps);
                    StepSignal::Complete
                }
                KeyInput::Char('n') | KeyInput::Char('N') => {
                    self.restart();
                    StepSignal::StillActive
                }
                _ => StepSignal::StillActive,
            },
        }
    }
}
