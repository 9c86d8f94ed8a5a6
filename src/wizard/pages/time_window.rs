//! Step 3: enter the daily capture window and confirm the resolved interval

use std::sync::OnceLock;

use chrono::{DateTime, Local};
use regex::Regex;

use crate::error::{InputError, ParseError, WizardError};
use crate::messaging::{Event, KeyInput};
use crate::time_window::{self, TimeWindow};
use crate::wizard::context::StepContext;
use crate::wizard::flow::{StepBehavior, StepSignal};
use crate::wizard::steps::WizardStep;
use crate::wizard::text_input::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPhase {
    #[default]
    Editing,
    Confirming(TimeWindow),
}

#[derive(Debug, Default)]
pub struct TimeWindowPage {
    phase: WindowPhase,
    input: TextInput,
    error: Option<InputError>,
}

impl TimeWindowPage {
    pub fn phase(&self) -> WindowPhase {
        self.phase
    }

    pub fn input(&self) -> &str {
        self.input.value()
    }

    pub fn error(&self) -> Option<&InputError> {
        self.error.as_ref()
    }
}

impl StepBehavior for TimeWindowPage {
    fn title(&self) -> &'static str {
        WizardStep::SelectTimeWindow.title()
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
            WindowPhase::Editing => {
                if key != KeyInput::Enter {
                    self.input.apply(key);
                    return StepSignal::StillActive;
                }
                let raw = self.input.take();
                match parse_window(&raw, &ctx.now) {
                    Ok(window) => {
                        tracing::info!("Resolved time window {} - {}", window.from(), window.to());
                        self.error = None;
                        self.phase = WindowPhase::Confirming(window);
                    }
                    Err(err) => {
                        tracing::debug!("Rejected time window {:?}: {}", raw, err);
                        self.error = Some(err);
                    }
                }
                StepSignal::StillActive
            }
            WindowPhase::Confirming(window) => match key {
                KeyInput::Char('y') | KeyInput::Char('Y') => {
                    ctx.config.set_window(window);
                    StepSignal::Complete
                }
                KeyInput::Char('n') | KeyInput::Char('N') => {
                    self.phase = WindowPhase::Editing;
                    StepSignal::StillActive
                }
                _ => StepSignal::StillActive,
            },
        }
    }
}

fn window_pattern() -> &'static Regex {
    static WINDOW_RE: OnceLock<Regex> = OnceLock::new();
    WINDOW_RE.get_or_init(|| {
        Regex::new(r"(\d{2}:\d{2})\s?-\s?(\d{2}:\d{2})").expect("time window regex should compile")
    })
}

/// Parse `"HH:MM - HH:MM"` and resolve it against `now`
pub fn parse_window(raw: &str, now: &DateTime<Local>) -> Result<TimeWindow, InputError> {
    let caps = window_pattern()
        .captures(raw)
        .ok_or(ParseError::WindowPattern)?;
    let (from, to) = time_window::resolve(&caps[1], &caps[2], now)?;
    Ok(TimeWindow::new(from, to)?)
}
