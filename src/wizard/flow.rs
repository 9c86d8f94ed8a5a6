/// Wizard flow management
///
/// Drives the step list: dispatches one event at a time to the active step,
/// initializes the next step once the active one completes, and ends the run
/// on the last completion, a fatal error or a cancel request.

use std::sync::Arc;

use super::context::StepContext;
use crate::error::WizardError;
use crate::messaging::Event;
use crate::state::FlowState;

/// What a step reports after handling an event
#[derive(Debug)]
pub enum StepSignal {
    /// Keep the step active
    StillActive,

    /// The step wrote its fields; move on
    Complete,

    /// Unrecoverable failure; end the run
    Fatal(WizardError),
}

/// Result of feeding one event to the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A step is still active, keep feeding events
    Continue,

    /// The flow reached a terminal state
    Terminate,
}

/// Behaviour shared by all steps
pub trait StepBehavior {
    /// Title shown in the header and logs
    fn title(&self) -> &'static str;

    /// Called every time the step becomes active. Resets private state.
    fn initialize(&mut self, ctx: &mut StepContext<'_>) -> Result<(), WizardError>;

    /// Handle one event while active
    fn handle(&mut self, event: Event, ctx: &mut StepContext<'_>) -> StepSignal;
}

/// Wizard flow manager
pub struct WizardFlow<S: StepBehavior> {
    steps: Vec<S>,
    state: FlowState,
}

impl<S: StepBehavior> WizardFlow<S> {
    /// Create a flow over `steps`. Call [`WizardFlow::start`] before feeding events.
    pub fn new(steps: Vec<S>) -> Self {
        Self {
            steps,
            state: FlowState::default(),
        }
    }

    /// Initialize the first step
    pub fn start(&mut self, ctx: &mut StepContext<'_>) -> Advance {
        tracing::info!("Starting wizard with {} steps", self.steps.len());
        self.enter(0, ctx)
    }

    /// Feed one event to the flow
    pub fn advance(&mut self, event: Event, ctx: &mut StepContext<'_>) -> Advance {
        let cursor = match self.state {
            FlowState::Running { cursor } => cursor,
            _ => {
                tracing::debug!("Ignoring {} in state {}", event.description(), self.state.description());
                return Advance::Terminate;
            }
        };

        if matches!(event, Event::Cancel) {
            tracing::info!("Wizard cancelled at step {}", cursor + 1);
            self.state = FlowState::Cancelled;
            return Advance::Terminate;
        }

        let Some(step) = self.steps.get_mut(cursor) else {
            return self.fail(WizardError::Task(format!("no step at position {}", cursor)));
        };

        tracing::debug!("Dispatching {} to {}", event.description(), step.title());
        match step.handle(event, ctx) {
            StepSignal::StillActive => Advance::Continue,
            StepSignal::Complete => {
                tracing::info!("Step {} ({}) complete", cursor + 1, step.title());
                self.enter(cursor + 1, ctx)
            }
            StepSignal::Fatal(err) => self.fail(err),
        }
    }

    /// Make `index` the active step, or finish when it is past the end
    fn enter(&mut self, index: usize, ctx: &mut StepContext<'_>) -> Advance {
        let Some(step) = self.steps.get_mut(index) else {
            tracing::info!("All steps complete");
            self.state = FlowState::Completed;
            return Advance::Terminate;
        };

        self.state = FlowState::Running { cursor: index };
        tracing::info!("Entering step {} ({})", index + 1, step.title());
        match step.initialize(ctx) {
            Ok(()) => Advance::Continue,
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: WizardError) -> Advance {
        tracing::error!("Wizard failed: {}", err);
        self.state = FlowState::Failed(Arc::new(err));
        Advance::Terminate
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Active step, if the flow is running
    pub fn current_step(&self) -> Option<&S> {
        self.state.cursor().and_then(|cursor| self.steps.get(cursor))
    }

    /// 1-based number of the active step and the total
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.state.cursor().map(|cursor| (cursor + 1, self.steps.len()))
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }
}
