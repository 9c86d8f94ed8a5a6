//! Wizard run state machine
//!
//! Represents the lifecycle of one wizard run with clear state transitions.

use std::sync::Arc;

use crate::error::WizardError;

/// State of the wizard run
#[derive(Clone, Debug)]
pub enum FlowState {
    /// A step is active; `cursor` indexes the step list
    Running { cursor: usize },

    /// Every step completed
    Completed,

    /// A step reported a fatal error
    Failed(Arc<WizardError>),

    /// The user aborted the run
    Cancelled,
}

impl FlowState {
    pub fn is_running(&self) -> bool {
        matches!(self, FlowState::Running { .. })
    }

    /// Terminal states accept no further events
    pub fn is_terminal(&self) -> bool {
        !self.is_running()
    }

    pub fn cursor(&self) -> Option<usize> {
        match self {
            FlowState::Running { cursor } => Some(*cursor),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&WizardError> {
        match self {
            FlowState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Get a human-readable description of the state
    pub fn description(&self) -> &'static str {
        match self {
            FlowState::Running { .. } => "Running",
            FlowState::Completed => "Completed",
            FlowState::Failed(_) => "Failed",
            FlowState::Cancelled => "Cancelled",
        }
    }
}

impl Default for FlowState {
    fn default() -> Self {
        FlowState::Running { cursor: 0 }
    }
}

impl PartialEq for FlowState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FlowState::Running { cursor: a }, FlowState::Running { cursor: b }) => a == b,
            (FlowState::Completed, FlowState::Completed) => true,
            (FlowState::Cancelled, FlowState::Cancelled) => true,
            (FlowState::Failed(a), FlowState::Failed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
