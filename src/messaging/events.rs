//! Event types for the wizard
//!
//! Everything the event loop reacts to: key presses from the terminal,
//! results of background tasks, and the cancel request.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::error::{EncodeError, WizardError};
use crate::render::RenderReport;

/// Key presses the steps understand, independent of the terminal backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Enter,
    Backspace,
    Up,
    Down,
}

/// Subfolder of the input root with its number of files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub name: String,
    pub file_count: usize,
}

/// Result of a finished background task
#[derive(Debug)]
pub enum TaskOutput {
    FoldersScanned(Result<Vec<FolderSummary>, WizardError>),

    /// Images inside the time window with their modification times
    ImagesCollected(Result<HashMap<String, DateTime<Local>>, WizardError>),

    ImagesOrdered(Result<Vec<String>, WizardError>),

    Rendered(Result<RenderReport, EncodeError>),
}

/// Wizard events
#[derive(Debug)]
pub enum Event {
    /// A key was pressed
    Key(KeyInput),

    /// A background task finished
    TaskFinished(TaskOutput),

    /// The user asked to quit; honoured in every state
    Cancel,
}

impl TaskOutput {
    pub fn description(&self) -> &'static str {
        match self {
            TaskOutput::FoldersScanned(_) => "input folders scanned",
            TaskOutput::ImagesCollected(_) => "images collected",
            TaskOutput::ImagesOrdered(_) => "images ordered",
            TaskOutput::Rendered(_) => "video rendered",
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            TaskOutput::FoldersScanned(r) => r.is_ok(),
            TaskOutput::ImagesCollected(r) => r.is_ok(),
            TaskOutput::ImagesOrdered(r) => r.is_ok(),
            TaskOutput::Rendered(r) => r.is_ok(),
        }
    }
}

impl Event {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::Key(key) => format!("Key {:?}", key),
            Event::TaskFinished(output) => {
                let status = if output.is_ok() { "ok" } else { "failed" };
                format!("Task finished: {} ({})", output.description(), status)
            }
            Event::Cancel => "Cancel".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_description() {
        assert_eq!(Event::Key(KeyInput::Enter).description(), "Key Enter");
        assert_eq!(Event::Cancel.description(), "Cancel");

        let event = Event::TaskFinished(TaskOutput::ImagesOrdered(Ok(vec![])));
        assert_eq!(event.description(), "Task finished: images ordered (ok)");

        let event = Event::TaskFinished(TaskOutput::FoldersScanned(Err(
            WizardError::Incomplete("input root"),
        )));
        assert_eq!(event.description(), "Task finished: input folders scanned (failed)");
    }
}
