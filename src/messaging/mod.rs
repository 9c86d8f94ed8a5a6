/// Messaging module for the event loop
///
/// - **Events**: things that happened (key presses, finished tasks, cancel)
/// - **Tasks**: requests for slow work that runs off the event loop
///
/// ## Architecture
///
/// ```text
/// ┌──────────┐   Task    ┌──────────┐  Event::TaskFinished  ┌────────────┐
/// │  Steps   │ ────────> │ Executor │ ────────────────────> │ EventQueue │
/// └──────────┘           └──────────┘                       └────────────┘
///      ▲                                                          │
///      │             Orchestrator dispatches one event at a time  │
///      └──────────────────────────────────────────────────────────┘
/// ```

pub mod bus;
pub mod events;
pub mod executor;
pub mod tasks;

// Re-export commonly used types
pub use bus::EventQueue;
pub use events::{Event, FolderSummary, KeyInput, TaskOutput};
pub use executor::TaskExecutor;
pub use tasks::Task;
