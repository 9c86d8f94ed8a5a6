/// Timelapse wizard module
///
/// Walks the user through six steps that together describe one timelapse
/// render.
///
/// ## Architecture
///
/// ```text
/// WizardFlow<Step>
///   ├── FlowState (running cursor or terminal outcome)
///   ├── Step (one page per WizardStep, each with private input state)
///   └── StepContext (SharedConfig, Settings, FileSystem, task outbox)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let mut flow = WizardFlow::new(Step::all());
/// flow.start(&mut ctx);
///
/// while let Some(event) = queue.next_timeout(tick) {
///     if flow.advance(event, &mut ctx) == Advance::Terminate {
///         break;
///     }
/// }
/// ```
///
/// ## Steps
///
/// 1. **SelectInputFolder** - Pick a subfolder of the input root
/// 2. **NameOutputFile** - Name the rendered video
/// 3. **SelectTimeWindow** - Enter the daily capture window
/// 4. **AssembleAndOrderImages** - Collect and sort the matching images
/// 5. **SelectFrameRate** - Choose a strategy and a value
/// 6. **ConfirmSummary** - Review and start rendering

pub mod context;
pub mod flow;
pub mod frame_rate;
pub mod pages;
pub mod steps;
pub mod text_input;

// Re-export commonly used types
pub use context::StepContext;
pub use flow::{Advance, StepBehavior, StepSignal, WizardFlow};
pub use frame_rate::FrameRateStrategy;
pub use pages::Step;
pub use steps::WizardStep;
