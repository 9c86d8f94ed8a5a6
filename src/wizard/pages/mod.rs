//! The six wizard pages
//!
//! Each page keeps only its private input state. Everything later pages need
//! goes through `SharedConfig`.

pub mod assemble;
pub mod frame_rate;
pub mod input_folder;
pub mod output_file;
pub mod summary;
pub mod time_window;

pub use assemble::AssemblePage;
pub use frame_rate::FrameRatePage;
pub use input_folder::InputFolderPage;
pub use output_file::OutputFilePage;
pub use summary::{Summary, SummaryPage};
pub use time_window::TimeWindowPage;

use super::context::StepContext;
use super::flow::{StepBehavior, StepSignal};
use super::steps::WizardStep;
use crate::error::WizardError;
use crate::messaging::Event;

/// One wizard step with its page state
#[derive(Debug)]
pub enum Step {
    SelectInputFolder(InputFolderPage),
    NameOutputFile(OutputFilePage),
    SelectTimeWindow(TimeWindowPage),
    AssembleAndOrderImages(AssemblePage),
    SelectFrameRate(FrameRatePage),
    ConfirmSummary(SummaryPage),
}

impl Step {
    /// All steps in wizard order, each in its initial state
    pub fn all() -> Vec<Step> {
        WizardStep::all_steps().into_iter().map(Step::new).collect()
    }

    pub fn new(kind: WizardStep) -> Step {
        match kind {
            WizardStep::SelectInputFolder => Step::SelectInputFolder(InputFolderPage::default()),
            WizardStep::NameOutputFile => Step::NameOutputFile(OutputFilePage::default()),
            WizardStep::SelectTimeWindow => Step::SelectTimeWindow(TimeWindowPage::default()),
            WizardStep::AssembleAndOrderImages => Step::AssembleAndOrderImages(AssemblePage::default()),
            WizardStep::SelectFrameRate => Step::SelectFrameRate(FrameRatePage::default()),
            WizardStep::ConfirmSummary => Step::ConfirmSummary(SummaryPage::default()),
        }
    }

    pub fn kind(&self) -> WizardStep {
        match self {
            Step::SelectInputFolder(_) => WizardStep::SelectInputFolder,
            Step::NameOutputFile(_) => WizardStep::NameOutputFile,
            Step::SelectTimeWindow(_) => WizardStep::SelectTimeWindow,
            Step::AssembleAndOrderImages(_) => WizardStep::AssembleAndOrderImages,
            Step::SelectFrameRate(_) => WizardStep::SelectFrameRate,
            Step::ConfirmSummary(_) => WizardStep::ConfirmSummary,
        }
    }
}

/// Forward a call to whichever page is active
macro_rules! dispatch {
    ($step:expr, $page:ident => $call:expr) => {
        match $step {
            Step::SelectInputFolder($page) => $call,
            Step::NameOutputFile($page) => $call,
            Step::SelectTimeWindow($page) => $call,
            Step::AssembleAndOrderImages($page) => $call,
            Step::SelectFrameRate($page) => $call,
            Step::ConfirmSummary($page) => $call,
        }
    };
}

impl StepBehavior for Step {
    fn title(&self) -> &'static str {
        self.kind().title()
    }

    fn initialize(&mut self, ctx: &mut StepContext<'_>) -> Result<(), WizardError> {
        dispatch!(self, page => page.initialize(ctx))
    }

    fn handle(&mut self, event: Event, ctx: &mut StepContext<'_>) -> StepSignal {
        dispatch!(self, page => page.handle(event, ctx))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for page tests

    use crate::config::Settings;
    use crate::fs_access::memory::MemoryFs;
    use crate::messaging::{Event, KeyInput};
    use crate::state::SharedConfig;
    use crate::wizard::context::StepContext;
    use chrono::{DateTime, Local, TimeZone};
    use std::path::PathBuf;

    pub struct Fixture {
        pub config: SharedConfig,
        pub settings: Settings,
        pub fs: MemoryFs,
        pub now: DateTime<Local>,
    }

    impl Fixture {
        pub fn new(fs: MemoryFs) -> Self {
            Self {
                config: SharedConfig::new(),
                settings: Settings {
                    input_root: PathBuf::from("/in"),
                    output_root: PathBuf::from("/out"),
                    ..Settings::default()
                },
                fs,
                now: Local.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap(),
            }
        }

        pub fn ctx(&mut self) -> StepContext<'_> {
            StepContext::new(&mut self.config, &self.settings, &self.fs, self.now)
        }
    }

    pub fn key(c: char) -> Event {
        Event::Key(KeyInput::Char(c))
    }

    pub fn typed(text: &str) -> Vec<Event> {
        text.chars().map(key).collect()
    }
}
