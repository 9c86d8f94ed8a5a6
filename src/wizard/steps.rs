/// Wizard step definitions
///
/// The six steps of the timelapse wizard, in the order they run.

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    /// Pick one subfolder of the input root
    SelectInputFolder,

    /// Name the video file written to the output root
    NameOutputFile,

    /// Enter the daily "HH:MM - HH:MM" capture window
    SelectTimeWindow,

    /// Collect images inside the window and sort them by capture time
    AssembleAndOrderImages,

    /// Choose how the frame rate is derived and enter it
    SelectFrameRate,

    /// Review everything and start rendering
    ConfirmSummary,
}

impl WizardStep {
    /// Get step title
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::SelectInputFolder => "Input Folder",
            WizardStep::NameOutputFile => "Output File",
            WizardStep::SelectTimeWindow => "Time Window",
            WizardStep::AssembleAndOrderImages => "Assemble Images",
            WizardStep::SelectFrameRate => "Frame Rate",
            WizardStep::ConfirmSummary => "Summary",
        }
    }

    /// Get step description
    pub fn description(&self) -> &'static str {
        match self {
            WizardStep::SelectInputFolder => "Select the folder that holds the source images",
            WizardStep::NameOutputFile => "Choose a name for the rendered video",
            WizardStep::SelectTimeWindow => "Only images captured inside this daily window are used",
            WizardStep::AssembleAndOrderImages => "Reading capture times and ordering the images",
            WizardStep::SelectFrameRate => "Decide how fast the images are played back",
            WizardStep::ConfirmSummary => "Check the configuration before rendering",
        }
    }

    /// Get all steps in order
    pub fn all_steps() -> Vec<WizardStep> {
        vec![
            WizardStep::SelectInputFolder,
            WizardStep::NameOutputFile,
            WizardStep::SelectTimeWindow,
            WizardStep::AssembleAndOrderImages,
            WizardStep::SelectFrameRate,
            WizardStep::ConfirmSummary,
        ]
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
