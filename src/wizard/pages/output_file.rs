//! Step 2: name the output video

use std::path::PathBuf;

use crate::config::Settings;
use crate::error::{InputError, ValidationError, WizardError};
use crate::fs_access::FileSystem;
use crate::messaging::{Event, KeyInput};
use crate::wizard::context::StepContext;
use crate::wizard::flow::{StepBehavior, StepSignal};
use crate::wizard::steps::WizardStep;
use crate::wizard::text_input::TextInput;

#[derive(Debug, Default)]
pub struct OutputFilePage {
    input: TextInput,
    error: Option<InputError>,
}

impl OutputFilePage {
    pub fn input(&self) -> &str {
        self.input.value()
    }

    pub fn error(&self) -> Option<&InputError> {
        self.error.as_ref()
    }
}

impl StepBehavior for OutputFilePage {
    fn title(&self) -> &'static str {
        WizardStep::NameOutputFile.title()
    }

    fn initialize(&mut self, _ctx: &mut StepContext<'_>) -> Result<(), WizardError> {
        *self = Self::default();
        Ok(())
    }

    fn handle(&mut self, event: Event, ctx: &mut StepContext<'_>) -> StepSignal {
        let Event::Key(key) = event else {
            return StepSignal::StillActive;
        };

        if key != KeyInput::Enter {
            self.input.apply(key);
            return StepSignal::StillActive;
        }

        match output_candidate(self.input.value(), ctx.settings, ctx.fs) {
            Ok(path) => {
                tracing::info!("Output file: {}", path.display());
                ctx.config.set_output_path(path);
                StepSignal::Complete
            }
            Err(err) => {
                tracing::debug!("Rejected output name: {}", err);
                self.error = Some(err.into());
                StepSignal::StillActive
            }
        }
    }
}

/// Validate a user-chosen name and build the output path for it
pub fn output_candidate(
    raw: &str,
    settings: &Settings,
    fs: &dyn FileSystem,
) -> Result<PathBuf, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ValidationError::InvalidName(name.to_string()));
    }

    let path = settings.output_file(name);
    if fs.exists(&path) {
        return Err(ValidationError::OutputExists(path));
    }
    Ok(path)
}
