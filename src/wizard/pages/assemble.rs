//! Step 4: collect the images inside the time window and order them
//!
//! Runs without user input. Listing and stat calls happen in one background
//! task; ordering happens in a second one once the first reports back.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Local};
use rayon::prelude::*;

use crate::error::WizardError;
use crate::fs_access::FileSystem;
use crate::messaging::{Event, Task, TaskOutput};
use crate::time_window::TimeWindow;
use crate::wizard::context::StepContext;
use crate::wizard::flow::{StepBehavior, StepSignal};
use crate::wizard::steps::WizardStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssemblePhase {
    #[default]
    Collecting,
    Sorting { matched: usize },
}

#[derive(Debug, Default)]
pub struct AssemblePage {
    phase: AssemblePhase,
}

impl AssemblePage {
    pub fn phase(&self) -> AssemblePhase {
        self.phase
    }
}

impl StepBehavior for AssemblePage {
    fn title(&self) -> &'static str {
        WizardStep::AssembleAndOrderImages.title()
    }

    fn initialize(&mut self, ctx: &mut StepContext<'_>) -> Result<(), WizardError> {
        *self = Self::default();
        let dir = ctx.config.require_input_dir()?.to_path_buf();
        let window = ctx.config.require_window()?;
        ctx.spawn(Task::CollectImages { dir, window });
        Ok(())
    }

    fn handle(&mut self, event: Event, ctx: &mut StepContext<'_>) -> StepSignal {
        match event {
            Event::TaskFinished(TaskOutput::ImagesCollected(result)) => match result {
                Ok(entries) => {
                    tracing::info!("{} images inside the time window", entries.len());
                    self.phase = AssemblePhase::Sorting {
                        matched: entries.len(),
                    };
                    ctx.spawn(Task::OrderImages { entries });
                    StepSignal::StillActive
                }
                Err(err) => StepSignal::Fatal(err),
            },
            Event::TaskFinished(TaskOutput::ImagesOrdered(result)) => match result {
                Ok(names) => {
                    tracing::info!("Ordered {} images", names.len());
                    ctx.config.set_ordered_images(names);
                    StepSignal::Complete
                }
                Err(err) => StepSignal::Fatal(err),
            },
            _ => StepSignal::StillActive,
        }
    }
}

/// Files in `dir` whose modification time lies inside `window`, with that time
pub fn collect_images(
    fs: &dyn FileSystem,
    dir: &Path,
    window: &TimeWindow,
) -> Result<HashMap<String, DateTime<Local>>, WizardError> {
    let entries = fs
        .list_entries(dir)
        .map_err(|e| WizardError::io("cannot read input folder", dir, e))?;

    let stamped: Vec<(String, DateTime<Local>)> = entries
        .into_par_iter()
        .filter(|entry| !entry.is_dir)
        .map(|entry| {
            let path = dir.join(&entry.name);
            fs.stat(&path)
                .map(|modified| (entry.name, modified))
                .map_err(|e| WizardError::io("cannot stat image", path, e))
        })
        .collect::<Result<_, _>>()?;

    let total = stamped.len();
    let matched: HashMap<_, _> = stamped
        .into_iter()
        .filter(|(_, modified)| window.contains(modified))
        .collect();
    tracing::debug!("{} of {} files in {} fall inside the window", matched.len(), total, dir.display());

    Ok(matched)
}
