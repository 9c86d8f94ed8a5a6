//! Background task types
//!
//! Tasks are requests for slow work (directory scans, stat calls, encoding).
//! They run off the event loop and report back as `Event::TaskFinished`.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use super::events::TaskOutput;
use crate::encoder::Encoder;
use crate::error::{EncodeError, WizardError};
use crate::fs_access::FileSystem;
use crate::ordering;
use crate::render::RenderJob;
use crate::time_window::TimeWindow;
use crate::wizard::pages::{assemble, input_folder};

/// Background tasks
#[derive(Debug, Clone)]
pub enum Task {
    /// List subfolders of the input root and count their files
    ScanFolders { root: PathBuf },

    /// List and stat the input folder, keeping images inside the window
    CollectImages { dir: PathBuf, window: TimeWindow },

    /// Sort collected images by capture time
    OrderImages {
        entries: HashMap<String, DateTime<Local>>,
    },

    /// Link the ordered images into a renumbered view and run the encoder
    Render { job: RenderJob },
}

impl Task {
    /// Short label, used for worker thread names and logs
    pub fn label(&self) -> &'static str {
        match self {
            Task::ScanFolders { .. } => "scan-folders",
            Task::CollectImages { .. } => "collect-images",
            Task::OrderImages { .. } => "order-images",
            Task::Render { .. } => "render",
        }
    }

    /// Run the task to completion on the current thread
    pub fn run(self, fs: &dyn FileSystem, encoder: &dyn Encoder) -> TaskOutput {
        match self {
            Task::ScanFolders { root } => {
                TaskOutput::FoldersScanned(input_folder::scan_folders(fs, &root))
            }
            Task::CollectImages { dir, window } => {
                TaskOutput::ImagesCollected(assemble::collect_images(fs, &dir, &window))
            }
            Task::OrderImages { entries } => TaskOutput::ImagesOrdered(Ok(ordering::order(&entries))),
            Task::Render { job } => TaskOutput::Rendered(job.run(encoder)),
        }
    }

    /// Output reported when the worker for this task could not be started
    pub fn spawn_failed(&self, err: io::Error) -> TaskOutput {
        let fail = || WizardError::Task(format!("{}: {}", self.label(), err));
        match self {
            Task::ScanFolders { .. } => TaskOutput::FoldersScanned(Err(fail())),
            Task::CollectImages { .. } => TaskOutput::ImagesCollected(Err(fail())),
            Task::OrderImages { .. } => TaskOutput::ImagesOrdered(Err(fail())),
            Task::Render { .. } => {
                TaskOutput::Rendered(Err(EncodeError::Worker(format!("{}: {}", self.label(), err))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tests::RecordingEncoder;
    use crate::fs_access::memory::MemoryFs;
    use chrono::TimeZone;

    #[test]
    fn test_order_task_runs_orderer() {
        let t = |s| Local.with_ymd_and_hms(2023, 1, 1, 10, 0, s).unwrap();
        let entries: HashMap<String, DateTime<Local>> = [("b.jpg", t(1)), ("a.jpg", t(2)), ("c.jpg", t(1))]
            .into_iter()
            .map(|(n, t)| (n.to_string(), t))
            .collect();

        let output = Task::OrderImages { entries }.run(&MemoryFs::new(), &RecordingEncoder::default());
        match output {
            TaskOutput::ImagesOrdered(Ok(names)) => assert_eq!(names, vec!["b.jpg", "c.jpg", "a.jpg"]),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_spawn_failed_maps_to_task_kind() {
        let task = Task::ScanFolders { root: PathBuf::from("/in") };
        let output = task.spawn_failed(io::Error::new(io::ErrorKind::Other, "no threads"));
        match output {
            TaskOutput::FoldersScanned(Err(WizardError::Task(msg))) => {
                assert_eq!(msg, "scan-folders: no threads")
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }
}
