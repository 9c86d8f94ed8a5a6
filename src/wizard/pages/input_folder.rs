//! Step 1: pick the folder that holds the source images

use std::path::Path;

use crate::error::WizardError;
use crate::fs_access::FileSystem;
use crate::messaging::{Event, FolderSummary, KeyInput, Task, TaskOutput};
use crate::wizard::context::StepContext;
use crate::wizard::flow::{StepBehavior, StepSignal};
use crate::wizard::steps::WizardStep;

#[derive(Debug, Default)]
pub struct InputFolderPage {
    folders: Vec<FolderSummary>,
    cursor: usize,
    /// A scan is in flight
    scanning: bool,
    /// At least one scan has finished
    loaded: bool,
}

impl InputFolderPage {
    pub fn folders(&self) -> &[FolderSummary] {
        &self.folders
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn selected(&self) -> Option<&FolderSummary> {
        self.folders.get(self.cursor)
    }

    fn request_scan(&mut self, ctx: &mut StepContext<'_>) {
        self.scanning = true;
        ctx.spawn(Task::ScanFolders {
            root: ctx.settings.input_root.clone(),
        });
    }
}

impl StepBehavior for InputFolderPage {
    fn title(&self) -> &'static str {
        WizardStep::SelectInputFolder.title()
    }

    fn initialize(&mut self, ctx: &mut StepContext<'_>) -> Result<(), WizardError> {
        *self = Self::default();
        self.request_scan(ctx);
        Ok(())
    }

    fn handle(&mut self, event: Event, ctx: &mut StepContext<'_>) -> StepSignal {
        match event {
            Event::TaskFinished(TaskOutput::FoldersScanned(result)) => {
                self.scanning = false;
                match result {
                    Ok(folders) => {
                        tracing::info!("Found {} input folders", folders.len());
                        self.folders = folders;
                        self.cursor = self.cursor.min(self.folders.len().saturating_sub(1));
                        self.loaded = true;
                    }
                    Err(err) => return StepSignal::Fatal(err),
                }
            }
            Event::Key(KeyInput::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Event::Key(KeyInput::Down) => {
                if self.cursor + 1 < self.folders.len() {
                    self.cursor += 1;
                }
            }
            Event::Key(KeyInput::Char('r')) => {
                if !self.scanning {
                    tracing::debug!("Reloading input folders");
                    self.request_scan(ctx);
                }
            }
            Event::Key(KeyInput::Enter) => {
                if !self.loaded || self.scanning {
                    return StepSignal::StillActive;
                }
                if let Some(folder) = self.selected() {
                    let dir = ctx.settings.input_root.join(&folder.name);
                    tracing::info!("Selected input folder: {}", dir.display());
                    ctx.config.set_input_dir(dir);
                    return StepSignal::Complete;
                }
            }
            _ => {}
        }
        StepSignal::StillActive
    }
}

/// List the subfolders of `root` with the number of files in each, sorted by name
pub fn scan_folders(fs: &dyn FileSystem, root: &Path) -> Result<Vec<FolderSummary>, WizardError> {
    let entries = fs
        .list_entries(root)
        .map_err(|e| WizardError::io("cannot read input root", root, e))?;

    let mut folders = Vec::new();
    for entry in entries.into_iter().filter(|e| e.is_dir) {
        let dir = root.join(&entry.name);
        let file_count = fs
            .list_entries(&dir)
            .map_err(|e| WizardError::io("cannot read input folder", &dir, e))?
            .iter()
            .filter(|e| !e.is_dir)
            .count();
        folders.push(FolderSummary {
            name: entry.name,
            file_count,
        });
    }

    folders.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_access::memory::MemoryFs;
    use crate::wizard::pages::testing::{key, Fixture};
    use chrono::{Local, TimeZone};
    use std::path::PathBuf;

    fn tree() -> MemoryFs {
        let t = Local.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap();
        MemoryFs::new()
            .dir("/in")
            .dir("/in/garden")
            .file("/in/garden/1.jpg", t)
            .file("/in/garden/2.jpg", t)
            .dir("/in/garden/thumbs")
            .dir("/in/balcony")
            .file("/in/balcony/1.jpg", t)
            .file("/in/notes.txt", t)
    }

    fn scanned(fix: &mut Fixture, page: &mut InputFolderPage) {
        let tasks = {
            let mut ctx = fix.ctx();
            page.initialize(&mut ctx).unwrap();
            ctx.take_tasks()
        };
        assert_eq!(tasks.len(), 1);
        let output = tasks
            .into_iter()
            .next()
            .unwrap()
            .run(&fix.fs, &crate::encoder::tests::RecordingEncoder::default());
        page.handle(Event::TaskFinished(output), &mut fix.ctx());
    }

    #[test]
    fn test_scan_folders_counts_files() {
        let folders = scan_folders(&tree(), Path::new("/in")).unwrap();
        assert_eq!(
            folders,
            vec![
                FolderSummary { name: "balcony".into(), file_count: 1 },
                FolderSummary { name: "garden".into(), file_count: 2 },
            ]
        );
    }

    #[test]
    fn test_scan_folders_unreadable_subfolder() {
        let fs = tree().unreadable("/in/locked");
        let err = scan_folders(&fs, Path::new("/in")).unwrap_err();
        assert!(matches!(err, WizardError::Io { ref path, .. } if path == Path::new("/in/locked")));
    }

    #[test]
    fn test_enter_ignored_until_loaded() {
        let mut fix = Fixture::new(tree());
        let mut page = InputFolderPage::default();
        page.initialize(&mut fix.ctx()).unwrap();

        assert!(page.is_scanning());
        assert!(matches!(
            page.handle(Event::Key(KeyInput::Enter), &mut fix.ctx()),
            StepSignal::StillActive
        ));
        assert!(fix.config.input_dir().is_none());
    }

    #[test]
    fn test_select_folder() {
        let mut fix = Fixture::new(tree());
        let mut page = InputFolderPage::default();
        scanned(&mut fix, &mut page);

        page.handle(Event::Key(KeyInput::Down), &mut fix.ctx());
        page.handle(Event::Key(KeyInput::Down), &mut fix.ctx());
        assert_eq!(page.cursor(), 1);

        let signal = page.handle(Event::Key(KeyInput::Enter), &mut fix.ctx());
        assert!(matches!(signal, StepSignal::Complete));
        assert_eq!(fix.config.input_dir(), Some(PathBuf::from("/in/garden").as_path()));
    }

    #[test]
    fn test_reload_only_one_scan_in_flight() {
        let mut fix = Fixture::new(tree());
        let mut page = InputFolderPage::default();
        scanned(&mut fix, &mut page);

        let mut ctx = fix.ctx();
        page.handle(key('r'), &mut ctx);
        page.handle(key('r'), &mut ctx);
        assert_eq!(ctx.take_tasks().len(), 1);
        assert!(page.is_scanning());

        // Enter waits for the reload to finish
        assert!(matches!(
            page.handle(Event::Key(KeyInput::Enter), &mut ctx),
            StepSignal::StillActive
        ));
    }

    #[test]
    fn test_empty_root_cannot_complete() {
        let mut fix = Fixture::new(MemoryFs::new().dir("/in"));
        let mut page = InputFolderPage::default();
        scanned(&mut fix, &mut page);

        assert!(page.folders().is_empty());
        assert!(matches!(
            page.handle(Event::Key(KeyInput::Enter), &mut fix.ctx()),
            StepSignal::StillActive
        ));
    }

    #[test]
    fn test_scan_error_is_fatal() {
        let mut fix = Fixture::new(MemoryFs::new());
        let mut page = InputFolderPage::default();
        page.initialize(&mut fix.ctx()).unwrap();

        let output = TaskOutput::FoldersScanned(scan_folders(&fix.fs, Path::new("/in")));
        assert!(matches!(
            page.handle(Event::TaskFinished(output), &mut fix.ctx()),
            StepSignal::Fatal(WizardError::Io { .. })
        ));
    }
}
