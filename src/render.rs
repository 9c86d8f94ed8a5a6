//! Renumbered image view and encoder handoff
//!
//! ffmpeg's image2 demuxer wants a contiguous numbered sequence. The ordered
//! images are linked into a temporary directory as `0000000000.jpg`,
//! `0000000001.jpg`, ... and the directory is removed once the encoder exits.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::encoder::{EncodeJob, Encoder};
use crate::error::{EncodeError, WizardError};
use crate::state::SharedConfig;

const DEFAULT_EXTENSION: &str = "jpg";

/// Everything needed to render the configured timelapse
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub input_dir: PathBuf,
    /// Image names in playback order
    pub images: Vec<String>,
    pub output_path: PathBuf,
    pub frames_per_second: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub output_path: PathBuf,
    pub frame_count: usize,
}

impl RenderJob {
    /// Build the job from a fully configured wizard run
    pub fn from_config(config: &SharedConfig) -> Result<Self, WizardError> {
        Ok(Self {
            input_dir: config.require_input_dir()?.to_path_buf(),
            images: config.require_ordered_images()?.to_vec(),
            output_path: config.require_output_path()?.to_path_buf(),
            frames_per_second: config.require_frames_per_second()?,
        })
    }

    /// Link the images, run the encoder and clean up.
    pub fn run(&self, encoder: &dyn Encoder) -> Result<RenderReport, EncodeError> {
        if self.images.is_empty() {
            return Err(EncodeError::Prepare(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no images to render",
            )));
        }

        let view = self.prepare().map_err(EncodeError::Prepare)?;
        let extension = self.extension();
        let job = EncodeJob {
            input_pattern: view.path().join(format!("%010d.{}", extension)),
            frame_count: self.images.len(),
            output_path: self.output_path.clone(),
            frames_per_second: self.frames_per_second,
        };

        let result = encoder.encode(&job);

        let view_path = view.path().to_path_buf();
        if let Err(e) = view.close() {
            tracing::warn!("Failed to remove frame view {}: {}", view_path.display(), e);
        }

        result.map(|()| RenderReport {
            output_path: self.output_path.clone(),
            frame_count: self.images.len(),
        })
    }

    /// Extension of the first image, used for every link
    fn extension(&self) -> String {
        self.images
            .first()
            .and_then(|name| Path::new(name).extension())
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    }

    fn prepare(&self) -> io::Result<TempDir> {
        let view = tempfile::Builder::new().prefix("timelapse-frames-").tempdir()?;
        let extension = self.extension();

        for (index, name) in self.images.iter().enumerate() {
            let source = self.input_dir.join(name);
            let target = view.path().join(format!("{:010}.{}", index, extension));
            link(&source, &target)?;
        }

        tracing::debug!(
            "Linked {} frames into {}",
            self.images.len(),
            view.path().display()
        );
        Ok(view)
    }
}

#[cfg(unix)]
fn link(source: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(windows)]
fn link(source: &Path, target: &Path) -> io::Result<()> {
    // Symlinks need developer mode or admin rights on Windows
    std::os::windows::fs::symlink_file(source, target)
        .or_else(|_| std::fs::copy(source, target).map(|_| ()))
}

#[cfg(not(any(unix, windows)))]
fn link(source: &Path, target: &Path) -> io::Result<()> {
    std::fs::copy(source, target).map(|_| ())
}
