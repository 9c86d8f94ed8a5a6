//! Configuration collected by the wizard steps
//!
//! Filled strictly in step order. Later steps read what earlier ones wrote;
//! reading a field that isn't set yet is a step-order bug and is fatal.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::WizardError;
use crate::time_window::TimeWindow;

#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    input_dir: Option<PathBuf>,
    output_path: Option<PathBuf>,
    window: Option<TimeWindow>,
    ordered_images: Option<Vec<String>>,
    frames_per_second: Option<f64>,
}

impl SharedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // Setters. No validation is performed here; steps validate before writing.

    pub fn set_input_dir(&mut self, dir: PathBuf) {
        self.input_dir = Some(dir);
    }

    pub fn set_output_path(&mut self, path: PathBuf) {
        self.output_path = Some(path);
    }

    pub fn set_window(&mut self, window: TimeWindow) {
        self.window = Some(window);
    }

    pub fn set_ordered_images(&mut self, names: Vec<String>) {
        self.ordered_images = Some(names);
    }

    pub fn set_frames_per_second(&mut self, fps: f64) {
        self.frames_per_second = Some(fps);
    }

    // Getters

    pub fn input_dir(&self) -> Option<&Path> {
        self.input_dir.as_deref()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn window(&self) -> Option<TimeWindow> {
        self.window
    }

    pub fn ordered_images(&self) -> &[String] {
        self.ordered_images.as_deref().unwrap_or(&[])
    }

    pub fn frames_per_second(&self) -> Option<f64> {
        self.frames_per_second
    }

    pub fn require_input_dir(&self) -> Result<&Path, WizardError> {
        self.input_dir().ok_or(WizardError::Incomplete("input folder"))
    }

    pub fn require_output_path(&self) -> Result<&Path, WizardError> {
        self.output_path().ok_or(WizardError::Incomplete("output file"))
    }

    pub fn require_window(&self) -> Result<TimeWindow, WizardError> {
        self.window.ok_or(WizardError::Incomplete("time window"))
    }

    pub fn require_ordered_images(&self) -> Result<&[String], WizardError> {
        self.ordered_images
            .as_deref()
            .ok_or(WizardError::Incomplete("image list"))
    }

    pub fn require_frames_per_second(&self) -> Result<f64, WizardError> {
        self.frames_per_second
            .ok_or(WizardError::Incomplete("frame rate"))
    }

    /// Predicted length of the final video for the configured images and rate
    pub fn predicted_duration(&self) -> Duration {
        match self.frames_per_second {
            Some(fps) => predicted_duration(self.ordered_images().len(), fps),
            None => Duration::ZERO,
        }
    }
}

/// `image_count / fps`, rounded up to whole seconds.
///
/// Rates derived from a screentime or a speedup factor carry rounding error,
/// so a quotient within a relative 1e-9 of a whole number counts as that
/// number.
pub fn predicted_duration(image_count: usize, fps: f64) -> Duration {
    if image_count == 0 || !fps.is_finite() || fps <= 0.0 {
        return Duration::ZERO;
    }
    let seconds = image_count as f64 / fps;
    let nearest = seconds.round();
    let whole = if (seconds - nearest).abs() <= SNAP_TOLERANCE * seconds.max(1.0) {
        nearest
    } else {
        seconds.ceil()
    };
    Duration::from_secs(whole as u64)
}

const SNAP_TOLERANCE: f64 = 1e-9;
