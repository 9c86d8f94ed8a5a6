use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppResult;
use anyhow::Context;

const APP_DIR: &str = "TimelapseWizard";
const SETTINGS_FILE: &str = "settings.json";

fn default_root(leaf: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timelapse")
        .join(leaf)
}

/// Parameters handed to the external encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    /// ffmpeg executable, looked up on PATH unless absolute
    pub ffmpeg_path: String,

    pub video_codec: String,

    /// Constant rate factor (lower is better quality)
    pub crf: u8,

    pub pixel_format: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            video_codec: "libx264".to_string(),
            crf: 23,
            pixel_format: "yuv420p".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder whose subfolders hold the source images, one folder per camera
    pub input_root: PathBuf,

    /// Folder that receives the rendered videos
    pub output_root: PathBuf,

    /// Container extension appended to the output name
    pub output_extension: String,

    pub encoder: EncoderSettings,

    /// Redraw interval of the terminal UI in milliseconds
    pub tick_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_root: default_root("input"),
            output_root: default_root("output"),
            output_extension: "mp4".to_string(),
            encoder: EncoderSettings::default(),
            tick_ms: 120,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the platform config directory.
    /// Creates the default file if it doesn't exist yet.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let settings_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::settings_path()?,
        };

        if settings_path.exists() {
            let content = fs::read_to_string(&settings_path)
                .with_context(|| format!("reading settings {}", settings_path.display()))?;
            let settings: Settings = serde_json::from_str(&content)
                .with_context(|| format!("parsing settings {}", settings_path.display()))?;
            tracing::info!("Loaded settings from: {}", settings_path.display());
            Ok(settings)
        } else {
            let settings = Settings::default();
            settings.save(&settings_path)?;
            tracing::info!("Created default settings at: {}", settings_path.display());
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating settings directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing settings {}", path.display()))?;

        Ok(())
    }

    /// Default settings file location
    pub fn settings_path() -> AppResult<PathBuf> {
        let dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Directory for rolling log files
    pub fn log_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    /// Create the input and output roots
    pub fn prepare_roots(&self) -> AppResult<()> {
        for root in [&self.input_root, &self.output_root] {
            fs::create_dir_all(root)
                .with_context(|| format!("creating directory {}", root.display()))?;
        }
        Ok(())
    }

    /// Absolute output path for a user-chosen file name
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_root
            .join(format!("{}.{}", name, self.output_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.output_extension, "mp4");
        assert_eq!(settings.encoder.video_codec, "libx264");
        assert_eq!(settings.encoder.crf, 23);
        assert_eq!(settings.tick_ms, 120);
        assert!(settings.input_root.ends_with("timelapse/input"));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();

        assert_eq!(settings, deserialized);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "input_root": "/srv/cams", "encoder": { "crf": 18 } }"#)
                .unwrap();

        assert_eq!(settings.input_root, PathBuf::from("/srv/cams"));
        assert_eq!(settings.encoder.crf, 18);
        assert_eq!(settings.encoder.ffmpeg_path, "ffmpeg");
        assert_eq!(settings.output_extension, "mp4");
    }

    #[test]
    fn test_load_creates_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("settings.json");

        let settings = Settings::load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(settings, Settings::default());

        let reloaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn test_output_file() {
        let settings = Settings {
            output_root: PathBuf::from("/videos"),
            ..Settings::default()
        };
        assert_eq!(settings.output_file("sunset"), PathBuf::from("/videos/sunset.mp4"));
    }
}
