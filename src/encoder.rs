//! Handoff to the external video encoder
//!
//! The wizard never encodes frames itself. It prepares a numbered image
//! sequence and hands it to ffmpeg as a child process.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::config::EncoderSettings;
use crate::error::EncodeError;

/// One encoder invocation
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    /// printf-style pattern of the numbered input frames, e.g. `/tmp/x/%010d.jpg`
    pub input_pattern: PathBuf,
    pub frame_count: usize,
    pub output_path: PathBuf,
    pub frames_per_second: f64,
}

pub trait Encoder: Send + Sync {
    /// Encode the frames of `job` into its output file. Blocks until the
    /// encoder exits.
    fn encode(&self, job: &EncodeJob) -> Result<(), EncodeError>;
}

/// ffmpeg driven through `std::process::Command`
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    settings: EncoderSettings,
}

impl FfmpegEncoder {
    pub fn new(settings: EncoderSettings) -> Self {
        Self { settings }
    }

    /// Command-line arguments for `job`, without the program name
    pub fn args(&self, job: &EncodeJob) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-framerate".to_string(),
            format_rate(job.frames_per_second),
            "-start_number".to_string(),
            "0".to_string(),
            "-i".to_string(),
            job.input_pattern.to_string_lossy().into_owned(),
            "-c:v".to_string(),
            self.settings.video_codec.clone(),
            "-crf".to_string(),
            self.settings.crf.to_string(),
            "-pix_fmt".to_string(),
            self.settings.pixel_format.clone(),
            job.output_path.to_string_lossy().into_owned(),
        ]
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(&self, job: &EncodeJob) -> Result<(), EncodeError> {
        let program = &self.settings.ffmpeg_path;
        let args = self.args(job);
        tracing::info!(
            frames = job.frame_count,
            fps = job.frames_per_second,
            output = %job.output_path.display(),
            "Running {} {}",
            program,
            args.join(" ")
        );

        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| EncodeError::Spawn {
                program: program.clone(),
                source,
            })?;

        if output.status.success() {
            tracing::info!("Encoder finished: {}", job.output_path.display());
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr_tail(&stderr, 20);
            tracing::error!("Encoder failed with {}: {}", output.status, tail);
            Err(EncodeError::Failed {
                status: output.status.to_string(),
                stderr: tail,
            })
        }
    }
}

/// ffmpeg accepts decimal rates; trailing zeros are dropped for readability
fn format_rate(fps: f64) -> String {
    let text = format!("{:.6}", fps);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Last `lines` lines of the encoder's stderr
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let all: Vec<&str> = stderr.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records every job instead of running an encoder
    #[derive(Default)]
    pub struct RecordingEncoder {
        jobs: Mutex<Vec<EncodeJob>>,
        fail: bool,
    }

    impl RecordingEncoder {
        pub fn failing() -> Self {
            Self {
                jobs: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn jobs(&self) -> Vec<EncodeJob> {
            self.jobs.lock().clone()
        }
    }

    impl Encoder for RecordingEncoder {
        fn encode(&self, job: &EncodeJob) -> Result<(), EncodeError> {
            self.jobs.lock().push(job.clone());
            if self.fail {
                return Err(EncodeError::Failed {
                    status: "exit status: 1".to_string(),
                    stderr: "simulated failure".to_string(),
                });
            }
            Ok(())
        }
    }

    fn job() -> EncodeJob {
        EncodeJob {
            input_pattern: PathBuf::from("/tmp/frames/%010d.jpg"),
            frame_count: 5,
            output_path: PathBuf::from("/videos/sunset.mp4"),
            frames_per_second: 2.5,
        }
    }

    #[test]
    fn test_ffmpeg_args() {
        let encoder = FfmpegEncoder::new(EncoderSettings::default());
        assert_eq!(
            encoder.args(&job()),
            vec![
                "-y",
                "-framerate",
                "2.5",
                "-start_number",
                "0",
                "-i",
                "/tmp/frames/%010d.jpg",
                "-c:v",
                "libx264",
                "-crf",
                "23",
                "-pix_fmt",
                "yuv420p",
                "/videos/sunset.mp4",
            ]
        );
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(25.0), "25");
        assert_eq!(format_rate(2.5), "2.5");
        assert_eq!(format_rate(1000.0 / 3.0), "333.333333");
    }

    #[test]
    fn test_stderr_tail() {
        assert_eq!(stderr_tail("a\nb\nc", 2), "b\nc");
        assert_eq!(stderr_tail("a", 5), "a");
        assert_eq!(stderr_tail("", 5), "");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let encoder = FfmpegEncoder::new(EncoderSettings {
            ffmpeg_path: "/nonexistent/ffmpeg-binary".to_string(),
            ..EncoderSettings::default()
        });
        match encoder.encode(&job()) {
            Err(EncodeError::Spawn { program, .. }) => {
                assert_eq!(program, "/nonexistent/ffmpeg-binary")
            }
            other => panic!("expected spawn error, got {:?}", other),
        }
    }

    #[test]
    fn test_recording_encoder() {
        let encoder = RecordingEncoder::default();
        encoder.encode(&job()).unwrap();
        assert_eq!(encoder.jobs(), vec![job()]);

        assert!(RecordingEncoder::failing().encode(&job()).is_err());
    }
}
