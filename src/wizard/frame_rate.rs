//! Frame-rate strategies
//!
//! Three ways of arriving at a frames-per-second value: type it directly,
//! give the screentime of one image, or give a speedup factor relative to the
//! real time elapsed between the first and last image.

use std::path::Path;

use chrono::Duration;

use crate::error::{ParseError, StrategyError, ValidationError, WizardError};
use crate::fs_access::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRateStrategy {
    /// Images per second
    Direct,
    /// Milliseconds each image stays on screen
    Screentime,
    /// Speedup over the capture span
    ElapsedFactor,
}

/// The ordered images a strategy may need to inspect
pub struct ImageSequence<'a> {
    pub dir: &'a Path,
    pub names: &'a [String],
    pub fs: &'a dyn FileSystem,
}

impl ImageSequence<'_> {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Time between the first and last image, read fresh from the filesystem
    pub fn elapsed(&self) -> Result<Duration, StrategyError> {
        let (Some(first), Some(last)) = (self.names.first(), self.names.last()) else {
            return Err(ValidationError::NoImages.into());
        };

        let first_time = self.modified(first)?;
        let last_time = self.modified(last)?;
        Ok(last_time - first_time)
    }

    fn modified(&self, name: &str) -> Result<chrono::DateTime<chrono::Local>, WizardError> {
        let path = self.dir.join(name);
        self.fs
            .stat(&path)
            .map_err(|e| WizardError::io("cannot stat image", path, e))
    }
}

impl FrameRateStrategy {
    pub const ALL: [FrameRateStrategy; 3] = [
        FrameRateStrategy::Direct,
        FrameRateStrategy::Screentime,
        FrameRateStrategy::ElapsedFactor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FrameRateStrategy::Direct => "Normal",
            FrameRateStrategy::Screentime => "Reverse",
            FrameRateStrategy::ElapsedFactor => "Factor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FrameRateStrategy::Direct => "Select the frame rate, e.g. 30 images per second",
            FrameRateStrategy::Screentime => "Select how long each image is shown, e.g. 30 ms per image",
            FrameRateStrategy::ElapsedFactor => {
                "Select a speedup factor relative to the time from first to last image"
            }
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            FrameRateStrategy::Direct => "Framerate (img/s)",
            FrameRateStrategy::Screentime => "Image screentime (ms/img)",
            FrameRateStrategy::ElapsedFactor => "Speedup factor",
        }
    }

    /// Convert raw user input into frames per second
    pub fn convert(&self, raw: &str, images: &ImageSequence<'_>) -> Result<f64, StrategyError> {
        let value = parse_number(raw)?;
        match self {
            FrameRateStrategy::Direct => {
                if !is_positive(value) {
                    return Err(ValidationError::NonPositiveRate(value).into());
                }
                Ok(value)
            }
            FrameRateStrategy::Screentime => {
                if !is_positive(value) {
                    return Err(ValidationError::NonPositiveScreentime(value).into());
                }
                Ok(1000.0 / value)
            }
            FrameRateStrategy::ElapsedFactor => {
                if !is_positive(value) {
                    return Err(ValidationError::NonPositiveFactor(value).into());
                }
                let span = images.elapsed()?;
                let span_secs = span.num_milliseconds() as f64 / 1000.0;
                if span_secs <= 0.0 {
                    return Err(ValidationError::EmptySpan.into());
                }
                let fps = images.len() as f64 / (span_secs / value);
                if !is_positive(fps) {
                    return Err(ValidationError::NonPositiveRate(fps).into());
                }
                Ok(fps)
            }
        }
    }
}

impl std::fmt::Display for FrameRateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse a decimal number, accepting `,` as the decimal separator
pub fn parse_number(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    trimmed
        .replacen(',', ".", 1)
        .parse::<f64>()
        .map_err(|source| ParseError::Number {
            input: trimmed.to_string(),
            source,
        })
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use crate::fs_access::memory::MemoryFs;
    use crate::state::predicted_duration;
    use chrono::{Local, TimeZone};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn fs_with_span(seconds: u32) -> MemoryFs {
        let t0 = Local.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap();
        MemoryFs::new()
            .dir("/in")
            .file("/in/a.jpg", t0)
            .file("/in/b.jpg", t0 + Duration::seconds(i64::from(seconds) / 2))
            .file("/in/c.jpg", t0 + Duration::seconds(i64::from(seconds)))
    }

    fn convert(strategy: FrameRateStrategy, raw: &str, fs: &MemoryFs, list: &[String]) -> Result<f64, StrategyError> {
        let images = ImageSequence {
            dir: Path::new("/in"),
            names: list,
            fs,
        };
        strategy.convert(raw, &images)
    }

    fn validation(result: Result<f64, StrategyError>) -> ValidationError {
        match result {
            Err(StrategyError::Input(InputError::Validation(err))) => err,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_number_accepts_comma() {
        assert_eq!(parse_number("2,5").unwrap(), 2.5);
        assert_eq!(parse_number(" 30 ").unwrap(), 30.0);
        assert!(matches!(parse_number("abc"), Err(ParseError::Number { input, .. }) if input == "abc"));
        assert!(parse_number("").is_err());
    }

    #[test]
    fn test_direct() {
        let fs = MemoryFs::new();
        assert_eq!(convert(FrameRateStrategy::Direct, "25", &fs, &[]).unwrap(), 25.0);
        assert_eq!(
            validation(convert(FrameRateStrategy::Direct, "0", &fs, &[])),
            ValidationError::NonPositiveRate(0.0)
        );
        assert!(matches!(
            validation(convert(FrameRateStrategy::Direct, "inf", &fs, &[])),
            ValidationError::NonPositiveRate(_)
        ));
    }

    #[test]
    fn test_screentime() {
        let fs = MemoryFs::new();
        assert_eq!(convert(FrameRateStrategy::Screentime, "40", &fs, &[]).unwrap(), 25.0);
        assert_eq!(convert(FrameRateStrategy::Screentime, "12,5", &fs, &[]).unwrap(), 80.0);
        assert_eq!(
            validation(convert(FrameRateStrategy::Screentime, "-10", &fs, &[])),
            ValidationError::NonPositiveScreentime(-10.0)
        );
    }

    #[test]
    fn test_elapsed_factor() {
        let fs = fs_with_span(600);
        let list = names(&["a.jpg", "b.jpg", "c.jpg"]);

        // 600s captured, shown 60 times faster = 10s for 3 images
        let fps = convert(FrameRateStrategy::ElapsedFactor, "60", &fs, &list).unwrap();
        assert!((fps - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_whole_second_durations_are_not_rounded_up() {
        // 11 images one minute apart from first to last, played at real speed
        let t0 = Local.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap();
        let list: Vec<String> = (0..11).map(|i| format!("{:02}.jpg", i)).collect();
        let fs = MemoryFs::new()
            .dir("/in")
            .file("/in/00.jpg", t0)
            .file("/in/10.jpg", t0 + Duration::seconds(60));
        let fps = convert(FrameRateStrategy::ElapsedFactor, "1", &fs, &list).unwrap();
        assert_eq!(predicted_duration(list.len(), fps), std::time::Duration::from_secs(60));

        let fps = convert(FrameRateStrategy::Screentime, "61", &fs, &[]).unwrap();
        assert_eq!(predicted_duration(1000, fps), std::time::Duration::from_secs(61));
    }

    #[test]
    fn test_elapsed_factor_rejects_bad_factor() {
        let fs = fs_with_span(600);
        let list = names(&["a.jpg", "c.jpg"]);

        for raw in ["0", "-2", "NaN"] {
            assert!(matches!(
                validation(convert(FrameRateStrategy::ElapsedFactor, raw, &fs, &list)),
                ValidationError::NonPositiveFactor(_)
            ));
        }
    }

    #[test]
    fn test_elapsed_factor_empty_span() {
        let fs = fs_with_span(600);
        let single = names(&["b.jpg"]);
        assert_eq!(
            validation(convert(FrameRateStrategy::ElapsedFactor, "10", &fs, &single)),
            ValidationError::EmptySpan
        );

        assert_eq!(
            validation(convert(FrameRateStrategy::ElapsedFactor, "10", &fs, &[])),
            ValidationError::NoImages
        );
    }

    #[test]
    fn test_elapsed_factor_backwards_span() {
        // Last image touched before the first one after ordering
        let fs = fs_with_span(600);
        let list = names(&["c.jpg", "a.jpg"]);
        let err = validation(convert(FrameRateStrategy::ElapsedFactor, "10", &fs, &list));
        assert_eq!(err, ValidationError::EmptySpan);
        assert_eq!(
            err.to_string(),
            "last image is not newer than the first, cannot derive a speedup"
        );
    }

    #[test]
    fn test_elapsed_factor_stat_failure_is_fatal() {
        let fs = fs_with_span(600);
        let list = names(&["a.jpg", "gone.jpg"]);
        assert!(matches!(
            convert(FrameRateStrategy::ElapsedFactor, "10", &fs, &list),
            Err(StrategyError::Fatal(WizardError::Io { .. }))
        ));
    }

    #[test]
    fn test_parse_error_before_stat() {
        let fs = MemoryFs::new();
        let list = names(&["gone.jpg"]);
        assert!(matches!(
            convert(FrameRateStrategy::ElapsedFactor, "fast", &fs, &list),
            Err(StrategyError::Input(InputError::Parse(ParseError::Number { .. })))
        ));
    }

    #[test]
    fn test_names_and_prompts() {
        let names: Vec<_> = FrameRateStrategy::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Normal", "Reverse", "Factor"]);
        assert_eq!(FrameRateStrategy::Screentime.prompt(), "Image screentime (ms/img)");
    }
}
