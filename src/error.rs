//! Application-level errors using thiserror for structured error handling.
//!
//! Parse and validation errors stay inside the step that produced them and
//! only ever reach the screen. `WizardError` is fatal and ends the run through
//! the orchestrator. `anyhow` is used at the application edge.

use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

/// Malformed user input. Recoverable, the step re-prompts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("failed to parse from time: {0:?} is not HH:MM")]
    FromClock(String),

    #[error("failed to parse to time: {0:?} is not HH:MM")]
    ToClock(String),

    #[error("input does not match required format \"HH:MM - HH:MM\"")]
    WindowPattern,

    #[error("{input:?} is not a number")]
    Number {
        input: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Well-formed input that is rejected on its meaning. Recoverable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("output file name must not be empty")]
    EmptyName,

    #[error("output file name must not contain a path separator: {0}")]
    InvalidName(String),

    #[error("{} already exists", .0.display())]
    OutputExists(PathBuf),

    #[error("frame rate must be a positive number, got {0}")]
    NonPositiveRate(f64),

    #[error("image screentime must be a positive number of milliseconds, got {0}")]
    NonPositiveScreentime(f64),

    #[error("speedup factor must be a positive number, got {0}")]
    NonPositiveFactor(f64),

    /// The last image is not newer than the first: a single image, equal
    /// timestamps, or a file modified after ordering.
    #[error("last image is not newer than the first, cannot derive a speedup")]
    EmptySpan,

    #[error("no images in the configured time window")]
    NoImages,

    #[error("time window ends before it starts")]
    InvertedWindow,
}

/// Either kind of recoverable input error, as shown below a prompt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Fatal errors. Any of these terminates the wizard.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("{context}: {}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} has not been configured yet")]
    Incomplete(&'static str),

    #[error("background task failed: {0}")]
    Task(String),
}

impl WizardError {
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WizardError::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

/// Failure while converting frame-rate input.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Fatal(#[from] WizardError),
}

impl From<ParseError> for StrategyError {
    fn from(err: ParseError) -> Self {
        StrategyError::Input(err.into())
    }
}

impl From<ValidationError> for StrategyError {
    fn from(err: ValidationError) -> Self {
        StrategyError::Input(err.into())
    }
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to prepare renumbered image view")]
    Prepare(#[source] std::io::Error),

    #[error("failed to start encoder {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("encoder exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("render worker failed: {0}")]
    Worker(String),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
