use std::fmt;
use std::path::PathBuf;

/// All errors that can occur within vidpred.
///
/// Sampling outcomes that are expected during normal operation (a video too
/// short for the requested window, a sequential pass that ran out of videos)
/// are not errors; they are reported through the sampler's outcome type.
/// Everything here is either a configuration problem, a caller bug, or an I/O
/// failure that aborts the current call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The corpus root does not exist or is not a directory.
    #[error("data directory not found: {}", .0.display())]
    MissingDataDirectory(PathBuf),

    /// A named task has no directory under the corpus root.
    #[error("task {task:?} not found under {}", root.display())]
    UnknownTask { task: String, root: PathBuf },

    /// Random sampling was requested but no configured task has any video.
    #[error("no videos found under {}", .0.display())]
    EmptyCorpus(PathBuf),

    /// Sequential iteration only makes sense over a single task.
    #[error("sequential sampling requires exactly one task, found {tasks}")]
    SequentialRequiresSingleTask { tasks: usize },

    /// Sequential iteration was requested without a video index.
    #[error("sequential sampling requires a video index")]
    MissingIndex,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a file or directory failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A frame could not be decoded.
    #[error("failed to decode {}: {message}", path.display())]
    ImageDecode { path: PathBuf, message: String },

    /// An image or animation could not be written.
    #[error("failed to encode {}: {message}", path.display())]
    ImageEncode { path: PathBuf, message: String },

    /// Two batches (or frames) that must agree in shape do not.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// A flat buffer does not hold the number of elements its shape requires.
    #[error("element count mismatch: expected {expected} elements, got {got}")]
    ElementCountMismatch { expected: usize, got: usize },

    /// The similarity window does not fit inside the frame.
    #[error("window of size {window} does not fit a {height}x{width} frame")]
    WindowTooLarge {
        window: usize,
        height: usize,
        width: usize,
    },

    /// The loader drew too many unavailable samples in a row.
    #[error("gave up after {attempts} consecutive unavailable samples")]
    SamplingStalled { attempts: usize },

    /// A serialized configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }

    /// Shape mismatch between two displayable shapes.
    pub fn shape_mismatch(expected: impl fmt::Display, got: impl fmt::Display) -> Self {
        Error::ShapeMismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience Result type used throughout vidpred.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
