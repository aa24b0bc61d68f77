//! Error types for the simulation.

use std::fmt;
use std::path::PathBuf;

/// Result type for fallible simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of normal simulation states.
///
/// Crashing into a planet or falling through a wormhole are not errors; see
/// [`crate::model::StepOutcome`] for those.
#[derive(Debug)]
pub enum Error {
    /// A zero-length (or non-finite) vector was normalized.
    DegenerateVector,
    /// A planet index did not refer to an existing planet.
    NoSuchPlanet {
        /// The index that was asked for.
        index: usize,
        /// How many planets the system has.
        count: usize,
    },
    /// Reading or writing a save file failed.
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// A save file could not be encoded or decoded.
    Format {
        /// The file involved.
        path: PathBuf,
        /// The error message.
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateVector => write!(f, "cannot normalize a zero-length vector"),
            Self::NoSuchPlanet { index, count } => {
                write!(f, "no planet at index {} (system has {})", index, count)
            }
            Self::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            Self::Format { path, message } => {
                write!(f, "bad save file {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
