//! Error types for piccache

use std::fmt;
use std::io;

/// Result type alias for piccache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error raised by a backing source
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for cache operations
#[derive(Debug)]
pub enum Error {
    /// Key not found (cache miss, or unknown to the backing source)
    KeyNotFound,

    /// Backing source failed while loading a missed key
    Source(SourceError),

    /// Invalid cache configuration
    Config(String),

    /// I/O error while reading configuration
    Io(io::Error),
}

impl Error {
    /// Wrap a backing source failure
    pub fn source_failed<E>(err: E) -> Self
    where
        E: Into<SourceError>,
    {
        Error::Source(err.into())
    }

    /// True for a plain cache miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "Key not found"),
            Error::Source(e) => write!(f, "Backing source error: {}", e),
            Error::Config(msg) => write!(f, "Invalid cache configuration: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Source(e) => Some(e.as_ref()),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}
