use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading the binary catalog stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("record truncated: stream ended inside a record")]
    Truncated,

    #[error("bad magic: expected \"DSOB\", got {actual:?}")]
    BadMagic { actual: [u8; 4] },

    #[error("unsupported catalog format version {0}")]
    UnsupportedVersion(u32),

    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("io error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::Truncated
        } else {
            DecodeError::Io(err)
        }
    }
}

/// Failure converting one row of the legacy text catalog.
#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("expected {expected} fields, found {found}")]
    MissingField { expected: usize, found: usize },

    #[error("invalid number in field {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid coordinate {value:?}")]
    InvalidCoordinate { value: String },
}

/// A malformed line in a name file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

/// Failure that aborts a whole load or conversion.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl LoadError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoadError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Result of loading or reloading a catalog set.
pub type Result<T> = std::result::Result<T, LoadError>;
