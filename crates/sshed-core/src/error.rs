use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything a core operation can fail with.
///
/// The first five variants are semantic outcomes of the editor itself;
/// `Io` and `NoConfigFile` come from the backing store.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A host with this name already exists.
    #[error("host '{0}' already exists")]
    Duplicate(String),

    /// No host with this name exists.
    #[error("host '{0}' not found")]
    NotFound(String),

    /// A name or field value that the config dialect cannot hold.
    #[error("{0}")]
    Invalid(String),

    /// Import text is not valid JSON at all.
    #[error("import is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// Import text is valid JSON but not a list of host records.
    #[error("import is not a list of host records: {0}")]
    Shape(String),

    /// An export encoder rejected the collection.
    #[error("failed to encode export: {0}")]
    Encode(String),

    /// Reading or writing the backing file failed.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A backup was requested but there is nothing to copy.
    #[error("no config file at {}", .0.display())]
    NoConfigFile(PathBuf),
}

/// Discriminant of [`ConfigError`] for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Duplicate,
    NotFound,
    Invalid,
    Decode,
    Shape,
    Encode,
    Io,
    NoConfigFile,
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Duplicate(_) => ErrorKind::Duplicate,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Invalid(_) => ErrorKind::Invalid,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Shape(_) => ErrorKind::Shape,
            Self::Encode(_) => ErrorKind::Encode,
            Self::Io { .. } => ErrorKind::Io,
            Self::NoConfigFile(_) => ErrorKind::NoConfigFile,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
