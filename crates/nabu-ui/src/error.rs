//! Error taxonomy for the runtime.
//!
//! Only structural load failures abort anything. The rest are reported to
//! the caller and logged, and the session keeps running.

use nabu_markup::{ElementKind, ParseError};

/// Convenience result type for document loads.
pub type LoadResult<T> = Result<T, LoadError>;

/// A document could not be turned into a widget tree at all.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("root element must be <{expected}>, found <{found}>")]
    RootTag { expected: String, found: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A single element's builder rejected its attributes. The element and its
/// subtree are skipped; siblings still compile.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("{kind} range is inverted: minValue {min} > maxValue {max}")]
    InvertedRange { kind: ElementKind, min: f32, max: f32 },

    #[error("constraintCount must be at least 1, got {0}")]
    ConstraintCount(i32),
}

/// A runtime command could not be carried out. Always logged as a warning
/// before being returned; nothing was changed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("element '{0}' not found")]
    UnknownElement(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' needs argument #{index} ({what})")]
    MissingArgument { command: String, index: usize, what: &'static str },

    #[error("'{command}' argument {value:?} is not a valid {what}")]
    InvalidArgument { command: String, value: String, what: &'static str },

    #[error("element '{0}' has no text surface")]
    NoTextSurface(String),

    #[error("element '{0}' is not a progress bar")]
    NotAProgressBar(String),

    #[error("no '{event}' handlers on element '{element}'")]
    NoHandlers { element: String, event: String },

    #[error("no external event handler is installed")]
    NoExternalHandler,

    #[error("resource slot {0} does not exist")]
    UnknownSlot(usize),
}

/// Fetching or decoding image content failed.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no resource '{0}' (tried .png, .jpg, .jpeg)")]
    ResourceNotFound(String),

    #[error("no bundled asset '{0}'")]
    MissingBundle(String),

    #[error("unknown address '{0}'")]
    UnknownAddress(String),

    #[error("http request for {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// A configuration file could not be read or validated.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

impl CommandError {
    pub(crate) fn missing(command: &str, index: usize, what: &'static str) -> Self {
        Self::MissingArgument { command: command.to_string(), index, what }
    }

    pub(crate) fn invalid(command: &str, value: &str, what: &'static str) -> Self {
        Self::InvalidArgument { command: command.to_string(), value: value.to_string(), what }
    }
}
