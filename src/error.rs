use std::{fmt, io, path::PathBuf};

use reqwest::StatusCode;

/// A convenient Result type alias for operations that may fail.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Reading or writing a local file failed.
    Io { path: PathBuf, source: io::Error },
    /// The HTTP request could not be sent or its body could not be read.
    Transport(reqwest::Error),
    /// The server answered outside the success range.
    Status { status: StatusCode, body: String },
    /// JSON could not be decoded or lacked required content.
    Decode(String),
    /// A manifest line could not be parsed.
    Manifest { line: usize, reason: String },
    /// Configuration could not be resolved.
    Config(String),
    /// The operator did not provide an authorization code.
    Prompt(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code reported by the binary, following `sysexits.h`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Io { .. } => 74,
            Error::Transport(_) | Error::Status { .. } => 69,
            Error::Decode(_) | Error::Manifest { .. } => 65,
            Error::Config(_) => 78,
            Error::Prompt(_) => 66,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Error::Transport(e) => write!(f, "request failed: {}", e),
            Error::Status { status, body } => write!(
                f,
                "Response failed with code: {} and body: \n{}",
                status.as_u16(),
                body
            ),
            Error::Decode(msg) => write!(f, "malformed response: {}", msg),
            Error::Manifest { line, reason } => write!(f, "manifest line {}: {}", line, reason),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::Prompt(msg) => write!(f, "authorization aborted: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
