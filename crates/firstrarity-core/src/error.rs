//! Error types shared by every pipeline stage

use std::fmt;
use std::io;

use thiserror::Error;

/// Coarse classification of a failed HTTP request, used for the diagnostic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorCategory {
    /// The server answered with a non-success status.
    Status,
    /// DNS, TLS or socket failure before a response arrived.
    Connection,
    /// The request did not complete within the agent timeout.
    Timeout,
    /// Anything else (malformed URL, unreadable body, ...).
    Other,
}

impl fmt::Display for HttpErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Status => "HTTP Error",
            Self::Connection => "Connection Error",
            Self::Timeout => "Timeout Error",
            Self::Other => "Something Else",
        };
        f.write_str(label)
    }
}

/// Errors surfaced by the rarity pipeline. All of them are fatal to a run.
#[derive(Debug, Error)]
pub enum RarityError {
    /// A request to the paginated index or the ABI endpoint failed.
    #[error("{category}: {message}")]
    Http {
        category: HttpErrorCategory,
        message: String,
    },
    /// The contract call or the ABI it depends on was rejected.
    #[error("contract error: {0}")]
    Contract(String),
    /// A response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// The enumerated identifier set does not match the universe size.
    #[error("there should be {expected} tokens but {actual} were collected")]
    Inconsistent { expected: usize, actual: usize },
    /// Configuration is unusable.
    #[error("invalid config: {0}")]
    Config(String),
    /// Filesystem failures while writing reports.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Histogram encoding failed.
    #[error("image error: {0}")]
    Image(String),
}

impl RarityError {
    pub(crate) fn http(category: HttpErrorCategory, message: impl Into<String>) -> Self {
        Self::Http {
            category,
            message: message.into(),
        }
    }
}

impl From<ureq::Error> for RarityError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => Self::http(
                HttpErrorCategory::Status,
                format!("{code} {} for {}", response.status_text(), response.get_url()),
            ),
            ureq::Error::Transport(transport) => {
                let category = match transport.kind() {
                    ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => {
                        HttpErrorCategory::Connection
                    }
                    ureq::ErrorKind::Io if is_timeout(&transport) => HttpErrorCategory::Timeout,
                    ureq::ErrorKind::Io => HttpErrorCategory::Connection,
                    _ => HttpErrorCategory::Other,
                };
                Self::http(category, transport.to_string())
            }
        }
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some_and(|io_err| {
            matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            )
        })
}

impl From<serde_json::Error> for RarityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<image::ImageError> for RarityError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RarityError>;
