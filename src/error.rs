//! Error handling and custom error types
//!
//! Every media operation surfaces a single `Error` value. The first five
//! variants are the typed outcomes callers branch on; the rest wrap
//! lower-level failures and are folded into `Upstream` at the operation
//! boundary by [`Error::for_operation`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing configuration: {0}")]
    ConfigMissing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    EmptyResult(String),

    /// Failure reported by (or on the way to) the model service. Displays the
    /// upstream message verbatim.
    #[error("{0}")]
    Upstream(String),

    /// Rejection returned by a credential verifier. Displays the verifier's
    /// message verbatim.
    #[error("{0}")]
    LoginRejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl Error {
    /// Normalize a failure at the boundary of a media operation.
    ///
    /// Typed outcomes pass through untouched. Anything else becomes
    /// `Upstream` carrying the underlying message, or `default` when that
    /// message is empty.
    pub fn for_operation(self, default: &str) -> Self {
        match self {
            Self::ConfigMissing(_)
            | Self::InvalidInput(_)
            | Self::EmptyResult(_)
            | Self::LoginRejected(_) => self,
            Self::Upstream(message) if message.trim().is_empty() => {
                Self::Upstream(default.to_string())
            }
            Self::Upstream(_) => self,
            other => {
                let message = match &other {
                    Self::Http(e) => e.to_string(),
                    Self::Serialization(e) => e.to_string(),
                    Self::Io(e) => e.to_string(),
                    Self::Image(e) => e.to_string(),
                    Self::Decode(e) => e.to_string(),
                    _ => String::new(),
                };
                if message.trim().is_empty() {
                    Self::Upstream(default.to_string())
                } else {
                    Self::Upstream(message)
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
