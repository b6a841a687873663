//! Error types for firmware upload operations

use thiserror::Error;

/// Result type alias for firmware upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

/// A raw input that failed its syntactic check
///
/// Checks run in a fixed order and stop at the first failure, so exactly one
/// of these is ever reported for a set of inputs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid access token")]
    AccessToken,

    #[error("invalid product id")]
    ProductId,

    #[error("invalid firmware path")]
    FirmwarePath,

    #[error("invalid firmware version")]
    FirmwareVersion,

    #[error("invalid title")]
    Title,
}

/// A required input was absent or blank
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Input required and not supplied: {name}")]
pub struct InputError {
    pub name: String,
}

impl InputError {
    pub fn required(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Errors produced by a single upload attempt
///
/// Every variant renders with the same `Error uploading firmware:` prefix so the
/// caller can report any of them verbatim.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The firmware binary could not be read
    #[error("Error uploading firmware: failed to read {path}: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The request never produced an HTTP response
    ///
    /// `message` is the whole cause chain, e.g. down to "Connection refused".
    #[error("Error uploading firmware: {message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The multipart body could not be assembled
    #[error("Error uploading firmware: failed to build request: {0}")]
    Encode(String),

    /// The server answered with anything other than 201 Created
    ///
    /// `body` is the raw response text, whatever its shape.
    #[error("Error uploading firmware: {body} (status code {status})")]
    Upstream { status: u16, body: String },

    /// The server answered 201 but the body was not the expected JSON
    #[error("Error uploading firmware: invalid response body: {0}")]
    InvalidResponse(String),

    /// The endpoint URL could not be built
    #[error("Error uploading firmware: invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl UploadError {
    /// Create an upstream error from status code and raw body
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error, keeping the text of every underlying cause
    pub fn transport(source: reqwest::Error) -> Self {
        Self::Transport {
            message: error_chain(&source),
            source,
        }
    }

    /// HTTP status of the upstream response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        Self::transport(e)
    }
}

/// Render an error and its sources joined by `": "`
///
/// A cause whose text is already part of the message is skipped.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        let text = e.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = e.source();
    }
    message
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid header value for {name}: {message}")]
    InvalidHeader { name: &'static str, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Any failure of a full action run, reported as its inner message
#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}
