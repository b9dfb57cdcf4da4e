//! # Domain Errors
//!
//! The two failure families the supervisor distinguishes: transport failures,
//! which always end the current connection, and dispatch faults, which are
//! absorbed at the per-iteration dispatch site.

use thiserror::Error;

/// A connect, probe, read or send failure. Never fatal; the supervisor backs
/// off and reconnects.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The platform answered but reported `ok: false`.
    #[error("{method} failed: {error}")]
    Api { method: String, error: String },

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("connection closed by remote")]
    Closed,

    #[error("failed to decode {0}")]
    Decode(String),

    #[error("{method} response missing '{field}'")]
    MissingField { method: String, field: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Http(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        TransportError::WebSocket(err.to_string())
    }
}

/// Why the image-lookup service produced no URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageLookupError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("invalid JSON body: {0}")]
    Body(String),

    #[error("response has no '{0}' list")]
    MissingList(String),

    #[error("no images returned")]
    Empty,

    #[error("index {index} out of range ({len} results)")]
    OutOfRange { index: usize, len: usize },
}

/// A failure raised while handling a single command.
#[derive(Debug, Error)]
pub enum DispatchFault {
    /// Raised on purpose by the diagnostic command.
    #[error("diagnostic fault: {0}")]
    Diagnostic(String),

    #[error("image lookup failed: {0}")]
    ImageLookup(#[from] ImageLookupError),
}
