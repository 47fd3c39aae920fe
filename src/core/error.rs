//! Error types for the APNs client.

use thiserror::Error;

/// Errors raised while assembling a payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The custom key is reserved for the library.
    #[error("cannot assign a custom value for reserved key {0:?}")]
    ReservedKey(String),

    /// The custom value could not be represented as JSON.
    #[error("custom value is not JSON-representable: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while encoding a notification to its wire frame.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The device token is not 64 hex characters (32 bytes).
    #[error("invalid device token")]
    InvalidToken,

    /// Payload serialization failed.
    #[error("payload marshal error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session is not connected to the gateway.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called on a session that already left the new state.
    #[error("can't connect unless the session is new")]
    AlreadyStarted,

    /// The notification could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// I/O error on the gateway connection.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Session error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Gateway or identity configuration error.
    #[error("tls error: {0}")]
    Tls(#[from] crate::transport::TlsError),

    /// The retry policy gave up before a reconnect succeeded.
    #[error("gave up reconnecting after {attempts} attempts")]
    ReconnectExhausted {
        /// Connect attempts made before giving up.
        attempts: u32,
    },
}
