//! Error types for GPSD client operations
//!
//! This module defines the errors that can occur while talking to gpsd,
//! decoding its frames, or reading a fix report.

use crate::protocol::Class;

pub use crate::fix::NoFixError;

/// Main error type for GPSD client operations
#[derive(Debug, thiserror::Error)]
pub enum GpsdError {
    /// The byte stream to gpsd failed
    ///
    /// Covers refused connections, resets, and the daemon closing the
    /// stream while a line was expected. The session is unusable afterwards.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// gpsd sent well-formed JSON of an unexpected class
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A line could not be decoded into a frame
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] FrameError),

    /// The current fix mode cannot answer the request
    #[error(transparent)]
    NoFix(#[from] NoFixError),

    /// No GPS device is registered with gpsd
    #[error("no GPS device registered with gpsd")]
    NoDevice,

    /// A request could not be serialized
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Violations of the expected message sequence
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The greeting was not a `VERSION` message
    #[error("not a compatible gpsd server: greeting was {0}, expected VERSION")]
    NotGpsd(Class),

    /// Something other than `DEVICES` or `WATCH` answered the watch request
    #[error("unexpected message class during handshake: {0}")]
    UnexpectedHandshakeClass(Class),

    /// Both acknowledgements arrived but one class never showed up
    #[error("handshake finished without a {0} acknowledgement")]
    MissingAck(Class),

    /// A request was answered with the wrong class
    #[error("expected {expected} reply, got {found}")]
    UnexpectedReply { expected: Class, found: Class },

    /// A frame was fed to a handshake that has already finished
    #[error("handshake already complete")]
    HandshakeComplete,
}

/// Reasons a single line is not a usable frame
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The line is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The line is not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    Utf8(#[source] std::str::Utf8Error),

    /// The line is not an object carrying a string `class` field
    #[error("missing \"class\" field")]
    MissingClass,

    /// The payload of a known class does not match its schema
    #[error("invalid {class} payload: {source}")]
    Payload {
        class: Class,
        #[source]
        source: serde_json::Error,
    },
}
