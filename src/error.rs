use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedisError>;

/**
 * Everything that can go wrong while talking to the server.
 *
 * A `-ERR ...` reply at the top level is NOT an error here - it decodes
 * to `Value::Error` and is handed back as a normal value. `Reply` only
 * surfaces when an error reply turns up inside an array reply.
 */
#[derive(Debug, Error)]
pub enum RedisError {
    /// Malformed framing. The decoder that raised this is poisoned and
    /// will keep raising it; the connection should be dropped.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A server error reply found among the elements of an array reply.
    #[error("error reply in array: {0}")]
    Reply(String),

    /// The peer closed its end of the socket.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// A command argument that cannot be represented in the configured
    /// text encoding (or an empty command).
    #[error("cannot encode command: {0}")]
    Encode(String),

    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal framing faults. `Clone` so a poisoned decoder can re-raise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("invalid leading byte {0:#04x}")]
    InvalidMarker(u8),

    #[error("invalid integer {0:?}")]
    InvalidInteger(String),

    #[error("invalid length {0}")]
    InvalidLength(i64),

    #[error("missing CRLF after bulk payload")]
    MissingTerminator,
}
