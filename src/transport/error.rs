//! Transport layer error types.
//!
//! Every error is also surfaced to the supervisor as an integer code through
//! [`ConnectionEvent::Error`](super::ConnectionEvent::Error). These types exist
//! for callers that want a typed result from local operations.

use thiserror::Error;

use crate::core::{ERROR_CODE_OTHER, HandshakeParseError, ProxyError};

/// Transport layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Outbound buffer is too short to carry the transport header and a payload.
    #[error("malformed outbound buffer: {words} words")]
    MalformedOutbound {
        /// Number of words in the rejected buffer.
        words: usize,
    },

    /// Handshake probe response could not be parsed.
    #[error("handshake parse error: {0}")]
    Handshake(#[from] HandshakeParseError),

    /// Handshake response echoed a different nonce.
    #[error("handshake nonce mismatch")]
    NonceMismatch,

    /// Proxy configuration rejected.
    #[error("invalid proxy: {0}")]
    InvalidProxy(#[from] ProxyError),

    /// HTTP engine could not be constructed or reconfigured.
    #[error("http engine error: {0}")]
    Engine(String),
}

impl TransportError {
    /// Integer code reported to the supervisor for this error.
    pub fn code(&self) -> i32 {
        ERROR_CODE_OTHER
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_is_generic() {
        assert_eq!(TransportError::NonceMismatch.code(), ERROR_CODE_OTHER);
        assert_eq!(
            TransportError::MalformedOutbound { words: 1 }.code(),
            ERROR_CODE_OTHER
        );
        assert_eq!(
            TransportError::Handshake(HandshakeParseError::Encrypted).code(),
            ERROR_CODE_OTHER
        );
        assert_eq!(
            TransportError::InvalidProxy(ProxyError::ZeroPort).code(),
            ERROR_CODE_OTHER
        );
    }
}
