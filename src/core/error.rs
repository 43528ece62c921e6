//! Error types shared by the codec and configuration layers.

use thiserror::Error;

/// Errors returned when a handshake response cannot be interpreted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandshakeParseError {
    /// Response is shorter than the fixed handshake layout.
    #[error("handshake response too short: {words} words")]
    TooShort {
        /// Number of words received.
        words: usize,
    },

    /// Response was not sent in plaintext (non-zero auth key id).
    #[error("handshake response is not unencrypted")]
    Encrypted,

    /// Declared message length disagrees with the frame.
    #[error("handshake length mismatch: declared {declared}, available {available}")]
    LengthMismatch {
        /// Length declared in the message header.
        declared: usize,
        /// Bytes actually available after the header.
        available: usize,
    },

    /// Unexpected message constructor.
    #[error("unexpected constructor: {0:#010x}")]
    UnexpectedConstructor(u32),
}

/// Errors in proxy configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Host is empty.
    #[error("proxy host is empty")]
    EmptyHost,

    /// Port is zero.
    #[error("proxy port is zero")]
    ZeroPort,

    /// Password given without a user name.
    #[error("proxy password given without user")]
    PasswordWithoutUser,
}
