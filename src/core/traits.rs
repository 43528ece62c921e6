//! Collaborator traits.
//!
//! The connection never interprets protocol messages itself. Building the
//! handshake probe and reading its reply are delegated to a [`HandshakeCodec`].

use super::error::HandshakeParseError;
use super::types::{Frame, Nonce};

/// Codec for the fake handshake used to verify the tunnel.
///
/// # Requirements
///
/// - `build_probe` MUST return an outbound buffer, i.e. a frame that still
///   carries the 2-word transport header
/// - `parse_response` MUST NOT panic on arbitrary input
///
/// # Example
///
/// ```ignore
/// struct EchoCodec;
///
/// impl HandshakeCodec for EchoCodec {
///     fn build_probe(&self, nonce: &Nonce) -> Frame {
///         let mut words = vec![0, 0];
///         words.extend(nonce.to_words());
///         Frame::from_words(words)
///     }
///
///     fn parse_response(&self, frame: &Frame) -> Result<Nonce, HandshakeParseError> {
///         let words: [i32; 4] = frame
///             .words()
///             .try_into()
///             .map_err(|_| HandshakeParseError::TooShort { words: frame.len() })?;
///         Ok(Nonce::from_words(&words))
///     }
/// }
/// ```
pub trait HandshakeCodec {
    /// Build the probe frame carrying `nonce`.
    fn build_probe(&self, nonce: &Nonce) -> Frame;

    /// Extract the nonce echoed back in a probe response.
    fn parse_response(&self, frame: &Frame) -> Result<Nonce, HandshakeParseError>;
}
