//! Frame stripping and response decoding.
//!
//! Outbound buffers carry the byte-stream transport's 2-word header, which is
//! dropped before the payload goes into an HTTP body. Response bodies are
//! reinterpreted as little-endian words after a length check.

use tracing::warn;

use super::error::{TransportError, TransportResult};
use crate::core::{
    ERROR_CODE_BAD_RESPONSE, Frame, MIN_OUTBOUND_WORDS, MIN_RESPONSE_BYTES,
    TRANSPORT_HEADER_WORDS, WORD_SIZE,
};

/// Strip the transport header from an outbound buffer.
///
/// Returns the bytes starting at word offset 2. Buffers shorter than
/// [`MIN_OUTBOUND_WORDS`] are rejected and must never reach the network.
pub fn strip_header(buffer: &Frame) -> TransportResult<Vec<u8>> {
    if buffer.len() < MIN_OUTBOUND_WORDS {
        return Err(TransportError::MalformedOutbound {
            words: buffer.len(),
        });
    }
    Ok(buffer.bytes_from(TRANSPORT_HEADER_WORDS))
}

/// Decode a response body into a frame.
///
/// - Empty body: empty frame (no data, not an error).
/// - Length not word-aligned or shorter than [`MIN_RESPONSE_BYTES`]: the
///   single-word frame [`ERROR_CODE_BAD_RESPONSE`].
/// - Otherwise: one word per 4 bytes.
pub fn decode_response(bytes: &[u8]) -> Frame {
    if bytes.is_empty() {
        return Frame::new();
    }

    if bytes.len() % WORD_SIZE != 0 || bytes.len() < MIN_RESPONSE_BYTES {
        warn!(len = bytes.len(), "bad response size");
        return Frame::single(ERROR_CODE_BAD_RESPONSE);
    }

    let words = bytes
        .chunks_exact(WORD_SIZE)
        .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    Frame::from_words(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_header() {
        let buffer = Frame::from_words(vec![0x11, 0x22, 0x01020304, -2]);
        let body = strip_header(&buffer).unwrap();

        assert_eq!(body.len(), (buffer.len() - 2) * WORD_SIZE);
        assert_eq!(hex::encode(&body), "04030201feffffff");
    }

    #[test]
    fn test_strip_header_minimum() {
        let buffer = Frame::from_words(vec![7, 7, 42]);
        assert_eq!(strip_header(&buffer).unwrap(), 42i32.to_le_bytes().to_vec());
    }

    #[test]
    fn test_strip_header_too_short() {
        for words in 0..MIN_OUTBOUND_WORDS {
            let buffer = Frame::from_words(vec![1; words]);
            match strip_header(&buffer) {
                Err(TransportError::MalformedOutbound { words: w }) => assert_eq!(w, words),
                other => panic!("expected malformed outbound, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_decode_empty() {
        let frame = decode_response(&[]);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_decode_bad_sizes() {
        for len in [1usize, 2, 3, 4, 5, 7, 9, 10, 11, 13] {
            let frame = decode_response(&vec![0xaa; len]);
            assert_eq!(frame.words(), &[ERROR_CODE_BAD_RESPONSE], "len {len}");
        }
    }

    #[test]
    fn test_decode_words() {
        let bytes = hex::decode("0100000002000000fcfeffff").unwrap();
        let frame = decode_response(&bytes);
        assert_eq!(frame.words(), &[1, 2, -260]);
        assert_eq!(frame.to_bytes(), bytes);
    }

    #[test]
    fn test_decode_minimum_frame() {
        let frame = decode_response(&[0u8; 8]);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.as_error_code(), None);
    }
}
