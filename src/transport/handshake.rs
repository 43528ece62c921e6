//! Plaintext `req_pq` handshake probe.
//!
//! The probe is the first message of the service's key exchange. A genuine
//! service answers with `resPQ` echoing the nonce, which is all the HTTP
//! transport needs to prove the tunnel reaches it. No key exchange follows.
//!
//! Layout of the probe (words):
//!
//! ```text
//! [ header (2) | auth_key_id = 0 (2) | message_id (2) | length (1) | req_pq (1) | nonce (4) ]
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::{
    Frame, HandshakeCodec, HandshakeParseError, NONCE_SIZE, Nonce, TRANSPORT_HEADER_WORDS,
    WORD_SIZE,
};

/// Constructor id of `req_pq`.
pub const REQ_PQ_CONSTRUCTOR: u32 = 0x6046_9778;

/// Constructor id of `resPQ`.
pub const RES_PQ_CONSTRUCTOR: u32 = 0x0516_2463;

/// Words before the message body: auth key id, message id, length.
const PLAIN_HEADER_WORDS: usize = 2 + 2 + 1;

/// Nonce length in words.
const NONCE_WORDS: usize = NONCE_SIZE / WORD_SIZE;

/// Smallest `resPQ` body in bytes: constructor and nonce.
const MIN_RES_PQ_BYTES: usize = WORD_SIZE + NONCE_SIZE;

/// [`HandshakeCodec`] for the plaintext `req_pq` / `resPQ` exchange.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqPqCodec;

impl ReqPqCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl HandshakeCodec for ReqPqCodec {
    fn build_probe(&self, nonce: &Nonce) -> Frame {
        let message_id = message_id_now();
        let body_len = (WORD_SIZE + NONCE_SIZE) as i32;

        let mut words = Vec::with_capacity(TRANSPORT_HEADER_WORDS + PLAIN_HEADER_WORDS + 1 + NONCE_WORDS);
        words.extend([0; TRANSPORT_HEADER_WORDS]);
        words.extend([0, 0]);
        words.push(message_id as u32 as i32);
        words.push((message_id >> 32) as u32 as i32);
        words.push(body_len);
        words.push(REQ_PQ_CONSTRUCTOR as i32);
        words.extend(nonce.to_words());
        Frame::from_words(words)
    }

    fn parse_response(&self, frame: &Frame) -> Result<Nonce, HandshakeParseError> {
        let words = frame.words();
        if words.len() < PLAIN_HEADER_WORDS + 1 + NONCE_WORDS {
            return Err(HandshakeParseError::TooShort { words: words.len() });
        }

        if words[0] != 0 || words[1] != 0 {
            return Err(HandshakeParseError::Encrypted);
        }

        let declared = words[4] as u32 as usize;
        let available = (words.len() - PLAIN_HEADER_WORDS) * WORD_SIZE;
        if declared < MIN_RES_PQ_BYTES || declared > available {
            return Err(HandshakeParseError::LengthMismatch {
                declared,
                available,
            });
        }

        let constructor = words[5] as u32;
        if constructor != RES_PQ_CONSTRUCTOR {
            return Err(HandshakeParseError::UnexpectedConstructor(constructor));
        }

        let mut nonce = [0i32; NONCE_WORDS];
        nonce.copy_from_slice(&words[6..6 + NONCE_WORDS]);
        Ok(Nonce::from_words(&nonce))
    }
}

/// Message id for an unencrypted message: unix time in 2^-32 second units,
/// low two bits clear.
fn message_id_now() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let fraction = (u64::from(now.subsec_nanos()) << 32) / 1_000_000_000;
    ((now.as_secs() << 32) | fraction) & !3
}
