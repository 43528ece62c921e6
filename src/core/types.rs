//! Word-level frame and nonce types.

use std::fmt;

use super::constants::{NONCE_SIZE, WORD_SIZE};

/// One protocol message as a sequence of 4-byte words.
///
/// Words are serialized little-endian, so the byte length of a frame is always
/// a multiple of [`WORD_SIZE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Frame(Vec<i32>);

impl Frame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a frame from words.
    pub fn from_words(words: Vec<i32>) -> Self {
        Self(words)
    }

    /// Create a frame holding a single word.
    pub fn single(word: i32) -> Self {
        Self(vec![word])
    }

    /// Get the words.
    pub fn words(&self) -> &[i32] {
        &self.0
    }

    /// Consume the frame and return its words.
    pub fn into_words(self) -> Vec<i32> {
        self.0
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the frame holds no words.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Byte length on the wire.
    pub fn byte_len(&self) -> usize {
        self.0.len() * WORD_SIZE
    }

    /// Return the word if this frame holds exactly one.
    ///
    /// Single-word responses are error codes, not data.
    pub fn as_error_code(&self) -> Option<i32> {
        match self.0.as_slice() {
            [code] => Some(*code),
            _ => None,
        }
    }

    /// Serialize words starting at `offset` into little-endian bytes.
    pub fn bytes_from(&self, offset: usize) -> Vec<u8> {
        self.0
            .iter()
            .skip(offset)
            .flat_map(|word| word.to_le_bytes())
            .collect()
    }

    /// Serialize the whole frame into little-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes_from(0)
    }
}

impl From<Vec<i32>> for Frame {
    fn from(words: Vec<i32>) -> Self {
        Self(words)
    }
}

/// 128-bit handshake nonce.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// Create a nonce from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random nonce.
    pub fn random() -> Self {
        Self(rand::random())
    }

    /// Get the nonce bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }

    /// Encode as four little-endian words.
    pub fn to_words(&self) -> [i32; NONCE_SIZE / WORD_SIZE] {
        let mut words = [0i32; NONCE_SIZE / WORD_SIZE];
        for (word, chunk) in words.iter_mut().zip(self.0.chunks_exact(WORD_SIZE)) {
            *word = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }

    /// Decode from four little-endian words.
    pub fn from_words(words: &[i32; NONCE_SIZE / WORD_SIZE]) -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(WORD_SIZE).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Self(bytes)
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce(")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}
