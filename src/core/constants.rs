//! Transport constants.
//!
//! These values are fixed by the wire contract with the service and MUST NOT be
//! changed.

// =============================================================================
// ERROR CODES
// =============================================================================

/// Generic error code used when nothing more specific is available.
pub const ERROR_CODE_OTHER: i32 = -999;

/// Error code synthesized for a response body with an invalid length.
pub const ERROR_CODE_BAD_RESPONSE: i32 = -500;

// =============================================================================
// FRAME LAYOUT
// =============================================================================

/// Size of one protocol word in bytes.
pub const WORD_SIZE: usize = 4;

/// Number of leading transport-header words in an outbound buffer.
///
/// The header mirrors the byte-stream transport's framing and is never sent
/// over HTTP.
pub const TRANSPORT_HEADER_WORDS: usize = 2;

/// Smallest outbound buffer (in words) that may reach the network.
pub const MIN_OUTBOUND_WORDS: usize = TRANSPORT_HEADER_WORDS + 1;

/// Smallest non-empty response body (in bytes) accepted as a frame.
pub const MIN_RESPONSE_BYTES: usize = 8;

// =============================================================================
// HTTP TUNNEL
// =============================================================================

/// Port used by the HTTP transport, regardless of the endpoint's configured port.
pub const HTTP_TRANSPORT_PORT: u16 = 80;

/// Request path on the service.
pub const HTTP_TRANSPORT_PATH: &str = "/api";

/// Content type sent with every request body.
pub const HTTP_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Label used in diagnostics for this transport.
pub const TRANSPORT_NAME: &str = "HTTP";

// =============================================================================
// HANDSHAKE
// =============================================================================

/// Handshake nonce size (128-bit).
pub const NONCE_SIZE: usize = 16;
