//! # HTTP Tunnel Transport
//!
//! Fallback transport for a binary RPC protocol when direct byte-stream
//! connections are blocked by network policy. Every protocol frame travels as
//! the body of an HTTP POST to `http://<host>:80/api`, and every response body
//! is read back as a frame.
//!
//! The connection presents the same abstraction as the other transports:
//!
//! - **Send** raw outbound buffers (the 2-word transport header is stripped)
//! - **Receive** frames through an inbound queue
//! - **Report** connectivity and errors as [`ConnectionEvent`]s
//!
//! Before declaring itself usable, the connection sends a plaintext handshake
//! probe carrying a random 128-bit nonce and waits for a reply echoing it. This
//! proves the tunnel reaches the real service and not a captive portal.
//!
//! ## Feature Flags
//!
//! - `transport` (default): Connection state machine, framing, request tracking
//! - `engine` (default): [`reqwest`]-backed HTTP engine
//!
//! ## Modules
//!
//! - [`core`]: Constants, frame and nonce types, codec trait (always included)
//! - [`transport`]: Transport layer (requires `transport` feature)
//! - [`engine`]: HTTP engine (requires `engine` feature)
//!
//! ## Example Usage
//!
//! ```rust
//! use tunnel_http_transport::prelude::*;
//!
//! // Outbound buffers keep the byte-stream transport's 2-word header.
//! let buffer = Frame::from_words(vec![0, 0, 0x1234, 0x5678]);
//! let body = strip_header(&buffer).unwrap();
//! assert_eq!(body.len(), 8);
//!
//! // Responses shorter than two words are reported as error -500.
//! let frame = decode_response(&[1, 2, 3, 4]);
//! assert_eq!(frame.as_error_code(), Some(ERROR_CODE_BAD_RESPONSE));
//!
//! assert_eq!(build_url("2001:db8::1", HTTP_TRANSPORT_PORT), "http://[2001:db8::1]:80/api");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

// Transport layer (feature-gated)
#[cfg(feature = "transport")]
#[cfg_attr(docsrs, doc(cfg(feature = "transport")))]
pub mod transport;

// HTTP engine (feature-gated)
#[cfg(feature = "engine")]
#[cfg_attr(docsrs, doc(cfg(feature = "engine")))]
pub mod engine;

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types and constants
    pub use crate::core::*;

    // Transport types (when enabled)
    #[cfg(feature = "transport")]
    pub use crate::transport::{
        AbortRequest, Completion, CompletionNotifier, ConnectionEvent, ConnectionStatus,
        FailureCategory, HttpConnection, HttpEngine, HttpFailure, HttpRequest, HttpResponse,
        ProxyConfig, ProxyKind, ReqPqCodec, RequestId, RequestTracker, TransportError,
        TransportResult, build_url, decode_response, map_failure, strip_header,
    };

    // Engine types (when enabled)
    #[cfg(feature = "engine")]
    pub use crate::engine::{EngineConfig, EngineConfigBuilder, ReqwestEngine};
}

// Re-export commonly used items at crate root
pub use crate::core::{Frame, HandshakeCodec, HandshakeParseError, Nonce};

#[cfg(feature = "transport")]
pub use crate::transport::{
    ConnectionEvent, ConnectionStatus, HttpConnection, HttpEngine, ReqPqCodec, TransportError,
};

#[cfg(feature = "engine")]
pub use crate::engine::ReqwestEngine;
