//! HTTP transport layer.
//!
//! This module tunnels word-aligned protocol frames through plain HTTP POST
//! requests. It provides:
//!
//! - **Frame stripping/decoding**: [`strip_header`] and [`decode_response`]
//! - **Connection state machine**: [`HttpConnection`] with lifecycle management
//! - **Request tracking**: [`RequestTracker`] with bulk cancellation
//! - **Failure mapping**: [`map_failure`] into the connection's error codes
//! - **URL construction**: [`build_url`] and diagnostic labels
//! - **Handshake probe**: [`ReqPqCodec`] for the plaintext `req_pq` exchange
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Supervisor                   │
//! ├─────────────────────────────────────────┤
//! │         HttpConnection                  │  ← This module
//! │   handshake probe, framing, tracking    │
//! ├─────────────────────────────────────────┤
//! │         HttpEngine                      │
//! ├─────────────────────────────────────────┤
//! │         HTTP/1.1 over TCP :80           │
//! └─────────────────────────────────────────┘
//! ```

pub mod address;
mod connection;
mod engine;
mod error;
mod failure;
mod frame;
mod handshake;
mod proxy;
mod tracker;

pub use address::{build_url, describe, tag};
pub use connection::*;
pub use engine::{
    AbortRequest, Completion, CompletionNotifier, HttpEngine, HttpRequest, HttpResponse,
    RequestId,
};
pub use error::*;
pub use failure::{FailureCategory, HttpFailure, map_failure};
pub use frame::{decode_response, strip_header};
pub use handshake::{REQ_PQ_CONSTRUCTOR, RES_PQ_CONSTRUCTOR, ReqPqCodec};
pub use proxy::{ProxyConfig, ProxyKind};
pub use tracker::RequestTracker;
