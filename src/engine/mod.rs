//! reqwest-backed HTTP engine.
//!
//! Runs each tunnel request as its own tokio task and reports the outcome
//! through the request's [`CompletionNotifier`](crate::transport::CompletionNotifier).

mod config;
mod reqwest_engine;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use reqwest_engine::ReqwestEngine;
