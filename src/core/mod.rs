//! Core types, constants, and collaborator traits.
//!
//! This module has no runtime dependencies and defines the seams between the
//! connection state machine, the HTTP engine, and the protocol codec.

mod constants;
mod error;
mod traits;
mod types;

pub use constants::*;
pub use error::*;
pub use traits::*;
pub use types::*;
