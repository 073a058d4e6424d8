//! # Events Module
//!
//! Serde-serializable payloads for every observable state transition.

pub mod payloads;

pub use payloads::GatewayEvent;
