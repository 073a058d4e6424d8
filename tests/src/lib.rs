//! # Value-Gateway Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # End-to-end flows through the GatewayApi port
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p gateway-tests
//!
//! # By category
//! cargo test -p gateway-tests integration::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]
