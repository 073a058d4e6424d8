//! # Domain Module
//!
//! Core domain types for the gateway accounting core.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use services::*;
pub use value_objects::*;
