//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound port traits against in-process backends.

mod publisher;
mod settlement;
mod time;

pub use publisher::{BufferedEventPublisher, NoOpEventPublisher};
pub use settlement::InMemorySettlement;
pub use time::{FixedTimeSource, SystemTimeSource};
