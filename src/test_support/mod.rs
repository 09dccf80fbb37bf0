//! Test utilities shared across crate-level unit tests.

pub mod http;
pub mod sink;

pub use sink::RecordingSink;
