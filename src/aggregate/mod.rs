mod aggregator;
pub mod error;
mod sink;
pub mod value;

pub use aggregator::{Aggregator, MismatchObserver, WriteAction};
pub use error::{AggregateError, AggregateErrorCode, ExpectedKind};
pub use sink::EventSink;
pub use value::{AttributeKind, AttributeValue, Attributes};
