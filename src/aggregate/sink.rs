use crate::aggregate::value::Attributes;

/// Receives flushed buckets as named events.
///
/// Flushing calls `emit` at most once per bucket, synchronously, after the bucket has already
/// been removed from the aggregator. Delivery guarantees belong to the implementation.
pub trait EventSink {
    fn emit(&self, event_name: &str, attributes: Attributes);
}

impl<F> EventSink for F
where
    F: Fn(&str, Attributes),
{
    fn emit(&self, event_name: &str, attributes: Attributes) {
        self(event_name, attributes)
    }
}
