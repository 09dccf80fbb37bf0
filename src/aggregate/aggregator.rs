//! Keyed attribute buckets that are filled over time and flushed as a single event.
//!
//! Each aggregation key owns one bucket of named attributes. Buckets are created on the first
//! write, mutated by later writes according to a [`WriteAction`], and removed again when flushed
//! or cleared. The aggregator performs no synchronisation of its own; owners that share it across
//! threads wrap it in a single mutex.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::aggregate::error::{AggregateError, ExpectedKind};
use crate::aggregate::sink::EventSink;
use crate::aggregate::value::{AttributeValue, Attributes};

/// Hook invoked whenever an accumulation is rejected.
pub type MismatchObserver = Arc<dyn Fn(&AggregateError) + Send + Sync + 'static>;

/// How a write treats an attribute that already exists in the bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteAction {
    /// Insert or replace the attribute.
    #[default]
    Default,
    /// Add to the stored number. Integers always grow by one; floats and doubles add the
    /// supplied value when it has the same kind.
    AddToExisting,
    /// Replace the stored value.
    Overwrite,
}

#[derive(Default)]
pub struct Aggregator {
    buckets: BTreeMap<String, Attributes>,
    observer: Option<MismatchObserver>,
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("buckets", &self.buckets)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a hook that receives every rejected accumulation.
    pub fn set_mismatch_observer<F>(&mut self, observer: F)
    where
        F: Fn(&AggregateError) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
    }

    /// Writes a single attribute under `key`.
    ///
    /// The first write to a key creates a bucket holding only this attribute, whatever the
    /// action. Later writes follow `action`; a rejected accumulation leaves the bucket untouched
    /// and is reported through the log and the mismatch observer.
    pub fn write_attribute(
        &mut self,
        key: &str,
        attribute: &str,
        value: impl Into<AttributeValue>,
        action: WriteAction,
    ) {
        if let Err(err) = self.try_write_attribute(key, attribute, value, action) {
            self.report(&err);
        }
    }

    /// Same as [`write_attribute`](Self::write_attribute) but hands a rejected accumulation back
    /// to the caller instead of reporting it. Owners that guard the aggregator with a lock use
    /// this to notify observers after releasing it.
    pub fn try_write_attribute(
        &mut self,
        key: &str,
        attribute: &str,
        value: impl Into<AttributeValue>,
        action: WriteAction,
    ) -> Result<(), AggregateError> {
        let value = value.into();
        if !self.has_bucket(key) {
            self.buckets.insert(
                key.to_string(),
                Attributes::from([(attribute.to_string(), value)]),
            );
            return Ok(());
        }

        let Some(bucket) = self.buckets.get_mut(key) else {
            return Ok(());
        };
        match action {
            WriteAction::Default | WriteAction::Overwrite => {
                bucket.insert(attribute.to_string(), value);
                Ok(())
            }
            WriteAction::AddToExisting => accumulate(bucket, key, attribute, &value),
        }
    }

    /// Merges `attributes` into the bucket for `key`, creating it when absent. Incoming names
    /// replace existing ones; other attributes are kept.
    pub fn merge_attributes<I>(&mut self, key: &str, attributes: I)
    where
        I: IntoIterator<Item = (String, AttributeValue)>,
    {
        self.buckets
            .entry(key.to_string())
            .or_default()
            .extend(attributes);
    }

    /// Removes the bucket for `key` and hands it to `sink` as an event named `key`.
    ///
    /// Returns `false` without emitting when no bucket exists.
    pub fn flush<S>(&mut self, key: &str, sink: &S) -> bool
    where
        S: EventSink + ?Sized,
    {
        match self.take(key) {
            Some(attributes) => {
                sink.emit(key, attributes);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the bucket for `key`.
    pub fn take(&mut self, key: &str) -> Option<Attributes> {
        self.buckets.remove(key)
    }

    /// Drops the bucket for `key` without emitting it.
    pub fn clear(&mut self, key: &str) {
        self.buckets.remove(key);
    }

    pub fn has_bucket(&self, key: &str) -> bool {
        self.buckets.contains_key(key)
    }

    pub fn bucket(&self, key: &str) -> Option<&Attributes> {
        self.buckets.get(key)
    }

    pub fn attribute(&self, key: &str, attribute: &str) -> Option<&AttributeValue> {
        self.buckets.get(key).and_then(|bucket| bucket.get(attribute))
    }

    /// Number of live buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    fn report(&self, err: &AggregateError) {
        log::debug!("{err}");
        if let Some(observer) = &self.observer {
            observer(err);
        }
    }
}

fn accumulate(
    bucket: &mut Attributes,
    key: &str,
    attribute: &str,
    value: &AttributeValue,
) -> Result<(), AggregateError> {
    let Some(saved) = bucket.get_mut(attribute) else {
        return Err(AggregateError::type_mismatch(
            key,
            attribute,
            ExpectedKind::for_stored(None),
        ));
    };
    let stored = saved.kind();

    match (saved, value) {
        (AttributeValue::Int(saved), _) => {
            *saved = saved.saturating_add(1);
            Ok(())
        }
        (AttributeValue::Float(saved), AttributeValue::Float(delta)) => {
            *saved += *delta;
            Ok(())
        }
        (AttributeValue::Double(saved), AttributeValue::Double(delta)) => {
            *saved += *delta;
            Ok(())
        }
        _ => Err(AggregateError::type_mismatch(
            key,
            attribute,
            ExpectedKind::for_stored(Some(stored)),
        )),
    }
}
