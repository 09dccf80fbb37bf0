use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::aggregate::{
    AggregateError, Aggregator, AttributeValue, Attributes, MismatchObserver, WriteAction,
};
use crate::cdp::config::RudderConfig;
use crate::cdp::constants::{ANONYMOUS_ID_LENGTH, USER_ID_KEY};
use crate::cdp::error::{invalid_argument, CdpResult};
use crate::cdp::transport::{CdpTransport, Identity, RudderHttpTransport};

/// Customer data platform client backed by RudderStack.
///
/// Besides one-off `track` and `identify` calls the client owns an [`Aggregator`], so attributes
/// can be collected under a key over time and sent later as one event with
/// [`track_aggregated`](Self::track_aggregated). Clones share the same state.
#[derive(Clone)]
pub struct RudderStack {
    inner: Arc<RudderStackInner>,
}

impl fmt::Debug for RudderStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RudderStack")
            .field("url", &self.inner.config.url())
            .field("is_debug", &self.inner.config.is_debug())
            .field("started", &self.is_started())
            .finish()
    }
}

struct RudderStackInner {
    config: RudderConfig,
    anonymous_id: String,
    started: AtomicBool,
    aggregator: Mutex<Aggregator>,
    observer: Mutex<Option<MismatchObserver>>,
    transport: Mutex<Option<Arc<dyn CdpTransport>>>,
    traits: Mutex<Attributes>,
}

impl RudderStack {
    pub fn new(config: RudderConfig) -> Self {
        let inner = RudderStackInner {
            config,
            anonymous_id: generate_anonymous_id(),
            started: AtomicBool::new(false),
            aggregator: Mutex::new(Aggregator::new()),
            observer: Mutex::new(None),
            transport: Mutex::new(None),
            traits: Mutex::new(Attributes::new()),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn config(&self) -> &RudderConfig {
        &self.inner.config
    }

    /// Identifier attached to every call, generated once per client.
    pub fn anonymous_id(&self) -> &str {
        &self.inner.anonymous_id
    }

    /// Connects the client to the data plane. Call this before tracking events.
    ///
    /// In debug mode no transport is created and events are only logged. Starting again replaces
    /// the existing transport.
    pub fn start(&self) -> CdpResult<()> {
        let transport: Option<Arc<dyn CdpTransport>> = if self.inner.config.is_debug() {
            log::debug!("debug mode enabled, events will be logged instead of sent");
            None
        } else {
            Some(Arc::new(RudderHttpTransport::new(&self.inner.config)?))
        };
        *self.inner.transport.lock().unwrap() = transport;
        self.inner.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.inner.started.load(Ordering::SeqCst)
    }

    /// Records user traits and forwards them to the data plane. Passing `None` does nothing.
    ///
    /// Traits are merged with earlier ones. A `userId` trait is attached to every later call.
    pub fn identify(&self, traits: Option<Attributes>) -> CdpResult<()> {
        let Some(traits) = traits else {
            return Ok(());
        };
        let merged = {
            let mut stored = self.inner.traits.lock().unwrap();
            stored.extend(traits);
            stored.clone()
        };

        match self.transport() {
            Some(transport) => {
                let user_id = user_id_from(&merged);
                let identity = Identity {
                    anonymous_id: &self.inner.anonymous_id,
                    user_id: user_id.as_deref(),
                };
                transport.identify(identity, &merged)
            }
            None => {
                log::debug!("identifying user with traits {}", to_json(&merged));
                Ok(())
            }
        }
    }

    pub fn is_user_identified(&self) -> bool {
        self.inner
            .traits
            .lock()
            .unwrap()
            .get(USER_ID_KEY)
            .is_some_and(|value| !value.is_null())
    }

    /// Sends a single event right away.
    pub fn track(&self, event_name: &str, data: Attributes) -> CdpResult<()> {
        validate_event_name(event_name)?;
        self.dispatch(event_name, &data)
    }

    /// Sends everything aggregated under `key` as one event named `key` and drops the bucket.
    ///
    /// Returns `Ok(false)` when nothing was aggregated. Any key that can be aggregated can be
    /// flushed, blank ones included. The bucket is removed before sending, so a failed delivery is
    /// not retried.
    pub fn track_aggregated(&self, key: &str) -> CdpResult<bool> {
        let attributes = self.inner.aggregator.lock().unwrap().take(key);
        let Some(attributes) = attributes else {
            return Ok(false);
        };
        if let Err(err) = self.dispatch(key, &attributes) {
            log::warn!("dropping aggregated event {key:?}: {err}");
            return Err(err);
        }
        Ok(true)
    }

    /// Stores one attribute under `key` for a later [`track_aggregated`](Self::track_aggregated).
    ///
    /// `None` behaves like [`WriteAction::Default`].
    pub fn aggregate_data(
        &self,
        key: &str,
        attribute: &str,
        data: impl Into<AttributeValue>,
        action: Option<WriteAction>,
    ) {
        let result = self.inner.aggregator.lock().unwrap().try_write_attribute(
            key,
            attribute,
            data,
            action.unwrap_or_default(),
        );
        if let Err(err) = result {
            log::debug!("{err}");
            let observer = self.inner.observer.lock().unwrap().clone();
            if let Some(observer) = observer {
                observer(&err);
            }
        }
    }

    /// Merges a whole map of attributes into the bucket for `key`.
    pub fn aggregate_map(&self, key: &str, attributes: Attributes) {
        self.inner
            .aggregator
            .lock()
            .unwrap()
            .merge_attributes(key, attributes);
    }

    pub fn clear_aggregated_data(&self, key: &str) {
        self.inner.aggregator.lock().unwrap().clear(key);
    }

    /// Snapshot of the attributes currently aggregated under `key`.
    pub fn aggregated(&self, key: &str) -> Option<Attributes> {
        self.inner.aggregator.lock().unwrap().bucket(key).cloned()
    }

    /// Installs a hook that is told about every rejected accumulation.
    ///
    /// The hook runs after the aggregator lock is released, so it may call back into the client.
    pub fn set_mismatch_observer<F>(&self, observer: F)
    where
        F: Fn(&AggregateError) + Send + Sync + 'static,
    {
        let observer: MismatchObserver = Arc::new(observer);
        *self.inner.observer.lock().unwrap() = Some(observer);
    }

    fn transport(&self) -> Option<Arc<dyn CdpTransport>> {
        self.inner.transport.lock().unwrap().clone()
    }

    fn dispatch(&self, event_name: &str, properties: &Attributes) -> CdpResult<()> {
        let Some(transport) = self.transport() else {
            log::debug!(
                "tracking event {event_name} with properties {}",
                to_json(properties)
            );
            return Ok(());
        };

        let user_id = user_id_from(&self.inner.traits.lock().unwrap());
        let identity = Identity {
            anonymous_id: &self.inner.anonymous_id,
            user_id: user_id.as_deref(),
        };
        transport.track(identity, event_name, properties)
    }

    #[cfg(test)]
    fn set_transport_for_tests(&self, transport: Arc<dyn CdpTransport>) {
        *self.inner.transport.lock().unwrap() = Some(transport);
    }
}

fn validate_event_name(name: &str) -> CdpResult<()> {
    if name.trim().is_empty() {
        return Err(invalid_argument("Event name must not be empty"));
    }
    Ok(())
}

fn user_id_from(traits: &Attributes) -> Option<String> {
    let value = traits.get(USER_ID_KEY)?;
    value
        .as_str()
        .map(str::to_string)
        .or_else(|| value.as_i64().map(|id| id.to_string()))
}

fn to_json(attributes: &Attributes) -> String {
    serde_json::to_string(attributes).unwrap_or_else(|err| format!("<unserializable: {err}>"))
}

fn generate_anonymous_id() -> String {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .take(ANONYMOUS_ID_LENGTH)
        .collect()
}
