use chrono::{SecondsFormat, Utc};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use crate::aggregate::Attributes;
use crate::cdp::config::RudderConfig;
use crate::cdp::constants::{IDENTIFY_PATH, LIBRARY_NAME, LIBRARY_VERSION, TRACK_PATH};
use crate::cdp::error::{network_error, CdpResult};

/// Who an outgoing call is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Identity<'a> {
    pub anonymous_id: &'a str,
    pub user_id: Option<&'a str>,
}

pub(crate) trait CdpTransport: Send + Sync {
    fn track(
        &self,
        identity: Identity<'_>,
        event_name: &str,
        properties: &Attributes,
    ) -> CdpResult<()>;

    fn identify(&self, identity: Identity<'_>, traits: &Attributes) -> CdpResult<()>;
}

/// Sends calls to the RudderStack HTTP API, authenticating with the write key.
#[derive(Clone, Debug)]
pub(crate) struct RudderHttpTransport {
    client: Client,
    track_url: Url,
    identify_url: Url,
    write_key: String,
}

impl RudderHttpTransport {
    pub fn new(config: &RudderConfig) -> CdpResult<Self> {
        let base = config.data_plane_base()?;
        let track_url = base.join(TRACK_PATH)?;
        let identify_url = base.join(IDENTIFY_PATH)?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            track_url,
            identify_url,
            write_key: config.write_key().to_string(),
        })
    }

    fn post<T>(&self, url: &Url, payload: &T) -> CdpResult<()>
    where
        T: Serialize,
    {
        let response = self
            .client
            .post(url.clone())
            .basic_auth(&self.write_key, None::<&str>)
            .json(payload)
            .send()?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response
            .text()
            .unwrap_or_else(|_| "<unavailable response body>".to_string());

        let message = match status {
            StatusCode::UNAUTHORIZED => {
                format!("data plane rejected the write key (401). Response: {body}")
            }
            StatusCode::BAD_REQUEST => {
                format!("data plane rejected the payload (400). Response: {body}")
            }
            _ => format!("data plane request failed with status {status}. Response: {body}"),
        };

        Err(network_error(message))
    }
}

impl CdpTransport for RudderHttpTransport {
    fn track(
        &self,
        identity: Identity<'_>,
        event_name: &str,
        properties: &Attributes,
    ) -> CdpResult<()> {
        let payload = TrackPayload {
            anonymous_id: identity.anonymous_id,
            user_id: identity.user_id,
            event: event_name,
            properties,
            original_timestamp: timestamp(),
            context: PayloadContext::default(),
        };
        self.post(&self.track_url, &payload)
    }

    fn identify(&self, identity: Identity<'_>, traits: &Attributes) -> CdpResult<()> {
        let payload = IdentifyPayload {
            anonymous_id: identity.anonymous_id,
            user_id: identity.user_id,
            traits,
            original_timestamp: timestamp(),
            context: PayloadContext::default(),
        };
        self.post(&self.identify_url, &payload)
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackPayload<'a> {
    anonymous_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    event: &'a str,
    properties: &'a Attributes,
    original_timestamp: String,
    context: PayloadContext,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentifyPayload<'a> {
    anonymous_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    traits: &'a Attributes,
    original_timestamp: String,
    context: PayloadContext,
}

#[derive(Serialize)]
struct PayloadContext {
    library: LibraryInfo,
}

impl Default for PayloadContext {
    fn default() -> Self {
        Self {
            library: LibraryInfo {
                name: LIBRARY_NAME,
                version: LIBRARY_VERSION,
            },
        }
    }
}

#[derive(Serialize)]
struct LibraryInfo {
    name: &'static str,
    version: &'static str,
}
