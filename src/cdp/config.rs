//! Connection settings for the RudderStack data plane.

use std::time::Duration;

use url::Url;

use crate::cdp::constants::DEFAULT_REQUEST_TIMEOUT;
use crate::cdp::error::{invalid_argument, CdpResult};

/// Settings used by [`RudderStack`](crate::cdp::RudderStack).
///
/// In debug mode no transport is created: events are written to the log instead of being sent,
/// and the URL and write key are never validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RudderConfig {
    url: String,
    write_key: String,
    is_debug: bool,
    timeout: Duration,
}

impl RudderConfig {
    pub fn new(url: impl Into<String>, write_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            write_key: write_key.into(),
            is_debug: false,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_debug(mut self, is_debug: bool) -> Self {
        self.is_debug = is_debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Data plane URL as supplied.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn write_key(&self) -> &str {
        &self.write_key
    }

    pub fn is_debug(&self) -> bool {
        self.is_debug
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parses the data plane URL into a base that relative API paths can be joined onto.
    pub(crate) fn data_plane_base(&self) -> CdpResult<Url> {
        if self.write_key.trim().is_empty() {
            return Err(invalid_argument("write_key must not be empty"));
        }
        let mut base = Url::parse(self.url.trim())
            .map_err(|err| invalid_argument(format!("invalid data plane url {}: {err}", self.url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid_argument(format!(
                "data plane url must use http or https, got {}",
                base.scheme()
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_non_debug_with_ten_second_timeout() {
        let config = RudderConfig::new("https://hosted.rudderlabs.com", "key");
        assert!(!config.is_debug());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn base_keeps_path_prefix() {
        let config = RudderConfig::new("https://proxy.example.com/rudder", "key");
        let base = config.data_plane_base().unwrap();
        assert_eq!(
            base.join("v1/track").unwrap().as_str(),
            "https://proxy.example.com/rudder/v1/track"
        );
    }

    #[test]
    fn rejects_blank_write_key_and_bad_urls() {
        let err = RudderConfig::new("https://hosted.rudderlabs.com", "  ")
            .data_plane_base()
            .unwrap_err();
        assert_eq!(err.code_str(), "cdp/invalid-argument");

        let err = RudderConfig::new("ww.bums.dk", "key")
            .data_plane_base()
            .unwrap_err();
        assert_eq!(err.code_str(), "cdp/invalid-argument");

        let err = RudderConfig::new("ftp://example.com", "key")
            .data_plane_base()
            .unwrap_err();
        assert_eq!(err.code_str(), "cdp/invalid-argument");
    }
}
