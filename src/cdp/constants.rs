use std::time::Duration;

pub(crate) const LIBRARY_NAME: &str = env!("CARGO_PKG_NAME");
pub(crate) const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Trait that marks a user as identified.
pub const USER_ID_KEY: &str = "userId";

pub(crate) const TRACK_PATH: &str = "v1/track";
pub(crate) const IDENTIFY_PATH: &str = "v1/identify";

pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const ANONYMOUS_ID_LENGTH: usize = 32;
