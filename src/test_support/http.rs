use std::panic::{self, AssertUnwindSafe};

use base64::engine::general_purpose::STANDARD;
use base64::engine::Engine as _;
use httpmock::MockServer;

/// Starts a mock server, or returns `None` when the environment forbids binding a socket.
pub fn try_start_server() -> Option<MockServer> {
    panic::catch_unwind(AssertUnwindSafe(MockServer::start)).ok()
}

/// `Authorization` header value the data plane expects for `write_key`.
pub fn basic_auth_header(write_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{write_key}:")))
}
