use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CdpErrorCode {
    InvalidArgument,
    Internal,
    Network,
}

impl CdpErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CdpErrorCode::InvalidArgument => "cdp/invalid-argument",
            CdpErrorCode::Internal => "cdp/internal",
            CdpErrorCode::Network => "cdp/network",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CdpError {
    pub code: CdpErrorCode,
    message: String,
}

impl CdpError {
    pub fn new(code: CdpErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the call failed on the way to or at the data plane rather than before sending.
    pub fn is_network(&self) -> bool {
        self.code == CdpErrorCode::Network
    }
}

impl Display for CdpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for CdpError {}

impl From<url::ParseError> for CdpError {
    fn from(err: url::ParseError) -> Self {
        invalid_argument(format!("invalid data plane url: {err}"))
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            internal_error(format!("failed to build HTTP request: {err}"))
        } else {
            network_error(format!("data plane request failed: {err}"))
        }
    }
}

pub type CdpResult<T> = Result<T, CdpError>;

pub fn invalid_argument(message: impl Into<String>) -> CdpError {
    CdpError::new(CdpErrorCode::InvalidArgument, message)
}

pub fn internal_error(message: impl Into<String>) -> CdpError {
    CdpError::new(CdpErrorCode::Internal, message)
}

pub fn network_error(message: impl Into<String>) -> CdpError {
    CdpError::new(CdpErrorCode::Network, message)
}
