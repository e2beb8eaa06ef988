use reqwest::StatusCode;

/// The token exchange against a deployment's identity endpoint failed.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("identity endpoint {url} is unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to authenticate: {status} - {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("identity endpoint returned no access token: {0}")]
    MalformedResponse(String),
}

/// A data endpoint did not deliver the expected response.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status} - {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },
    #[error("unexpected response body from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("server time {value:?} is not a UTC timestamp: {source}")]
    InvalidServerTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
