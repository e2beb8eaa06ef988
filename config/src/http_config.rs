use serde::{
    Deserialize,
    Serialize,
};
use std::time::Duration;

/// Transport policy shared by every request to a management server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout applied to every API request.
    #[serde(with = "human_duration")]
    pub request_timeout: Duration,
    /// Timeout of the token exchange.
    #[serde(with = "human_duration")]
    pub auth_timeout: Duration,
    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
}

mod human_duration {
    use serde::{
        de::Error as _,
        Deserialize,
        Deserializer,
        Serializer,
    };
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let value = String::deserialize(deserializer)?;
        humantime::parse_duration(&value).map_err(|e| D::Error::custom(format!("invalid duration '{value}': {e}")))
    }
}
