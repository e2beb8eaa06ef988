use serde::{
    Deserialize,
    Serialize,
    Serializer,
};
use std::fmt;
use url::Url;

/// Identifies one independently addressed Zerto deployment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeploymentId {
    Sgu,
    Boi,
    Fb,
}

/// Settings of a single deployment as they appear in the configuration table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploymentSettings {
    /// Scheme and host of the management server, e.g. `https://sgu-zvm.example.local`.
    pub base_url: Url,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    pub secret: Secret,
}

fn default_client_id() -> String {
    "zerto-api".to_string()
}

/// A resolved deployment descriptor.
#[derive(Clone, Debug)]
pub struct Deployment {
    pub id: DeploymentId,
    pub base_url: Url,
    pub client_id: String,
    pub secret: Secret,
}

impl Deployment {
    pub fn new(id: DeploymentId, settings: DeploymentSettings) -> Self {
        Self {
            id,
            base_url: settings.base_url,
            client_id: settings.client_id,
            secret: settings.secret,
        }
    }

    /// Joins `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// A client secret. Never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr as _;
    use strum::IntoEnumIterator as _;

    #[test]
    fn deployment_ids_round_trip_through_their_names() {
        for id in DeploymentId::iter() {
            assert_eq!(DeploymentId::from_str(&id.to_string()).unwrap(), id);
        }
        assert!(DeploymentId::from_str("ogden").is_err());
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let deployment = Deployment::new(
            DeploymentId::Sgu,
            DeploymentSettings {
                base_url: Url::parse("https://sgu-zvm.example.local/").unwrap(),
                client_id: default_client_id(),
                secret: Secret::new("s3cret"),
            },
        );
        assert_eq!(
            deployment.endpoint("/v1/vpgs"),
            "https://sgu-zvm.example.local/v1/vpgs"
        );
        assert_eq!(format!("{:?}", deployment.secret), "Secret(***)");
    }
}
