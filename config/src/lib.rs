#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod deployment;
mod http_config;

pub use app_config::get_config_dir;
pub use args::{
    Args,
    Command,
};
pub use deployment::{
    Deployment,
    DeploymentId,
    DeploymentSettings,
    Secret,
};
pub use http_config::HttpConfig;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

/// Prefix of the environment variables that override file settings, e.g.
/// `ZERTO_USAGE_DEPLOYMENTS__SGU__SECRET`.
const ENV_PREFIX: &str = "ZERTO_USAGE";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub deployments: BTreeMap<DeploymentId, DeploymentSettings>,
    pub http: HttpConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Overrides the generated report heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Config {
    /// Layers the built-in defaults, the config file, `ZERTO_USAGE_*` environment variables and the command line
    /// arguments, in that order.
    pub fn new(args: &Args) -> Result<Self, config::ConfigError> {
        let mut builder = Self::defaults();

        builder = match &args.config {
            Some(path) => {
                debug!(?path, "Loading configuration file from args");
                builder.add_source(config::File::from(path.as_path()).required(true))
            }
            None => {
                let path = get_config_dir().join("config.yaml");
                debug!(?path, "Loading optional configuration file");
                builder.add_source(
                    config::File::from(path)
                        .format(config::FileFormat::Yaml)
                        .required(false),
                )
            }
        };

        builder = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .add_source(args.clone());

        builder.build()?.try_deserialize()
    }

    fn defaults() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder().add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
    }

    /// Resolves a deployment descriptor from the deployment table.
    pub fn deployment(&self, id: DeploymentId) -> Result<Deployment, config::ConfigError> {
        self.deployments
            .get(&id)
            .map(|settings| Deployment::new(id, settings.clone()))
            .ok_or_else(|| config::ConfigError::NotFound(format!("deployments.{id}")))
    }

    /// All deployments that have settings, in a stable order.
    pub fn deployment_ids(&self) -> Vec<DeploymentId> {
        self.deployments.keys().copied().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn load(yaml: &str) -> Result<Config, config::ConfigError> {
        Config::defaults()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn defaults_without_deployments() {
        let config = load("{}").unwrap();
        assert!(config.deployments.is_empty());
        assert_eq!(config.http.request_timeout, Duration::from_secs(30));
        assert_eq!(config.http.auth_timeout, Duration::from_secs(10));
        assert!(config.http.accept_invalid_certs);
        assert_eq!(config.report.title, None);
    }

    #[test]
    fn resolves_deployments_from_the_table() {
        let config = load(
            r#"
deployments:
  boi:
    base_url: https://boi-zvm.example.local
    secret: boi-secret
  sgu:
    base_url: https://sgu-zvm.example.local
    client_id: reporting
    secret: sgu-secret
http:
  request_timeout: 1m
"#,
        )
        .unwrap();

        assert_eq!(config.deployment_ids(), vec![DeploymentId::Sgu, DeploymentId::Boi]);
        assert_eq!(config.http.request_timeout, Duration::from_secs(60));

        let boi = config.deployment(DeploymentId::Boi).unwrap();
        assert_eq!(boi.id, DeploymentId::Boi);
        assert_eq!(boi.base_url.as_str(), "https://boi-zvm.example.local/");
        assert_eq!(boi.client_id, "zerto-api");
        assert_eq!(boi.secret.expose(), "boi-secret");

        let sgu = config.deployment(DeploymentId::Sgu).unwrap();
        assert_eq!(sgu.client_id, "reporting");
    }

    #[test]
    fn missing_deployment_is_a_config_error() {
        let config = load("{}").unwrap();
        let err = config.deployment(DeploymentId::Fb).unwrap_err();
        assert!(err.to_string().contains("deployments.fb"), "{err}");
    }

    #[test]
    fn deployment_without_secret_is_rejected() {
        let result = load(
            r#"
deployments:
  sgu:
    base_url: https://sgu-zvm.example.local
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn secrets_are_redacted() {
        let config = load(
            r#"
deployments:
  fb:
    base_url: https://fb-zvm.example.local
    secret: hunter2
"#,
        )
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"), "{debug}");

        let yaml = serde_yml::to_string(&config).unwrap();
        assert!(!yaml.contains("hunter2"), "{yaml}");
        assert!(yaml.contains("***"), "{yaml}");
        assert!(yaml.contains("https://fb-zvm.example.local"), "{yaml}");
    }
}
