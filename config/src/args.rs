use crate::DeploymentId;
use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

/// Zerto usage reporting
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file to use instead of `config.yaml` in the user config directory.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verify the TLS certificates of the management servers.
    #[clap(long, global = true)]
    pub verify_tls: bool,

    /// Enable debug logging.
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Aggregate per-organization usage and print the report.
    Report {
        /// Deployments to report on. Defaults to every configured deployment.
        #[clap(short, long = "deployment")]
        deployments: Vec<DeploymentId>,

        /// Additionally export the collected data as JSON.
        #[clap(long)]
        output_file: Option<PathBuf>,

        /// Print an overview table per deployment.
        #[clap(long)]
        table: bool,

        /// Print one row per protected VM.
        #[clap(long)]
        vms: bool,
    },

    /// List the VPGs of one organization with their member VMs.
    Inventory {
        #[clap(short, long)]
        deployment: DeploymentId,

        #[clap(short, long)]
        organization: String,
    },

    /// Print the effective configuration with secrets redacted.
    Config,
}

impl config::Source for Args {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut cache = config::Map::new();
        if self.verify_tls {
            cache.insert("http.accept_invalid_certs".to_string(), false.into());
        }
        Ok(cache)
    }
}
