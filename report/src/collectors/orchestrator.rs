use crate::{
    collectors::{
        Collector,
        DeploymentCollector,
        DeploymentReport,
    },
    CollectError,
};
use chrono::{
    DateTime,
    Utc,
};
use std::{
    future::Future,
    pin::Pin,
};
use zerto_usage_config::DeploymentId;

/// A deployment whose run failed. Its data is discarded.
#[derive(Debug)]
pub struct DeploymentFailure {
    pub deployment: DeploymentId,
    pub error: CollectError,
}

/// Runs deployment collectors one after another.
pub struct Orchestrator {
    collectors: Vec<DeploymentCollector>,
    failures: Vec<DeploymentFailure>,
    collected_at: Option<DateTime<Utc>>,
}

impl Orchestrator {
    pub fn new(collectors: Vec<DeploymentCollector>) -> Self {
        Self {
            collectors,
            failures: Vec::new(),
            collected_at: None,
        }
    }

    /// Reports of the deployments that succeeded.
    pub fn reports(&self) -> impl Iterator<Item = &DeploymentReport> {
        self.collectors.iter().filter_map(|collector| collector.report())
    }

    pub fn failures(&self) -> &[DeploymentFailure] {
        &self.failures
    }

    pub fn deployments(&self) -> usize {
        self.collectors.len()
    }
}

impl Collector for Orchestrator {
    /// Never fails itself; failing deployments are recorded in [`Orchestrator::failures`].
    fn collect(&mut self) -> Pin<Box<dyn Future<Output = Result<(), CollectError>> + Send + '_>> {
        Box::pin(async move {
            self.failures.clear();
            for collector in &mut self.collectors {
                let deployment = collector.deployment();
                if let Err(error) = collector.collect().await {
                    error!(%deployment, %error, "Deployment failed, its data is discarded");
                    self.failures.push(DeploymentFailure { deployment, error });
                }
            }
            self.collected_at = Some(Utc::now());
            Ok(())
        })
    }

    fn format(&self) -> String {
        let mut report = String::new();
        for collector in &self.collectors {
            if collector.report().is_some() {
                report.push_str(&collector.format());
            }
        }
        for failure in &self.failures {
            report.push_str(&format!(
                "Deployment {} failed: {}\n",
                failure.deployment.to_string().to_uppercase(),
                failure.error
            ));
        }
        report
    }

    fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "collected_at": self.collected_at,
            "deployments": self
                .collectors
                .iter()
                .filter(|collector| collector.report().is_some())
                .map(|collector| collector.summary())
                .collect::<Vec<_>>(),
            "failures": self
                .failures
                .iter()
                .map(|failure| serde_json::json!({
                    "deployment": failure.deployment,
                    "error": failure.error.to_string(),
                }))
                .collect::<Vec<_>>(),
        })
    }

    fn name(&self) -> &'static str {
        "Orchestrator"
    }
}
