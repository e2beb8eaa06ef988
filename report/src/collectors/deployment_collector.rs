use crate::{
    aggregate,
    collectors::Collector,
    format_report,
    grand_total,
    group_by_vpg,
    normalize,
    organizations_from_vpgs,
    throughput_by_site,
    CollectError,
    OrganizationTotals,
    UsageByOrganization,
    VmRecord,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
};
use zerto_usage_api::{
    authenticate,
    build_http_client,
    ServerTime,
    ZertoClient,
};
use zerto_usage_config::{
    Deployment,
    DeploymentId,
    HttpConfig,
};

/// Builds the deployment's HTTP client and authenticates.
pub async fn connect(deployment: &Deployment, http: &HttpConfig) -> Result<ZertoClient, CollectError> {
    let client = build_http_client(http)?;
    let session = authenticate(&client, deployment, http.auth_timeout).await?;
    Ok(ZertoClient::new(client, deployment.clone(), session))
}

/// Everything one deployment's run produced.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub deployment: DeploymentId,
    pub server_time: ServerTime,
    pub report_date: NaiveDate,
    pub usage: UsageByOrganization,
    pub grand_total: OrganizationTotals,
    pub throughput_by_site: BTreeMap<String, f64>,
    #[serde(skip)]
    pub vms: Vec<VmRecord>,
}

/// Collects the usage of every organization of one deployment.
pub struct DeploymentCollector {
    deployment: Deployment,
    http: HttpConfig,
    title: Option<String>,
    report: Option<DeploymentReport>,
}

impl DeploymentCollector {
    pub fn new(deployment: Deployment, http: HttpConfig, title: Option<String>) -> Self {
        Self {
            deployment,
            http,
            title,
            report: None,
        }
    }

    pub fn deployment(&self) -> DeploymentId {
        self.deployment.id
    }

    pub fn report(&self) -> Option<&DeploymentReport> {
        self.report.as_ref()
    }

    /// The configured title, or `Monthly Zerto Usage Report for <month> (<DEPLOYMENT>)`.
    pub fn title(&self, report_date: NaiveDate) -> String {
        match &self.title {
            Some(title) => format!("{title} ({})", self.deployment.id.to_string().to_uppercase()),
            None => format!(
                "Monthly Zerto Usage Report for {} ({})",
                report_date.format("%B"),
                self.deployment.id.to_string().to_uppercase()
            ),
        }
    }

    #[instrument(level = "info", skip(self), fields(deployment = %self.deployment.id))]
    async fn run(&self) -> Result<DeploymentReport, CollectError> {
        let client = connect(&self.deployment, &self.http).await?;

        let server_time = client.get_server_time().await?;
        let report_date = server_time.report_date();
        info!(%report_date, "Collecting usage");

        let vpgs = client.list_vpgs().await?;
        let organizations = organizations_from_vpgs(&vpgs);
        info!(vpgs = vpgs.len(), organizations = organizations.len(), "Discovered organizations");

        let mut vms = Vec::new();
        for organization in &organizations {
            let records = client
                .get_resource_report(organization, report_date)
                .await
                .map_err(|source| CollectError::Organization {
                    organization: organization.clone(),
                    source,
                })?;
            let normalized = normalize(organization, &records);
            debug!(%organization, vms = normalized.len(), "Normalized resource report");
            vms.extend(normalized);
        }

        let usage = aggregate(&vms);
        info!(organizations = usage.len(), vms = vms.len(), "Aggregated usage");

        Ok(DeploymentReport {
            deployment: self.deployment.id,
            server_time,
            report_date,
            grand_total: grand_total(&usage),
            usage,
            throughput_by_site: throughput_by_site(&vpgs),
            vms,
        })
    }
}

impl Collector for DeploymentCollector {
    fn collect(&mut self) -> Pin<Box<dyn Future<Output = Result<(), CollectError>> + Send + '_>> {
        Box::pin(async move {
            // A failed run leaves no report behind.
            self.report = None;
            let report = self.run().await?;
            self.report = Some(report);
            Ok(())
        })
    }

    fn format(&self) -> String {
        match &self.report {
            Some(report) => format_report(&self.title(report.report_date), &report.usage),
            None => format!("No usage collected for {} yet.\n", self.deployment.id),
        }
    }

    fn summary(&self) -> serde_json::Value {
        let Some(report) = &self.report else {
            return serde_json::Value::Null;
        };

        let vpgs = group_by_vpg(&report.vms);
        let (mut json_data, vpgs) = match (serde_json::to_value(report), serde_json::to_value(vpgs)) {
            (Ok(json_data), Ok(vpgs)) => (json_data, vpgs),
            (Err(error), _) | (_, Err(error)) => {
                error!(deployment = %self.deployment.id, %error, "Failed to serialize the report");
                return serde_json::Value::Null;
            }
        };
        json_data["title"] = self.title(report.report_date).into();
        json_data["vpgs"] = vpgs;
        json_data
    }

    fn name(&self) -> &'static str {
        "DeploymentCollector"
    }
}
