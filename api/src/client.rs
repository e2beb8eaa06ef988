use crate::{
    fetch_all_pages,
    models::{
        Agent,
        ResourceRecord,
        Site,
        VmSummary,
        VpgSummary,
    },
    ApiError,
    ServerTime,
    Session,
};
use chrono::NaiveDate;
use reqwest::{
    header,
    StatusCode,
};
use serde::de::DeserializeOwned;
use zerto_usage_config::{
    Deployment,
    DeploymentId,
    HttpConfig,
};

/// Page size requested from the resource report.
pub const RESOURCE_PAGE_SIZE: u32 = 1000;

/// Builds the HTTP client used for one deployment: the configured timeout applies to every request, certificate
/// verification follows `accept_invalid_certs`.
pub fn build_http_client(http: &HttpConfig) -> Result<reqwest::Client, ApiError> {
    if http.accept_invalid_certs {
        debug!("TLS certificate verification is disabled");
    }
    reqwest::Client::builder()
        .timeout(http.request_timeout)
        .danger_accept_invalid_certs(http.accept_invalid_certs)
        .build()
        .map_err(ApiError::Client)
}

/// Authenticated read access to one deployment.
#[derive(Debug, Clone)]
pub struct ZertoClient {
    http: reqwest::Client,
    deployment: Deployment,
    session: Session,
}

impl ZertoClient {
    pub fn new(http: reqwest::Client, deployment: Deployment, session: Session) -> Self {
        Self {
            http,
            deployment,
            session,
        }
    }

    pub fn deployment(&self) -> DeploymentId {
        self.deployment.id
    }

    /// Issues `GET <path>` with the bearer token. Anything but `200 OK` is an error.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let endpoint = self.deployment.endpoint(path);
        let transport = |source| ApiError::Transport {
            endpoint: endpoint.clone(),
            source,
        };

        let response = self
            .http
            .get(&endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, self.session.bearer())
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if status != StatusCode::OK {
            warn!(%endpoint, %status, "Request failed");
            return Err(ApiError::Status {
                endpoint,
                status,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }

    #[instrument(level = "debug", skip(self), fields(deployment = %self.deployment.id))]
    pub async fn list_vpgs(&self) -> Result<Vec<VpgSummary>, ApiError> {
        self.get_json("v1/vpgs", &[]).await
    }

    #[instrument(level = "debug", skip(self), fields(deployment = %self.deployment.id))]
    pub async fn list_sites(&self) -> Result<Vec<Site>, ApiError> {
        self.get_json("v1/peersites", &[]).await
    }

    #[instrument(level = "debug", skip(self), fields(deployment = %self.deployment.id))]
    pub async fn list_replication_agents(&self) -> Result<Vec<Agent>, ApiError> {
        self.get_json("v1/vras", &[]).await
    }

    /// Status names, indexed by [`VpgSummary::status`].
    #[instrument(level = "debug", skip(self), fields(deployment = %self.deployment.id))]
    pub async fn list_vpg_statuses(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("v1/vpgs/statuses", &[]).await
    }

    /// Substatus names, indexed by [`VpgSummary::sub_status`].
    #[instrument(level = "debug", skip(self), fields(deployment = %self.deployment.id))]
    pub async fn list_vpg_substatuses(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("v1/vpgs/substatuses", &[]).await
    }

    #[instrument(level = "debug", skip(self), fields(deployment = %self.deployment.id))]
    pub async fn get_server_time(&self) -> Result<ServerTime, ApiError> {
        let value: String = self.get_json("v1/serverDateTime/ServerDateTimeUTC", &[]).await?;
        let time = ServerTime::parse(&value)?;
        debug!(utc = %time.utc(), local = %time.local(), "Server time");
        Ok(time)
    }

    #[instrument(level = "debug", skip(self), fields(deployment = %self.deployment.id))]
    pub async fn list_vms_for_organization(&self, organization: &str) -> Result<Vec<VmSummary>, ApiError> {
        self.get_json(
            "v1/vms",
            &[
                ("organizationName", organization.to_string()),
                ("includeBackupedVms", "false".to_string()),
            ],
        )
        .await
    }

    /// Fetches every page of the resource report of `organization` for `date`. A failing page discards the pages
    /// fetched before it.
    #[instrument(level = "debug", skip(self), fields(deployment = %self.deployment.id))]
    pub async fn get_resource_report(
        &self,
        organization: &str,
        date: NaiveDate,
    ) -> Result<Vec<ResourceRecord>, ApiError> {
        let start_time = date.format("%Y-%m-%d").to_string();
        let start_time = start_time.as_str();
        let records = fetch_all_pages(move |page_number| self.get_resource_page(organization, start_time, page_number))
            .await?;
        debug!(records = records.len(), "Fetched resource report");
        Ok(records)
    }

    async fn get_resource_page(
        &self,
        organization: &str,
        start_time: &str,
        page_number: u32,
    ) -> Result<Vec<ResourceRecord>, ApiError> {
        self.get_json(
            "v1/reports/resources",
            &[
                ("startTime", start_time.to_string()),
                ("pageNumber", page_number.to_string()),
                ("zorgName", organization.to_string()),
                ("pageSize", RESOURCE_PAGE_SIZE.to_string()),
            ],
        )
        .await
    }
}
