use crate::AuthError;
use reqwest::StatusCode;
use serde::Deserialize;
use std::{
    fmt,
    time::Duration,
};
use zerto_usage_config::{
    Deployment,
    DeploymentId,
};

const TOKEN_PATH: &str = "auth/realms/zerto/protocol/openid-connect/token";

/// A bearer token for one deployment. Obtained once per run and never refreshed; the expiry is managed by the
/// platform.
#[derive(Clone)]
pub struct Session {
    deployment: DeploymentId,
    token: String,
}

impl Session {
    pub fn new(deployment: DeploymentId, token: impl Into<String>) -> Self {
        Self {
            deployment,
            token: token.into(),
        }
    }

    pub fn deployment(&self) -> DeploymentId {
        self.deployment
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("deployment", &self.deployment)
            .field("token", &"***")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Performs the OAuth2 client-credentials exchange against the deployment's identity endpoint. Only a `200 OK`
/// carrying an `access_token` counts as success.
#[instrument(level = "debug", skip_all, fields(deployment = %deployment.id))]
pub async fn authenticate(
    http: &reqwest::Client,
    deployment: &Deployment,
    timeout: Duration,
) -> Result<Session, AuthError> {
    let url = deployment.endpoint(TOKEN_PATH);
    info!("Attempting to authenticate");

    let response = http
        .post(&url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", deployment.client_id.as_str()),
            ("client_secret", deployment.secret.expose()),
        ])
        .timeout(timeout)
        .send()
        .await
        .map_err(|source| AuthError::Unreachable {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    let body = response.text().await.map_err(|source| AuthError::Unreachable {
        url: url.clone(),
        source,
    })?;

    if status != StatusCode::OK {
        warn!(%status, "Authentication rejected");
        return Err(AuthError::Rejected { status, body });
    }

    let token = serde_json::from_str::<TokenResponse>(&body)
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::MalformedResponse("access_token is missing".to_string()))?;

    info!("Authentication successful");
    Ok(Session::new(deployment.id, token))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn session_debug_hides_the_token() {
        let session = Session::new(DeploymentId::Boi, "eyJhbGciOi");
        let debug = format!("{session:?}");
        assert!(!debug.contains("eyJhbGciOi"), "{debug}");
        assert_eq!(session.bearer(), "Bearer eyJhbGciOi");
        assert_eq!(session.deployment(), DeploymentId::Boi);
    }
}
