use zerto_usage_api::{
    ApiError,
    AuthError,
};

/// Why a deployment's run produced no report.
#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("collecting usage of organization {organization:?} failed: {source}")]
    Organization {
        organization: String,
        #[source]
        source: ApiError,
    },
}
