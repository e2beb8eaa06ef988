//! # Zerto API client
//!
//! Typed, read-only access to the management API of a Zerto deployment.
//!
//! - **`authenticate`**: exchanges the deployment's client credentials for a bearer [`Session`]
//! - **`ZertoClient`**: VPG, VM, site, VRA, status and resource report endpoints
//! - **`fetch_all_pages`**: sequential page walk used by the resource report
//!
//! Every call is a single request without retries. A failing call surfaces an [`ApiError`] (or [`AuthError`] for
//! the token exchange) to the caller.

#[macro_use]
extern crate tracing;

mod auth;
mod client;
mod error;
pub mod models;
mod pagination;
mod server_time;

pub use auth::{
    authenticate,
    Session,
};
pub use client::{
    build_http_client,
    ZertoClient,
    RESOURCE_PAGE_SIZE,
};
pub use error::{
    ApiError,
    AuthError,
};
pub use pagination::fetch_all_pages;
pub use server_time::{
    ServerTime,
    REPORT_TIME_ZONE,
};
