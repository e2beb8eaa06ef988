//! # Collectors
//!
//! - **`Collector` trait**: collect, then format or summarize what was collected
//! - **`DeploymentCollector`**: one deployment's run: authenticate, date the report by the server clock, discover
//!   organizations from the VPG list, fetch and normalize each organization's resource report, aggregate
//! - **`Orchestrator`**: runs several deployment collectors one after another; a failing deployment does not stop
//!   the others

pub mod collector;
pub mod deployment_collector;
pub mod orchestrator;

pub use collector::Collector;
pub use deployment_collector::{
    connect,
    DeploymentCollector,
    DeploymentReport,
};
pub use orchestrator::{
    DeploymentFailure,
    Orchestrator,
};
