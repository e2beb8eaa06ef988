//! # Zerto Usage Report
//!
//! Turns the resource reports of a Zerto deployment into per-organization usage totals.
//!
//! ## Pipeline
//!
//! - **`normalize`**: flattens raw resource records into one [`VmRecord`] per protected VM
//! - **`aggregate`**: sums VM records per organization (vCPUs, memory, storage)
//! - **`format`**: renders the totals as the plain-text report, switching units from GB to TB above 2000 GB, and
//!   as terminal tables
//! - **`collectors`**: drive the pipeline against live deployments
//!   - **`DeploymentCollector`**: one deployment, end to end
//!   - **`Orchestrator`**: several deployments, each failing on its own
//!
//! ## Usage
//!
//! ```bash
//! # Report every configured deployment
//! zerto-usage report
//!
//! # Only SGU, with tables and a JSON export
//! zerto-usage report -d sgu --table --output-file=usage.json
//! ```

#[macro_use]
extern crate tracing;

pub mod aggregate;
pub mod collectors;
pub mod error;
pub mod format;
pub mod normalize;

pub use aggregate::*;
pub use collectors::*;
pub use error::CollectError;
pub use format::*;
pub use normalize::*;
