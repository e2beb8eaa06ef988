use crate::CollectError;
use std::{
    future::Future,
    pin::Pin,
};

/// Trait for collecting and formatting usage data
pub trait Collector {
    /// Collect usage from the platform
    fn collect(&mut self) -> Pin<Box<dyn Future<Output = Result<(), CollectError>> + Send + '_>>;

    /// Format the collected data as the plain-text report
    fn format(&self) -> String;

    /// Get data summary as JSON
    fn summary(&self) -> serde_json::Value;

    /// Get the name of this collector
    fn name(&self) -> &'static str;
}
