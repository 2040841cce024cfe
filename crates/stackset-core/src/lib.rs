pub mod api;
pub mod aws;
pub mod cache;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
pub mod model;
pub mod paginate;
pub mod report;
pub mod selection;
pub mod service;
pub mod types;

pub use error::{Result, StacksetError};
pub use service::{Remediation, Settings, StackSetService};
