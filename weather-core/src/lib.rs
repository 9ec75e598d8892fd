//! Core library for the `weather` tool.
//!
//! This crate defines:
//! - The temperature provider abstraction and its built-in implementations
//! - Concurrent aggregation of several providers into one reading
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use aggregate::{Outcome, ProviderSet, aggregate};
pub use config::{Config, ProviderConfig};
pub use error::ProviderError;
pub use model::TemperatureReport;
pub use provider::{ProviderId, TemperatureProvider};
