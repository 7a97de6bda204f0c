//! PredictPIX backend integration
//!
//! This crate provides the contracts the client expects from the markets
//! and predictions service ([`MarketsApi`], [`PredictionsApi`]), a `reqwest`
//! implementation of both ([`PredictPixClient`]), and the environment-driven
//! [`ApiConfig`].

pub mod client;
pub mod config;
pub mod traits;
pub mod types;

pub use client::PredictPixClient;
pub use config::{ApiConfig, ConfigError};
pub use traits::{MarketsApi, PredictionsApi};
