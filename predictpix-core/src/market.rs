//! Market and prediction structures returned by the PredictPIX backend

use crate::tier::Tier;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a market on the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    /// Open for predictions
    Active,
    /// Created but awaiting approval
    #[default]
    Pending,
    /// No longer accepting predictions
    Closed,
    /// Outcome determined
    Resolved,
    /// Any status this client does not know about
    #[serde(untagged)]
    Other(String),
}

impl MarketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MarketStatus::Active => "active",
            MarketStatus::Pending => "pending",
            MarketStatus::Closed => "closed",
            MarketStatus::Resolved => "resolved",
            MarketStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A market as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Server-assigned identifier
    pub id: u64,

    /// Question the market resolves
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub status: MarketStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,

    /// Pi staked on YES
    #[serde(default, with = "rust_decimal::serde::float")]
    pub yes_pool: Decimal,

    /// Pi staked on NO
    #[serde(default, with = "rust_decimal::serde::float")]
    pub no_pool: Decimal,

    /// Total Pi staked
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_pool: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Market {
    /// Check if this market currently accepts predictions
    pub fn is_active(&self) -> bool {
        self.status == MarketStatus::Active
    }

    /// Share of the pool staked on YES, in percent
    ///
    /// Returns `None` while the pool is empty.
    pub fn yes_probability(&self) -> Option<Decimal> {
        if self.total_pool.is_zero() {
            return None;
        }
        Some(self.yes_pool / self.total_pool * Decimal::ONE_HUNDRED)
    }
}

/// Filter for market listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarketFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MarketStatus>,
}

impl MarketFilter {
    pub fn with_status(status: MarketStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    /// Markets open for predictions
    pub fn active() -> Self {
        Self::with_status(MarketStatus::Active)
    }
}

/// Request body for placing a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub market_id: u64,

    /// Stake in Pi
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// `true` for YES, `false` for NO
    pub predicted_outcome: bool,
}

/// A prediction recorded by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: u64,

    pub market_id: u64,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub predicted_outcome: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
