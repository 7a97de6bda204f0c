//! Core types for the PredictPIX market-creation client
//!
//! This crate defines the shared data structures used across the client:
//! the market draft assembled by the creation wizard, creation tiers,
//! backend market and prediction types, and the common error type.

pub mod draft;
pub mod error;
pub mod market;
pub mod tier;

pub use draft::{
    DraftField, DraftPatch, FeePolicy, MarketDraft, MergePolicy, OutcomeMetadata, Schedule,
    DEFAULT_NO_LABEL, DEFAULT_YES_LABEL, END_OFFSET_DAYS, RESOLUTION_OFFSET_DAYS,
};
pub use error::{PredictError, PredictResult};
pub use market::{Market, MarketFilter, MarketStatus, Prediction, PredictionRequest};
pub use tier::Tier;
