//! PredictPIX Trading - Buying Positions
//!
//! This crate provides:
//! - Buy quotes (stake, transaction fee, potential return)
//! - The active market board
//! - The choose / confirm / place purchase flow and its receipt

pub mod purchase;
pub mod quote;

pub use purchase::{MarketBoard, PurchaseError, PurchaseFlow, PurchaseReceipt, PurchaseState, Result};
pub use quote::{BuyQuote, PositionSide, RETURN_MULTIPLIER, TRANSACTION_FEE};
