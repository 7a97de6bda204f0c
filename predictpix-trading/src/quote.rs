//! Buy quotes for YES/NO positions

use crate::purchase::{PurchaseError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flat fee charged on every position, in Pi
pub const TRANSACTION_FEE: Decimal = Decimal::TWO;

/// Return shown to the buyer per Pi staked
pub const RETURN_MULTIPLIER: Decimal = Decimal::from_parts(125, 0, 0, false, 2);

// ============================================================================
// Position Side
// ============================================================================

/// Side of a binary market the buyer is taking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Yes,
    No,
}

impl PositionSide {
    /// Value sent as `predicted_outcome`
    pub fn predicted_outcome(&self) -> bool {
        matches!(self, PositionSide::Yes)
    }

    pub fn from_outcome(predicted_outcome: bool) -> Self {
        if predicted_outcome {
            PositionSide::Yes
        } else {
            PositionSide::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Yes => "yes",
            PositionSide::No => "no",
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Quote
// ============================================================================

/// Cost breakdown shown in the confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuyQuote {
    pub side: PositionSide,
    pub amount: Decimal,
    pub fee: Decimal,
    pub potential_return: Decimal,
    pub total_cost: Decimal,
}

impl BuyQuote {
    pub fn for_amount(side: PositionSide, amount: Decimal) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(PurchaseError::InvalidAmount(amount.to_string()));
        }

        Ok(Self {
            side,
            amount,
            fee: TRANSACTION_FEE,
            potential_return: amount * RETURN_MULTIPLIER,
            total_cost: amount + TRANSACTION_FEE,
        })
    }

    /// Quote for an amount as typed into the buy dialog
    pub fn parse(side: PositionSide, input: &str) -> Result<Self> {
        let amount = Decimal::from_str(input.trim())
            .map_err(|_| PurchaseError::InvalidAmount(input.to_string()))?;
        Self::for_amount(side, amount)
    }
}
