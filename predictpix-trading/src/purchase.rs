//! Market board and purchase flow
//!
//! The board lists active markets. A purchase walks through choosing a
//! side, confirming an amount and placing the prediction; a successful
//! placement yields the receipt shown on the purchase status screen.

use crate::quote::{BuyQuote, PositionSide};
use predictpix_api::{MarketsApi, PredictionsApi};
use predictpix_core::{Market, MarketFilter, PredictionRequest};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

const LOAD_FAILED: &str = "Failed to load markets. Please try again.";
const PLACE_FAILED: &str = "Failed to create prediction";

// ============================================================================
// Errors
// ============================================================================

/// Purchase errors, displayed as-is to the buyer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Market is not active")]
    MarketInactive,

    #[error("Market not found")]
    MarketNotFound,

    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error("{0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, PurchaseError>;

// ============================================================================
// Market Board
// ============================================================================

/// Active markets available to buy into
#[derive(Debug, Default)]
pub struct MarketBoard {
    markets: Vec<Market>,
    error: Option<String>,
}

impl MarketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Banner shown when the last refresh failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, market_id: u64) -> Option<&Market> {
        self.markets.iter().find(|m| m.id == market_id)
    }

    /// Reload active markets; on failure the previous list stays visible
    pub async fn refresh<A>(&mut self, api: &A) -> bool
    where
        A: MarketsApi + ?Sized,
    {
        self.error = None;
        match api.get_markets(&MarketFilter::active()).await {
            Ok(markets) => {
                debug!("Market board loaded {} markets", markets.len());
                self.markets = markets;
                true
            }
            Err(e) => {
                warn!("Error fetching markets: {}", e);
                self.error = Some(LOAD_FAILED.to_string());
                false
            }
        }
    }
}

// ============================================================================
// Purchase Flow
// ============================================================================

/// Details handed to the purchase status screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub prediction_id: u64,
    pub market: String,
    pub position: PositionSide,
    pub stake_amount: String,
    pub transaction_fee: String,
    pub potential_profit: String,
}

impl PurchaseReceipt {
    fn new(prediction_id: u64, market: &Market, quote: &BuyQuote) -> Self {
        Self {
            prediction_id,
            market: market.title.clone(),
            position: quote.side,
            stake_amount: format!("{:.2}", quote.amount.round_dp(2)),
            transaction_fee: format!("{:.2}", quote.fee.round_dp(2)),
            potential_profit: format!("{:.2}", quote.potential_return.round_dp(2)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseState {
    Idle,
    /// Buy dialog open, waiting for an amount
    Choosing { market: Market, side: PositionSide },
    /// Confirmation dialog showing the quote
    Confirming { market: Market, quote: BuyQuote },
    Placing,
    Placed(PurchaseReceipt),
    Failed(String),
}

impl PurchaseState {
    fn name(&self) -> &'static str {
        match self {
            PurchaseState::Idle => "idle",
            PurchaseState::Choosing { .. } => "choosing",
            PurchaseState::Confirming { .. } => "confirming",
            PurchaseState::Placing => "placing",
            PurchaseState::Placed(_) => "placed",
            PurchaseState::Failed(_) => "failed",
        }
    }
}

/// One buy-a-position interaction
#[derive(Debug)]
pub struct PurchaseFlow {
    state: PurchaseState,
}

impl Default for PurchaseFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl PurchaseFlow {
    pub fn new() -> Self {
        Self {
            state: PurchaseState::Idle,
        }
    }

    pub fn state(&self) -> &PurchaseState {
        &self.state
    }

    /// Open the buy dialog for `side` of `market`
    pub fn open(&mut self, market: Market, side: PositionSide) -> Result<()> {
        if !market.is_active() {
            return Err(PurchaseError::MarketInactive);
        }
        if matches!(self.state, PurchaseState::Placing) {
            return Err(self.invalid("open a market"));
        }
        debug!("Buy {} on market {}", side, market.id);
        self.state = PurchaseState::Choosing { market, side };
        Ok(())
    }

    /// Accept the typed amount and move to confirmation
    pub fn confirm_amount(&mut self, input: &str) -> Result<&BuyQuote> {
        let PurchaseState::Choosing { market, side } = &self.state else {
            return Err(self.invalid("confirm an amount"));
        };
        let quote = BuyQuote::parse(*side, input)?;
        self.state = PurchaseState::Confirming {
            market: market.clone(),
            quote,
        };
        match &self.state {
            PurchaseState::Confirming { quote, .. } => Ok(quote),
            _ => Err(self.invalid("confirm an amount")),
        }
    }

    /// Close any open dialog
    pub fn cancel(&mut self) -> bool {
        match self.state {
            PurchaseState::Placing => false,
            _ => {
                self.state = PurchaseState::Idle;
                true
            }
        }
    }

    /// Place the confirmed prediction
    pub async fn place<A>(&mut self, api: &A) -> Result<PurchaseReceipt>
    where
        A: PredictionsApi + ?Sized,
    {
        let (market, quote) = match std::mem::replace(&mut self.state, PurchaseState::Idle) {
            PurchaseState::Confirming { market, quote } => (market, quote),
            other => {
                self.state = other;
                return Err(self.invalid("place a prediction"));
            }
        };

        if market.id == 0 {
            return Err(PurchaseError::MarketNotFound);
        }

        let request = PredictionRequest {
            market_id: market.id,
            amount: quote.amount,
            predicted_outcome: quote.side.predicted_outcome(),
        };

        self.state = PurchaseState::Placing;
        match api.place_prediction(&request).await {
            Ok(prediction) => {
                info!(
                    "Prediction {} placed on market {} ({} Pi on {})",
                    prediction.id, market.id, quote.amount, quote.side
                );
                let receipt = PurchaseReceipt::new(prediction.id, &market, &quote);
                self.state = PurchaseState::Placed(receipt.clone());
                Ok(receipt)
            }
            Err(e) => {
                warn!("Error creating prediction: {}", e);
                let message = match e.user_message() {
                    "" => PLACE_FAILED.to_string(),
                    msg => msg.to_string(),
                };
                self.state = PurchaseState::Failed(message.clone());
                Err(PurchaseError::Rejected(message))
            }
        }
    }

    /// Dismiss a receipt or failure and return to idle
    pub fn dismiss(&mut self) {
        if matches!(
            self.state,
            PurchaseState::Placed(_) | PurchaseState::Failed(_)
        ) {
            self.state = PurchaseState::Idle;
        }
    }

    fn invalid(&self, action: &'static str) -> PurchaseError {
        PurchaseError::InvalidState {
            action,
            state: self.state.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use predictpix_core::{MarketDraft, MarketStatus, PredictError, PredictResult, Prediction};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn market(id: u64, status: MarketStatus) -> Market {
        Market {
            id,
            title: "Will Pi hit $1 this year?".to_string(),
            description: None,
            status,
            tier: None,
            yes_pool: dec!(60),
            no_pool: dec!(40),
            total_pool: dec!(100),
            end_time: None,
            resolution_time: None,
            created_at: None,
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        fail_listing: bool,
        reject_with: Option<PredictError>,
        requests: Mutex<Vec<PredictionRequest>>,
    }

    #[async_trait]
    impl MarketsApi for FakeBackend {
        async fn create_market(&self, _draft: &MarketDraft) -> PredictResult<Market> {
            Err(PredictError::internal("not used"))
        }

        async fn get_markets(&self, filter: &MarketFilter) -> PredictResult<Vec<Market>> {
            assert_eq!(filter, &MarketFilter::active());
            if self.fail_listing {
                return Err(PredictError::network("connection reset"));
            }
            Ok(vec![market(1, MarketStatus::Active), market(2, MarketStatus::Active)])
        }

        async fn get_market(&self, market_id: u64) -> PredictResult<Market> {
            Ok(market(market_id, MarketStatus::Active))
        }
    }

    #[async_trait]
    impl PredictionsApi for FakeBackend {
        async fn place_prediction(&self, request: &PredictionRequest) -> PredictResult<Prediction> {
            self.requests.lock().push(request.clone());
            if let Some(err) = &self.reject_with {
                return Err(err.clone());
            }
            Ok(Prediction {
                id: 77,
                market_id: request.market_id,
                amount: request.amount,
                predicted_outcome: request.predicted_outcome,
                created_at: None,
            })
        }
    }

    #[tokio::test]
    async fn test_board_keeps_list_on_failure() {
        let mut board = MarketBoard::new();
        assert!(board.refresh(&FakeBackend::default()).await);
        assert_eq!(board.markets().len(), 2);
        assert!(board.find(2).is_some());

        let failing = FakeBackend {
            fail_listing: true,
            ..Default::default()
        };
        assert!(!board.refresh(&failing).await);
        assert_eq!(board.error(), Some("Failed to load markets. Please try again."));
        assert_eq!(board.markets().len(), 2);
    }

    #[test]
    fn test_inactive_market_cannot_be_opened() {
        let mut flow = PurchaseFlow::new();
        assert_eq!(
            flow.open(market(3, MarketStatus::Closed), PositionSide::Yes),
            Err(PurchaseError::MarketInactive)
        );
        assert_eq!(flow.state(), &PurchaseState::Idle);
    }

    #[tokio::test]
    async fn test_place_prediction_produces_receipt() {
        let backend = Arc::new(FakeBackend::default());
        let mut flow = PurchaseFlow::new();

        flow.open(market(1, MarketStatus::Active), PositionSide::No).unwrap();
        let quote = *flow.confirm_amount("100").unwrap();
        assert_eq!(quote.total_cost, dec!(102));

        // through the Arc blanket impl
        let receipt = flow.place(&backend).await.unwrap();

        assert_eq!(receipt.prediction_id, 77);
        assert_eq!(receipt.position, PositionSide::No);
        assert_eq!(receipt.stake_amount, "100.00");
        assert_eq!(receipt.transaction_fee, "2.00");
        assert_eq!(receipt.potential_profit, "125.00");
        assert!(matches!(flow.state(), PurchaseState::Placed(_)));

        let sent = backend.requests.lock()[0].clone();
        assert_eq!(sent.market_id, 1);
        assert_eq!(sent.amount, Decimal::from(100));
        assert!(!sent.predicted_outcome);

        flow.dismiss();
        assert_eq!(flow.state(), &PurchaseState::Idle);
    }

    #[tokio::test]
    async fn test_missing_market_id_never_calls_backend() {
        let backend = FakeBackend::default();
        let mut flow = PurchaseFlow::new();
        flow.open(market(0, MarketStatus::Active), PositionSide::Yes).unwrap();
        flow.confirm_amount("5").unwrap();

        assert_eq!(flow.place(&backend).await, Err(PurchaseError::MarketNotFound));
        assert!(backend.requests.lock().is_empty());
        assert_eq!(flow.state(), &PurchaseState::Idle);
    }

    #[tokio::test]
    async fn test_backend_rejection_surfaces_message() {
        let backend = FakeBackend {
            reject_with: Some(PredictError::api(400, "Insufficient balance")),
            ..Default::default()
        };
        let mut flow = PurchaseFlow::new();
        flow.open(market(1, MarketStatus::Active), PositionSide::Yes).unwrap();
        flow.confirm_amount("12.5").unwrap();

        let err = flow.place(&backend).await.unwrap_err();
        assert_eq!(err.to_string(), "Insufficient balance");
        assert_eq!(
            flow.state(),
            &PurchaseState::Failed("Insufficient balance".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_backend_message_falls_back() {
        let backend = FakeBackend {
            reject_with: Some(PredictError::api(500, "")),
            ..Default::default()
        };
        let mut flow = PurchaseFlow::new();
        flow.open(market(1, MarketStatus::Active), PositionSide::Yes).unwrap();
        flow.confirm_amount("1").unwrap();

        assert_eq!(
            flow.place(&backend).await,
            Err(PurchaseError::Rejected("Failed to create prediction".to_string()))
        );
    }

    #[tokio::test]
    async fn test_out_of_order_actions_are_refused() {
        let backend = FakeBackend::default();
        let mut flow = PurchaseFlow::new();

        assert!(matches!(
            flow.confirm_amount("10"),
            Err(PurchaseError::InvalidState { state: "idle", .. })
        ));
        assert!(matches!(
            flow.place(&backend).await,
            Err(PurchaseError::InvalidState { .. })
        ));

        flow.open(market(1, MarketStatus::Active), PositionSide::Yes).unwrap();
        assert!(matches!(
            flow.confirm_amount("0"),
            Err(PurchaseError::InvalidAmount(_))
        ));
        assert!(flow.cancel());
        assert_eq!(flow.state(), &PurchaseState::Idle);
    }
}
