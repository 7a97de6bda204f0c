//! Contracts the client expects from the backend service
//!
//! Screens and controllers depend on these traits rather than on
//! [`crate::PredictPixClient`] so they can run against an in-memory backend.

use async_trait::async_trait;
use predictpix_core::{
    Market, MarketDraft, MarketFilter, PredictResult, Prediction, PredictionRequest,
};
use std::sync::Arc;

#[async_trait]
pub trait MarketsApi: Send + Sync + 'static {
    /// Create a market from a completed draft
    async fn create_market(&self, draft: &MarketDraft) -> PredictResult<Market>;

    /// List markets matching the filter
    async fn get_markets(&self, filter: &MarketFilter) -> PredictResult<Vec<Market>>;

    /// Fetch a single market
    async fn get_market(&self, market_id: u64) -> PredictResult<Market>;
}

#[async_trait]
pub trait PredictionsApi: Send + Sync + 'static {
    /// Stake Pi on one outcome of a market
    async fn place_prediction(&self, request: &PredictionRequest) -> PredictResult<Prediction>;
}

#[async_trait]
impl<T: MarketsApi + ?Sized> MarketsApi for Arc<T> {
    async fn create_market(&self, draft: &MarketDraft) -> PredictResult<Market> {
        (**self).create_market(draft).await
    }

    async fn get_markets(&self, filter: &MarketFilter) -> PredictResult<Vec<Market>> {
        (**self).get_markets(filter).await
    }

    async fn get_market(&self, market_id: u64) -> PredictResult<Market> {
        (**self).get_market(market_id).await
    }
}

#[async_trait]
impl<T: PredictionsApi + ?Sized> PredictionsApi for Arc<T> {
    async fn place_prediction(&self, request: &PredictionRequest) -> PredictResult<Prediction> {
        (**self).place_prediction(request).await
    }
}
