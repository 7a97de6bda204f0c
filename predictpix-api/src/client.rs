//! PredictPIX API client
//!
//! Provides methods for interacting with the markets and predictions REST API.

use crate::config::ApiConfig;
use crate::traits::{MarketsApi, PredictionsApi};
use crate::types::{decode_payload, error_message};
use async_trait::async_trait;
use predictpix_core::{
    Market, MarketDraft, MarketFilter, PredictError, PredictResult, Prediction,
    PredictionRequest,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

/// PredictPIX API client
#[derive(Clone)]
pub struct PredictPixClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl PredictPixClient {
    /// Create a new client from configuration
    pub fn new(config: &ApiConfig) -> PredictResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| PredictError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> PredictResult<Self> {
        let config = ApiConfig::from_env()?;
        info!("PredictPIX API client configured for {}", config.base_url);
        Self::new(&config)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach the token obtained from the wallet-network login
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    /// Drop the access token (logout)
    pub fn clear_access_token(&mut self) {
        self.access_token = None;
    }

    /// Check if the client is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the success payload, mapping failures
    /// onto [`PredictError`]
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        action: &str,
    ) -> PredictResult<T> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| PredictError::network(format!("Failed to {}: {}", action, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PredictError::network(format!("Failed to read response: {}", e)))?;

        if status.is_success() {
            return decode_payload(&body);
        }

        let fallback = status.canonical_reason().unwrap_or("Request failed");
        let message = error_message(&body, fallback);
        warn!("PredictPIX API error ({}) while trying to {}: {}", status, action, message);

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PredictError::auth(message),
            StatusCode::NOT_FOUND => PredictError::not_found(message),
            _ => PredictError::api(status.as_u16(), message),
        })
    }

    /// Create a market from the accumulated draft
    #[instrument(skip(self, draft), fields(title = draft.title().unwrap_or_default()))]
    pub async fn create_market(&self, draft: &MarketDraft) -> PredictResult<Market> {
        let url = self.url("/markets");

        debug!("Creating market at: {}", url);

        let market: Market = self
            .execute(self.client.post(&url).json(draft), "create market")
            .await?;

        info!("Market created with id {}", market.id);
        Ok(market)
    }

    /// List markets, optionally filtered by status
    #[instrument(skip(self))]
    pub async fn get_markets(&self, filter: &MarketFilter) -> PredictResult<Vec<Market>> {
        let url = self.url("/markets");
        let mut request = self.client.get(&url);
        if let Some(status) = &filter.status {
            request = request.query(&[("status", status.as_str())]);
        }

        debug!("Fetching markets from: {} ({:?})", url, filter.status);

        let markets: Vec<Market> = self.execute(request, "fetch markets").await?;

        debug!("Fetched {} markets", markets.len());
        Ok(markets)
    }

    /// Get a single market by id
    #[instrument(skip(self))]
    pub async fn get_market(&self, market_id: u64) -> PredictResult<Market> {
        let url = self.url(&format!("/markets/{}", market_id));

        debug!("Fetching market: {}", market_id);

        self.execute(self.client.get(&url), "fetch market").await
    }

    /// Place a prediction on a market
    #[instrument(skip(self))]
    pub async fn place_prediction(&self, request: &PredictionRequest) -> PredictResult<Prediction> {
        let url = self.url("/predictions");

        debug!(
            "Placing prediction on market {} ({} Pi, outcome {})",
            request.market_id, request.amount, request.predicted_outcome
        );

        let prediction: Prediction = self
            .execute(self.client.post(&url).json(request), "place prediction")
            .await?;

        info!("Prediction {} recorded", prediction.id);
        Ok(prediction)
    }
}

impl std::fmt::Debug for PredictPixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictPixClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.access_token.is_some())
            .finish()
    }
}

#[async_trait]
impl MarketsApi for PredictPixClient {
    async fn create_market(&self, draft: &MarketDraft) -> PredictResult<Market> {
        PredictPixClient::create_market(self, draft).await
    }

    async fn get_markets(&self, filter: &MarketFilter) -> PredictResult<Vec<Market>> {
        PredictPixClient::get_markets(self, filter).await
    }

    async fn get_market(&self, market_id: u64) -> PredictResult<Market> {
        PredictPixClient::get_market(self, market_id).await
    }
}

#[async_trait]
impl PredictionsApi for PredictPixClient {
    async fn place_prediction(&self, request: &PredictionRequest) -> PredictResult<Prediction> {
        PredictPixClient::place_prediction(self, request).await
    }
}
