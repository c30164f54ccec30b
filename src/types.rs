//! Types for the Bitcoin price poller

use crate::constants::{COINGECKO_SIMPLE_PRICE_ENDPOINT, DEFAULT_COIN_ID, DEFAULT_VS_CURRENCY};
use chrono::{DateTime, Utc};

/// One price lookup: which coin, quoted in which currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuery {
    /// CoinGecko coin id, e.g. `bitcoin`
    pub coin_id: String,

    /// Quote currency, e.g. `usd`
    pub vs_currency: String,
}

impl Default for PriceQuery {
    fn default() -> Self {
        Self::new(DEFAULT_COIN_ID, DEFAULT_VS_CURRENCY)
    }
}

impl PriceQuery {
    /// Create a new query
    pub fn new(coin_id: impl Into<String>, vs_currency: impl Into<String>) -> Self {
        Self {
            coin_id: coin_id.into(),
            vs_currency: vs_currency.into(),
        }
    }

    /// Builds the simple price URL for this query against `base_url`
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}{}?ids={}&vs_currencies={}",
            base_url.trim_end_matches('/'),
            COINGECKO_SIMPLE_PRICE_ENDPOINT,
            self.coin_id,
            self.vs_currency
        )
    }
}

/// A price returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct PriceData {
    /// Coin id the price is for
    pub coin_id: String,

    /// Quote currency of `price`
    pub vs_currency: String,

    /// Price as returned by the source
    pub price: f64,

    /// When the price was received
    pub fetched_at: DateTime<Utc>,

    /// Data source
    pub source: String,
}

impl PriceData {
    /// Create new price data for `query`, stamped now
    pub fn new(query: &PriceQuery, price: f64, source: impl Into<String>) -> Self {
        Self {
            coin_id: query.coin_id.clone(),
            vs_currency: query.vs_currency.clone(),
            price,
            fetched_at: Utc::now(),
            source: source.into(),
        }
    }
}

/// Outcome of one `fetch_price` call. `None` means no price this cycle,
/// which is not the same as a price of zero.
pub type PriceResult = Option<PriceData>;

/// Lifecycle of the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Polling
    Running,
    /// Interrupted, loop has returned
    Stopped,
}
