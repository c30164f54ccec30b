//! Provider abstraction for fetching prices from external APIs

use crate::{
    error::ProviderError,
    types::{PriceData, PriceQuery},
};
use async_trait::async_trait;

/// Trait for price providers
///
/// An implementation performs exactly one request per call and classifies
/// the outcome. Waiting and retrying on rate limits is the poller's job.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the current price for `query`
    ///
    /// # Returns
    /// Price data, or the classified failure of this single attempt
    async fn fetch(&self, query: &PriceQuery) -> Result<PriceData, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
