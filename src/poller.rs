//! Single price lookup with rate-limit handling

use crate::{
    config::PollerConfig,
    console::Console,
    error::ProviderError,
    provider::PriceProvider,
    types::{PriceQuery, PriceResult},
};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Fetches one price per call, waiting out rate limits
///
/// A 429 is retried after the server-suggested delay with no cap on the
/// number of attempts. Every other failure ends the call with `None`.
pub struct Poller<W: Write = io::Stdout> {
    provider: Arc<dyn PriceProvider>,
    query: PriceQuery,
    default_retry_after: Duration,
    console: Console<W>,
}

impl Poller<io::Stdout> {
    /// Creates a poller for the default pair that prints to stdout
    pub fn new(provider: Arc<dyn PriceProvider>, config: &PollerConfig) -> Self {
        Self::with_console(provider, config, Console::stdout())
    }
}

impl<W: Write> Poller<W> {
    /// Creates a poller that prints to `console`
    pub fn with_console(
        provider: Arc<dyn PriceProvider>,
        config: &PollerConfig,
        console: Console<W>,
    ) -> Self {
        Self {
            provider,
            query: PriceQuery::default(),
            default_retry_after: config.default_retry_after,
            console,
        }
    }

    /// Fetches the current price
    ///
    /// Never fails: network, HTTP and parse errors are reported on the
    /// console and collapse to `None`.
    pub async fn fetch_price(&mut self) -> PriceResult {
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;
            tracing::debug!(
                attempt,
                provider = self.provider.provider_name(),
                coin = %self.query.coin_id,
                "Requesting price"
            );

            match self.provider.fetch(&self.query).await {
                Ok(price) => return Some(price),
                Err(ProviderError::RateLimited { retry_after }) => {
                    let wait = retry_after.unwrap_or(self.default_retry_after);
                    tracing::warn!(
                        attempt,
                        wait_secs = wait.as_secs(),
                        server_suggested = retry_after.is_some(),
                        "Rate limited, waiting before retry"
                    );
                    self.console.rate_limited(wait);
                    sleep(wait).await;
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Failed to fetch price");
                    self.console.fetch_error(&e);
                    return None;
                }
            }
        }
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console<W> {
        &mut self.console
    }
}
