//! Polling loop
//!
//! Drives the poller forever at a fixed period until the shutdown future
//! completes.

use crate::{config::PollerConfig, poller::Poller, types::TrackerState};
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;
use tokio::time::sleep;

/// Prints the Bitcoin price once per poll interval
///
/// # Example
/// ```no_run
/// use bitcoin_price_poller::{CoinGeckoProvider, Poller, PollerConfig, PriceTracker};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PollerConfig::default();
/// let provider = Arc::new(CoinGeckoProvider::new()?);
/// let mut tracker = PriceTracker::new(Poller::new(provider, &config), &config);
/// tracker.run(async { let _ = tokio::signal::ctrl_c().await; }).await;
/// # Ok(())
/// # }
/// ```
pub struct PriceTracker<W: Write = io::Stdout> {
    poller: Poller<W>,
    poll_interval: Duration,
    state: TrackerState,
}

impl<W: Write> PriceTracker<W> {
    pub fn new(poller: Poller<W>, config: &PollerConfig) -> Self {
        Self {
            poller,
            poll_interval: config.poll_interval,
            state: TrackerState::Running,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn poller(&self) -> &Poller<W> {
        &self.poller
    }

    /// Polls until `shutdown` completes, then prints the closing line
    ///
    /// The shutdown future is raced against the whole iteration, so it takes
    /// effect during a request, a rate-limit wait or the interval sleep alike.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Starting price tracker"
        );
        self.poller.console_mut().banner();

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = Self::poll_once(&mut self.poller, self.poll_interval) => {}
            }
        }

        self.state = TrackerState::Stopped;
        tracing::info!("Price tracker stopped");
        self.poller.console_mut().shutdown();
    }

    /// One iteration: fetch, print, then sleep regardless of outcome
    async fn poll_once(poller: &mut Poller<W>, poll_interval: Duration) {
        match poller.fetch_price().await {
            Some(price) => poller.console_mut().price(&price),
            None => poller.console_mut().price_unavailable(),
        }

        sleep(poll_interval).await;
    }
}
