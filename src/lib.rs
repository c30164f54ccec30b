//! # Bitcoin Price Poller
//!
//! Polls the CoinGecko simple price API once a minute and prints the current
//! Bitcoin price in USD to the console.
//!
//! ## Usage
//!
//! ```no_run
//! use bitcoin_price_poller::{CoinGeckoProvider, Poller, PollerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PollerConfig::default();
//! let mut poller = Poller::new(Arc::new(CoinGeckoProvider::new()?), &config);
//!
//! match poller.fetch_price().await {
//!     Some(price) => println!("BTC: ${}", price.price),
//!     None => println!("no price this cycle"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Rate limiting
//!
//! A 429 response is retried after the delay given in its `Retry-After`
//! header (60 seconds when absent or unparseable), with no limit on the
//! number of retries. Every other failure yields `None` for that cycle.
//!
//! ## Architecture
//!
//! ```text
//! PriceTracker::run (every 60s, until shutdown)
//!     ↓
//! Poller::fetch_price (waits out 429s)
//!     ↓
//! PriceProvider (CoinGecko, one request per call)
//! ```

pub mod config;
pub mod console;
pub mod constants;
pub mod error;
pub mod poller;
pub mod provider;
pub mod providers;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use config::PollerConfig;
pub use console::Console;
pub use error::ProviderError;
pub use poller::Poller;
pub use provider::PriceProvider;
pub use providers::CoinGeckoProvider;
pub use tracker::PriceTracker;
pub use types::{PriceData, PriceQuery, PriceResult, TrackerState};
