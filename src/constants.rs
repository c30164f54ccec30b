//! Constants for the Bitcoin price poller
//!
//! All configuration is centralized here. There is no config file, no CLI
//! flags and no environment lookup; `PollerConfig::default()` is built from
//! these values.

/// How often to poll the price endpoint (in seconds)
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Delay used when a 429 response carries no usable `Retry-After` header (in seconds)
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API endpoint for simple price queries
pub const COINGECKO_SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// Coin tracked by default
pub const DEFAULT_COIN_ID: &str = "bitcoin";

/// Quote currency used by default
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// User agent for HTTP requests
pub const USER_AGENT: &str = concat!("bitcoin-price-poller/", env!("CARGO_PKG_VERSION"));
