use bitcoin_price_poller::{CoinGeckoProvider, Poller, PollerConfig, PriceTracker};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let config = PollerConfig::default();
    let provider = Arc::new(CoinGeckoProvider::with_base_url(&config.base_url)?);
    let mut tracker = PriceTracker::new(Poller::new(provider, &config), &config);

    tracker.run(interrupted()).await;

    Ok(())
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// `RUST_LOG` directives when present and valid, `info` otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string().to_lowercase(), "info");
    }

    #[test]
    fn test_log_filter_honours_global_level() {
        assert_eq!(log_filter(Some("debug")).to_string().to_lowercase(), "debug");
    }

    #[test]
    fn test_log_filter_honours_target_directive() {
        assert_eq!(
            log_filter(Some("bitcoin_price_poller=trace")).to_string().to_lowercase(),
            "bitcoin_price_poller=trace"
        );
    }
}
