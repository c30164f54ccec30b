//! CoinGecko price provider implementation

use crate::{
    constants::{COINGECKO_API_URL, USER_AGENT},
    error::ProviderError,
    provider::PriceProvider,
    types::{PriceData, PriceQuery},
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// CoinGecko API response for simple price queries
///
/// `{"bitcoin": {"usd": 65000.5}}`. Entries other than the queried coin are
/// kept untyped so unrelated siblings never fail the parse.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct SimplePriceResponse {
    prices: HashMap<String, serde_json::Value>,
}

/// CoinGecko price provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a provider against a different base URL
    ///
    /// No request timeout is set; the client default applies.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::Network)?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates a provider from an already configured client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Extracts `body[coin_id][vs_currency]` as a number
    fn parse_price(body: &str, query: &PriceQuery) -> Result<f64, ProviderError> {
        let response: SimplePriceResponse = serde_json::from_str(body).map_err(|e| {
            ProviderError::malformed(format!(
                "Failed to parse CoinGecko response: {}. Response: {}",
                e, body
            ))
        })?;

        let quotes = response.prices.get(&query.coin_id).ok_or_else(|| {
            ProviderError::malformed(format!("missing coin '{}'", query.coin_id))
        })?;

        quotes
            .get(&query.vs_currency)
            .ok_or_else(|| {
                ProviderError::malformed(format!(
                    "missing currency '{}' for '{}'",
                    query.vs_currency, query.coin_id
                ))
            })?
            .as_f64()
            .ok_or_else(|| {
                ProviderError::malformed(format!(
                    "non-numeric price for {}/{}",
                    query.coin_id, query.vs_currency
                ))
            })
    }
}

/// Reads a `Retry-After` header given in whole seconds
///
/// HTTP-date values, negative numbers and garbage yield `None`.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    async fn fetch(&self, query: &PriceQuery) -> Result<PriceData, ProviderError> {
        let url = query.url(&self.base_url);
        tracing::debug!(url = %url, "Fetching price from CoinGecko");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProviderError::Network)?;

        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::rate_limited(parse_retry_after(
                response.headers(),
            )));
        }

        // Check for other errors
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await.map_err(ProviderError::Network)?;
        let price = Self::parse_price(&body, query)?;

        tracing::debug!(
            coin = %query.coin_id,
            vs_currency = %query.vs_currency,
            price,
            "Successfully fetched price from CoinGecko"
        );

        Ok(PriceData::new(query, price, self.provider_name()))
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Formats a complete HTTP/1.1 response with a correct Content-Length
    pub(crate) fn http_response(status_line: &str, headers: &[&str], body: &str) -> String {
        let mut out = format!("HTTP/1.1 {}\r\n", status_line);
        for header in headers {
            out.push_str(header);
            out.push_str("\r\n");
        }
        out.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ));
        out
    }

    /// Serves each response to one connection, in order, then stops
    ///
    /// The join handle yields the request line of every request received.
    pub(crate) async fn serve(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut request_lines = Vec::new();
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                }
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;

                let text = String::from_utf8_lossy(&request);
                request_lines.push(text.lines().next().unwrap_or_default().to_string());
            }
            request_lines
        });

        (format!("http://{}", addr), handle)
    }

    /// Provider whose client ignores proxy settings from the environment
    pub(crate) fn local_provider(base_url: &str) -> CoinGeckoProvider {
        let client = Client::builder().no_proxy().build().unwrap();
        CoinGeckoProvider::with_client(client, base_url)
    }

    async fn fetch_one(response: String) -> (Result<PriceData, ProviderError>, Vec<String>) {
        let (base_url, server) = serve(vec![response]).await;
        let result = local_provider(&base_url).fetch(&PriceQuery::default()).await;
        (result, server.await.unwrap())
    }

    #[tokio::test]
    async fn test_success_body_yields_price() {
        let (result, requests) =
            fetch_one(http_response("200 OK", &[], r#"{"bitcoin":{"usd":65000.5}}"#)).await;

        let price = result.unwrap();
        assert_eq!(price.price, 65000.5);
        assert_eq!(price.source, "coingecko");
        assert_eq!(
            requests,
            vec!["GET /simple/price?ids=bitcoin&vs_currencies=usd HTTP/1.1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_integer_price_is_accepted() {
        let (result, _) = fetch_one(http_response("200 OK", &[], r#"{"bitcoin":{"usd":65000}}"#)).await;
        assert_eq!(result.unwrap().price, 65000.0);
    }

    #[tokio::test]
    async fn test_missing_coin_is_malformed() {
        let (result, _) = fetch_one(http_response("200 OK", &[], r#"{"ethereum":{"usd":3000}}"#)).await;
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_currency_is_malformed() {
        let (result, _) = fetch_one(http_response("200 OK", &[], r#"{"bitcoin":{"eur":60000}}"#)).await;
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let (result, _) = fetch_one(http_response("200 OK", &[], "<html>oops</html>")).await;
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_429_with_retry_after() {
        let (result, _) = fetch_one(http_response(
            "429 Too Many Requests",
            &["Retry-After: 5"],
            "",
        ))
        .await;

        match result {
            Err(ProviderError::RateLimited { retry_after }) => {
                assert_eq!(retry_after, Some(Duration::from_secs(5)))
            }
            other => panic!("expected rate limit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_429_without_retry_after() {
        let (result, _) = fetch_one(http_response("429 Too Many Requests", &[], "")).await;
        assert!(matches!(
            result,
            Err(ProviderError::RateLimited { retry_after: None })
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let (result, _) = fetch_one(http_response(
            "503 Service Unavailable",
            &[],
            "maintenance",
        ))
        .await;

        match result {
            Err(ProviderError::Http { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = local_provider(&format!("http://{}", addr))
            .fetch(&PriceQuery::default())
            .await;
        assert!(matches!(result, Err(ProviderError::Network(_))));
    }

    #[test]
    fn test_parse_retry_after_values() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static(" 120 "));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(120)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("0"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::ZERO));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("-5"));
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_parse_price_ignores_unrelated_siblings() {
        let price = CoinGeckoProvider::parse_price(
            r#"{"bitcoin":{"usd":65000.5,"usd_24h_change":null},"note":"x","status":[1,2]}"#,
            &PriceQuery::default(),
        )
        .unwrap();
        assert_eq!(price, 65000.5);
    }

    #[test]
    fn test_parse_price_coin_not_an_object() {
        let err = CoinGeckoProvider::parse_price(r#"{"bitcoin":65000.5}"#, &PriceQuery::default())
            .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_price_rejects_null() {
        let err = CoinGeckoProvider::parse_price(r#"{"bitcoin":{"usd":null}}"#, &PriceQuery::default())
            .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }
}
