//! Live precious-metal spot prices with a static fallback.
//!
//! The provider is best-effort: any upstream failure (timeout, bad status,
//! unparseable body, missing API key) falls back to a baked-in reference
//! table, so the endpoint never surfaces an upstream error to clients.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::MetalsConfig;

/// Metals the marketplace quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetalSymbol {
    Gold,
    Silver,
    Platinum,
    Palladium,
}

impl MetalSymbol {
    /// ISO 4217 commodity code used by the provider.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Gold => "XAU",
            Self::Silver => "XAG",
            Self::Platinum => "XPT",
            Self::Palladium => "XPD",
        }
    }

    /// Reference price in USD per troy ounce, used when the provider is
    /// unreachable.
    const fn fallback_price(self) -> f64 {
        match self {
            Self::Gold => 2400.0,
            Self::Silver => 29.5,
            Self::Platinum => 960.0,
            Self::Palladium => 1010.0,
        }
    }
}

/// Unknown metal symbol in a request path.
#[derive(Debug, thiserror::Error)]
#[error("unknown metal symbol: {0}")]
pub struct UnknownSymbol(String);

impl FromStr for MetalSymbol {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "XAU" | "GOLD" => Ok(Self::Gold),
            "XAG" | "SILVER" => Ok(Self::Silver),
            "XPT" | "PLATINUM" => Ok(Self::Platinum),
            "XPD" | "PALLADIUM" => Ok(Self::Palladium),
            _ => Err(UnknownSymbol(s.to_owned())),
        }
    }
}

/// Where a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Live,
    Fallback,
}

/// A spot-price quote in USD per troy ounce.
#[derive(Debug, Clone, Serialize)]
pub struct SpotPrice {
    pub symbol: &'static str,
    pub price: f64,
    pub currency: &'static str,
    pub source: PriceSource,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ProviderQuote {
    price: f64,
}

/// Client for the metals spot-price provider.
#[derive(Clone)]
pub struct MetalsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl MetalsClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &MetalsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Fetch the current quote for a metal. Never fails: upstream problems
    /// degrade to the fallback table.
    pub async fn spot_price(&self, symbol: MetalSymbol) -> SpotPrice {
        match self.fetch_live(symbol).await {
            Ok(price) => SpotPrice {
                symbol: symbol.code(),
                price,
                currency: "USD",
                source: PriceSource::Live,
                fetched_at: Utc::now(),
            },
            Err(e) => {
                tracing::warn!(symbol = symbol.code(), error = %e, "spot price fallback");
                SpotPrice {
                    symbol: symbol.code(),
                    price: symbol.fallback_price(),
                    currency: "USD",
                    source: PriceSource::Fallback,
                    fetched_at: Utc::now(),
                }
            }
        }
    }

    async fn fetch_live(&self, symbol: MetalSymbol) -> Result<f64, MetalsError> {
        let api_key = self.api_key.as_ref().ok_or(MetalsError::NoApiKey)?;
        let url = format!("{}/{}/USD", self.base_url, symbol.code());

        let response = self
            .client
            .get(&url)
            .header("x-access-token", api_key.expose_secret())
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let quote: ProviderQuote = response.json().await?;
        if !quote.price.is_finite() || quote.price <= 0.0 {
            return Err(MetalsError::BadQuote(quote.price));
        }
        Ok(quote.price)
    }
}

/// Errors from the spot-price provider. Internal only: callers of
/// [`MetalsClient::spot_price`] never see these.
#[derive(Debug, thiserror::Error)]
enum MetalsError {
    #[error("no API key configured")]
    NoApiKey,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned unusable price: {0}")]
    BadQuote(f64),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_parsing() {
        assert_eq!(MetalSymbol::from_str("XAU").unwrap(), MetalSymbol::Gold);
        assert_eq!(MetalSymbol::from_str("gold").unwrap(), MetalSymbol::Gold);
        assert_eq!(MetalSymbol::from_str("xag").unwrap(), MetalSymbol::Silver);
        assert!(MetalSymbol::from_str("XCU").is_err());
    }

    #[tokio::test]
    async fn test_spot_price_falls_back_without_api_key() {
        let client = MetalsClient::new(&MetalsConfig {
            base_url: "https://www.goldapi.io/api".to_string(),
            api_key: None,
            timeout_secs: 1,
        });

        let quote = client.spot_price(MetalSymbol::Gold).await;
        assert_eq!(quote.source, PriceSource::Fallback);
        assert_eq!(quote.symbol, "XAU");
        assert!(quote.price > 0.0);
    }
}
