use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;

const GEOIP_URL: &str = "https://ipapi.co/json/";
const GEOIP_TIMEOUT: Duration = Duration::from_secs(5);

/// City used whenever IP geolocation gives no usable answer.
pub const DEFAULT_CITY: &str = "London";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: Option<String>,
}

/// Picks the city to report on: configured name first, then IP geolocation.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    base_url: String,
    timeout: Duration,
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationResolver {
    pub fn new() -> Self {
        Self::with_base_url(GEOIP_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: GEOIP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Never fails: every lookup problem degrades to [`DEFAULT_CITY`].
    ///
    /// A configured name that is not blank is returned exactly as given.
    pub async fn resolve(&self, configured: Option<&str>) -> String {
        if let Some(city) = configured.filter(|c| !c.trim().is_empty()) {
            return city.to_owned();
        }

        info!("Detecting location by IP...");
        match self.detect().await {
            Ok(city) => {
                info!("Location detected: {city}");
                city
            }
            Err(err) => {
                warn!("Location detection error: {err:#}; using {DEFAULT_CITY}");
                DEFAULT_CITY.to_owned()
            }
        }
    }

    async fn detect(&self) -> Result<String> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("failed to build geolocation client")?;

        let payload: IpApiResponse = client
            .get(&self.base_url)
            .send()
            .await
            .context("geolocation request failed")?
            .json()
            .await
            .context("failed to decode geolocation response")?;

        payload
            .city
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| anyhow!("geolocation response has no city"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configured_city_is_returned_unchanged() {
        // Unroutable URL: any network call would fall back to London.
        let resolver = LocationResolver::with_base_url("http://127.0.0.1:9/");

        assert_eq!(resolver.resolve(Some("Paris")).await, "Paris");
        assert_eq!(resolver.resolve(Some(" Paris ")).await, " Paris ");
    }

    #[tokio::test]
    async fn unreachable_service_falls_back_to_default() {
        let resolver = LocationResolver::with_base_url("http://127.0.0.1:9/")
            .with_timeout(Duration::from_millis(500));

        assert_eq!(resolver.resolve(None).await, DEFAULT_CITY);
        assert_eq!(resolver.resolve(Some("  ")).await, DEFAULT_CITY);
    }
}
