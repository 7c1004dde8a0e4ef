use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::WeatherError,
    message::format_alerts,
    model::{AlertRecord, Coordinates, WeatherReading},
};

use super::WeatherProvider;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, OPENWEATHER_URL)
    }

    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WeatherError::Network)?;

        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Fetch and validate the "current weather" document for `city`.
    pub async fn fetch_current(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        info!("Fetching weather for {city}...");

        // The request URL carries the API key; strip it from transport errors.
        let res = self
            .http
            .get(format!("{}/weather", self.base_url))
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.without_url()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.without_url()))?;

        if !status.is_success() {
            debug!(
                "OpenWeather current request failed with status {status}: {}",
                truncate_body(&body)
            );
            return Err(WeatherError::Unavailable {
                city: city.to_owned(),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Processing(e.to_string()))?;

        parsed.into_reading(city)
    }

    /// Fetch active alerts for the coordinates.
    ///
    /// A 401 means the account's plan has no alert access and yields an empty list.
    pub async fn fetch_alerts(&self, coord: Coordinates) -> Result<Vec<AlertRecord>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let (lat, lon) = (coord.lat.to_string(), coord.lon.to_string());
        let res = self
            .http
            .get(format!("{}/onecall", self.base_url))
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("exclude", "minutely,hourly,daily"),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to OpenWeather (alerts)")?;

        if res.status() == StatusCode::UNAUTHORIZED {
            warn!("Weather alerts not available with your current plan");
            return Ok(Vec::new());
        }

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("OpenWeather alerts request failed with status {status}"));
        }

        let parsed: OwOneCallResponse = res
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse OpenWeather alerts JSON")?;

        Ok(parsed
            .alerts
            .unwrap_or_default()
            .into_iter()
            .map(|a| AlertRecord {
                event: a.event.unwrap_or_else(|| "Weather Alert".to_string()),
                description: a.description.unwrap_or_default(),
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

/// Top-level blocks are optional so a missing one is reported as a format
/// error rather than a decode error.
#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    weather: Option<Vec<OwWeather>>,
    main: Option<OwMain>,
    wind: Option<OwWind>,
    coord: Option<OwCoord>,
}

impl OwCurrentResponse {
    fn into_reading(self, city: &str) -> Result<WeatherReading, WeatherError> {
        let invalid = || WeatherError::InvalidFormat {
            city: city.to_owned(),
        };

        let (Some(weather), Some(main), Some(wind), Some(coord)) =
            (self.weather, self.main, self.wind, self.coord)
        else {
            return Err(invalid());
        };
        let condition = weather.into_iter().next().ok_or_else(invalid)?;

        Ok(WeatherReading {
            code: condition.id,
            description: capitalize(&condition.description),
            temperature_c: round1(main.temp),
            feels_like_c: round1(main.feels_like),
            humidity_pct: main.humidity,
            wind_speed_mps: wind.speed,
            coord: Coordinates {
                lat: coord.lat,
                lon: coord.lon,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwAlert {
    event: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    alerts: Option<Vec<OwAlert>>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        self.fetch_current(city).await
    }

    async fn alert_block(&self, coord: Coordinates) -> String {
        match self.fetch_alerts(coord).await {
            Ok(alerts) => format_alerts(&alerts),
            Err(err) => {
                warn!("Weather alerts unavailable: {err:#}");
                String::new()
            }
        }
    }
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
