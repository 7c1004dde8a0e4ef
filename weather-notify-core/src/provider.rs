use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, WeatherReading},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`.
    async fn current(&self, city: &str) -> Result<WeatherReading, WeatherError>;

    /// Formatted alert lines for the location, or an empty string.
    ///
    /// Alerts are best effort: implementations must not fail here.
    async fn alert_block(&self, coord: Coordinates) -> String;
}

/// Construct the OpenWeather provider from config.
///
/// A missing API key is not rejected here; the provider reports it on first use.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let client = OpenWeatherClient::new(config.api_key().map(str::to_owned))?;
    Ok(Box::new(client))
}
