use thiserror::Error;

/// Required settings are absent; nothing was sent over the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required environment variables: {}", .missing.join(", "))]
pub struct ConfigError {
    pub missing: Vec<String>,
}

/// Failure to obtain current weather. Fatal to the run.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("OpenWeatherMap API key is required")]
    MissingApiKey,

    #[error("Could not retrieve weather data for {city}")]
    Unavailable { city: String },

    #[error("Invalid weather data format for {city}")]
    InvalidFormat { city: String },

    #[error("Error fetching weather data: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Error processing weather data: {0}")]
    Processing(String),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Twilio credentials, recipient or sender identity missing")]
    MissingCredentials,

    #[error("Twilio rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Error sending WhatsApp message: {0}")]
    Network(#[source] reqwest::Error),
}

/// Outcome of a failed run, one variant per fatal stage.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    /// Delivery failed after the message was composed.
    #[error("{source}")]
    Delivery {
        message: String,
        #[source]
        source: DeliveryError,
    },
}
