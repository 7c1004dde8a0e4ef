//! One notification run: resolve city, fetch weather and alerts, format, send.

use chrono::Local;
use log::{error, info};

use crate::{
    Config,
    config::{OPENWEATHER_API_KEY, TO_WHATSAPP_NUMBER},
    error::{ConfigError, DeliveryError, RunError},
    location::LocationResolver,
    message::compose,
    messaging::{MessageSender, TwilioSender},
    model::{DeliveryReceipt, OutgoingMessage},
    provider::{WeatherProvider, provider_from_config},
};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the configured city.
    pub city: Option<String>,
    /// Compose the message but do not deliver it.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub city: String,
    pub message: String,
    /// `None` for dry runs.
    pub receipt: Option<DeliveryReceipt>,
}

#[derive(Debug)]
pub struct Notifier {
    resolver: LocationResolver,
    weather: Box<dyn WeatherProvider>,
    sender: Option<Box<dyn MessageSender>>,
}

impl Notifier {
    pub fn new(
        resolver: LocationResolver,
        weather: Box<dyn WeatherProvider>,
        sender: Option<Box<dyn MessageSender>>,
    ) -> Self {
        Self {
            resolver,
            weather,
            sender,
        }
    }

    /// Production wiring: ipapi.co, OpenWeather and Twilio.
    ///
    /// The sender is left out when Twilio settings are incomplete; `run` reports
    /// that as a configuration error unless it is a dry run. HTTP client setup
    /// failures are returned as they are.
    pub fn from_config(config: &Config) -> Result<Self, RunError> {
        let weather = provider_from_config(config)?;

        let sender = match TwilioSender::from_config(config) {
            Ok(sender) => Some(Box::new(sender) as Box<dyn MessageSender>),
            Err(DeliveryError::MissingCredentials) => None,
            Err(source) => {
                error!("{source}");
                return Err(RunError::Delivery {
                    message: String::new(),
                    source,
                });
            }
        };

        Ok(Self::new(LocationResolver::new(), weather, sender))
    }

    pub async fn run(&self, config: &Config, options: &RunOptions) -> Result<RunReport, RunError> {
        if options.dry_run {
            if config.api_key().is_none() {
                let missing = vec![OPENWEATHER_API_KEY.to_string()];
                return Err(ConfigError { missing }.into());
            }
        } else {
            config.validate()?;
        }

        if let Some(key) = config.redacted_api_key() {
            info!("API key loaded: {key}");
        }

        let configured = options.city.as_deref().or(config.city());
        let city = self.resolver.resolve(configured).await;

        let reading = self.weather.current(&city).await?;
        let alerts = self.weather.alert_block(reading.coord).await;
        let message = compose(&city, &reading, &alerts, Local::now().date_naive());

        if options.dry_run {
            return Ok(RunReport {
                city,
                message,
                receipt: None,
            });
        }

        let to = config.recipient().ok_or_else(|| ConfigError {
            missing: vec![TO_WHATSAPP_NUMBER.to_string()],
        })?;
        let outgoing = OutgoingMessage {
            body: message,
            to: to.to_owned(),
        };

        let delivered = match &self.sender {
            Some(sender) => sender.send(&outgoing).await,
            None => Err(DeliveryError::MissingCredentials),
        };

        match delivered {
            Ok(receipt) => Ok(RunReport {
                city,
                message: outgoing.body,
                receipt: Some(receipt),
            }),
            Err(source) => {
                error!("{source}");
                Err(RunError::Delivery {
                    message: outgoing.body,
                    source,
                })
            }
        }
    }
}
