//! Core library for the `weather-notify` job.
//!
//! This crate defines:
//! - Configuration loading (config file + environment)
//! - City resolution with IP geolocation fallback
//! - The OpenWeather client for current conditions and alerts
//! - Message formatting and Twilio WhatsApp delivery
//!
//! It is used by `weather-notify-cli`, but the [`Notifier`] pipeline can be
//! driven from any binary.

pub mod config;
pub mod error;
pub mod icon;
pub mod location;
pub mod message;
pub mod messaging;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use config::{Config, Sender};
pub use error::{ConfigError, DeliveryError, RunError, WeatherError};
pub use icon::WeatherIcon;
pub use location::{DEFAULT_CITY, LocationResolver};
pub use messaging::{MessageSender, TwilioSender};
pub use model::{AlertRecord, Coordinates, DeliveryReceipt, OutgoingMessage, WeatherReading};
pub use pipeline::{Notifier, RunOptions, RunReport};
pub use provider::{WeatherProvider, openweather::OpenWeatherClient};
