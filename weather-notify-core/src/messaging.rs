use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config,
    config::Sender,
    error::DeliveryError,
    model::{DeliveryReceipt, OutgoingMessage},
};

const TWILIO_URL: &str = "https://api.twilio.com";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait MessageSender: Send + Sync + Debug {
    async fn send(&self, message: &OutgoingMessage) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Twilio credentials plus the sender identity messages go out under.
#[derive(Debug, Clone)]
pub struct TwilioSender {
    account_sid: String,
    auth_token: String,
    sender: Sender,
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    message: Option<String>,
}

impl TwilioSender {
    pub fn new(
        account_sid: String,
        auth_token: String,
        sender: Sender,
    ) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(DeliveryError::Network)?;

        Ok(Self {
            account_sid,
            auth_token,
            sender,
            base_url: TWILIO_URL.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a sender from config, refusing when credentials or a sender
    /// identity are missing.
    pub fn from_config(config: &Config) -> Result<Self, DeliveryError> {
        match (
            config.account_sid(),
            config.auth_token(),
            config.recipient(),
            config.sender(),
        ) {
            (Some(sid), Some(token), Some(_), Some(sender)) => {
                Self::new(sid.to_owned(), token.to_owned(), sender)
            }
            _ => Err(DeliveryError::MissingCredentials),
        }
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    fn form(&self, message: &OutgoingMessage, to: &str) -> Vec<(&'static str, String)> {
        let mut form = vec![("To", to.to_owned()), ("Body", message.body.clone())];
        match &self.sender {
            Sender::MessagingService(sid) => form.push(("MessagingServiceSid", sid.clone())),
            Sender::Number(number) => form.push(("From", whatsapp_address(number))),
        }
        form
    }
}

#[async_trait]
impl MessageSender for TwilioSender {
    async fn send(&self, message: &OutgoingMessage) -> Result<DeliveryReceipt, DeliveryError> {
        if message.to.trim().is_empty() {
            return Err(DeliveryError::MissingCredentials);
        }

        let to = whatsapp_address(&message.to);
        info!("Sending message to WhatsApp: {}", message.to);

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );

        let res = self
            .http
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&self.form(message, &to))
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.without_url()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| DeliveryError::Network(e.without_url()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<TwilioError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let sid = serde_json::from_str::<TwilioMessage>(&body)
            .ok()
            .and_then(|m| m.sid);
        info!(
            "Message sent successfully! SID: {}",
            sid.as_deref().unwrap_or("unknown")
        );

        Ok(DeliveryReceipt { sid })
    }
}

fn whatsapp_address(number: &str) -> String {
    format!("whatsapp:{}", number.trim())
}
