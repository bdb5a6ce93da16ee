//! services/api/src/adapters/twilio.rs
//!
//! This module contains the adapter for the messaging API used to text a
//! receipt to the customer. It implements the `ReceiptNotifier` port.

use async_trait::async_trait;
use inventory_core::ports::{PortError, PortResult, ReceiptNotifier};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::TwilioConfig;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ReceiptNotifier` with Twilio's Messages resource.
#[derive(Clone)]
pub struct TwilioReceiptAdapter {
    client: Client,
    config: TwilioConfig,
}

impl TwilioReceiptAdapter {
    /// Creates a new `TwilioReceiptAdapter`.
    pub fn new(config: TwilioConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.account_sid
        )
    }
}

#[derive(Deserialize)]
struct TwilioError {
    message: Option<String>,
}

/// Matches the sender's channel, so `whatsapp:` senders reach `whatsapp:` recipients.
fn recipient_address(from: &str, to_phone: &str) -> String {
    match from.split_once(':') {
        Some((channel, _)) if !to_phone.contains(':') => format!("{}:{}", channel, to_phone),
        _ => to_phone.to_string(),
    }
}

//=========================================================================================
// `ReceiptNotifier` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReceiptNotifier for TwilioReceiptAdapter {
    async fn send_receipt(&self, to_phone: &str, message: &str) -> PortResult<()> {
        let to = recipient_address(&self.config.from_number, to_phone);
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("From", self.config.from_number.as_str()),
                ("To", to.as_str()),
                ("Body", message),
            ])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = response
            .json::<TwilioError>()
            .await
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| status.to_string());
        Err(PortError::Rejected(detail))
    }
}
