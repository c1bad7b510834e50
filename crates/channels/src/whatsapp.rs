//! WhatsApp delivery via the WaSender-style HTTP gateway.
//!
//! The send path is a development stub: it validates and logs, then returns
//! a synthetic provider message id. Production wires the configured
//! `api_base_url`/`api_key` to the real gateway client.

use crate::phone::{clean_phone_number, is_dialable};
use anyhow::bail;
use reach_core::config::WhatsAppConfig;
use tracing::info;
use uuid::Uuid;

pub struct WhatsAppProvider {
    config: WhatsAppConfig,
}

impl WhatsAppProvider {
    pub fn new(config: WhatsAppConfig) -> Self {
        info!(
            session = %config.session_name,
            base = %config.api_base_url,
            "WhatsApp provider initialized"
        );
        Self { config }
    }

    /// Send a text message. Fails when the recipient number is unusable or
    /// the gateway reports an error; the caller records the failure.
    pub async fn send_text(&self, to: &str, body: &str) -> anyhow::Result<String> {
        let cleaned = clean_phone_number(to);
        if !is_dialable(&cleaned) {
            bail!("unusable phone number: {to:?}");
        }

        metrics::counter!("channels.whatsapp.sent").increment(1);
        info!(
            to = %cleaned,
            body_len = body.len(),
            session = %self.config.session_name,
            "Sending WhatsApp text message"
        );
        Ok(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> WhatsAppProvider {
        WhatsAppProvider::new(WhatsAppConfig::default())
    }

    #[tokio::test]
    async fn test_send_returns_provider_id() {
        let id = provider()
            .send_text("+919876543210", "Hi Asha!")
            .await
            .unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn test_send_rejects_empty_phone() {
        assert!(provider().send_text("", "Hi!").await.is_err());
    }

    #[tokio::test]
    async fn test_send_rejects_short_phone() {
        assert!(provider().send_text("12345", "Hi!").await.is_err());
    }
}
