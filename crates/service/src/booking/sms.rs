//! Outbound SMS delivery.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("sms gateway request failed: {0}")]
    Transport(String),
    #[error("sms gateway rejected message: status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, message: &str) -> Result<(), SmsError>;
}

/// Keep the last four digits only.
pub fn mask_phone(phone: &str) -> String {
    let n = phone.chars().count();
    phone.chars().enumerate().map(|(i, c)| if i + 4 < n { '*' } else { c }).collect()
}

/// Development sender: writes the message to the log instead of delivering it.
#[derive(Debug, Default, Clone)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, to: &str, message: &str) -> Result<(), SmsError> {
        info!(to = %mask_phone(to), message = %message, "sms_logged");
        Ok(())
    }
}

#[derive(Serialize)]
struct SmsPayload<'a> {
    to: &'a str,
    message: &'a str,
}

/// Posts `{"to", "message"}` as JSON to the configured gateway.
#[derive(Debug, Clone)]
pub struct HttpSmsSender {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpSmsSender {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), url: url.into(), api_key }
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    #[instrument(skip(self, message), fields(to = %mask_phone(to)))]
    async fn send(&self, to: &str, message: &str) -> Result<(), SmsError> {
        let mut req = self.client.post(&self.url).json(&SmsPayload { to, message });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await.map_err(|e| SmsError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SmsError::Rejected(status.as_u16()));
        }
        info!(status = status.as_u16(), "sms_sent");
        Ok(())
    }
}

/// Pick the HTTP sender when a gateway URL is configured, the log sender otherwise.
pub fn sender_from_config(cfg: &configs::OtpConfig) -> std::sync::Arc<dyn SmsSender> {
    match cfg.sms_gateway_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => std::sync::Arc::new(HttpSmsSender::new(url, cfg.sms_api_key.clone())),
        None => std::sync::Arc::new(LogSmsSender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(mask_phone("9876543210"), "******3210");
        assert_eq!(mask_phone("123"), "123");
    }

    #[tokio::test]
    async fn log_sender_always_succeeds() {
        assert!(LogSmsSender.send("9876543210", "hello").await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_gateway_is_transport_error() {
        let s = HttpSmsSender::new("http://127.0.0.1:9/sms", Some("k".into()));
        assert!(matches!(s.send("9876543210", "x").await, Err(SmsError::Transport(_))));
    }
}
