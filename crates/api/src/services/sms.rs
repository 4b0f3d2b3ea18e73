//! SMS providers.
//!
//! - `console`: logs the message instead of sending it (development)
//! - `http`: posts JSON to a gateway at `sms.api_url`

use async_trait::async_trait;
use domain::services::{SmsError, SmsSender};
use reqwest::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::config::SmsConfig;

/// Logs outgoing messages. Never use outside development: codes end up in logs.
#[derive(Debug, Default, Clone)]
pub struct ConsoleSmsSender;

#[async_trait]
impl SmsSender for ConsoleSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        info!(to = %to, body = %body, "SMS (console provider)");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    to: &'a str,
    from: &'a str,
    body: &'a str,
}

/// Generic JSON SMS gateway client.
#[derive(Debug, Clone)]
pub struct HttpSmsSender {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender_id: String,
}

impl HttpSmsSender {
    pub fn new(config: &SmsConfig) -> Result<Self, SmsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SmsError::Provider(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender_id: config.sender_id.clone(),
        })
    }
}

/// Gateways answer 400/422 for numbers they refuse to deliver to.
fn classify_failure(status: StatusCode, body: String) -> SmsError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            SmsError::InvalidDestination(body)
        }
        _ => SmsError::Provider(format!("HTTP {}: {}", status.as_u16(), body)),
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&GatewayRequest {
                to,
                from: &self.sender_id,
                body,
            })
            .send()
            .await
            .map_err(|e| SmsError::Provider(format!("SMS request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!(to = %to, "SMS sent");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        error!(to = %to, status = status.as_u16(), "SMS gateway rejected message");
        Err(classify_failure(status, text))
    }
}

/// Builds the configured provider. Unknown providers fall back to console.
pub fn build_sms_sender(config: &SmsConfig) -> Result<Arc<dyn SmsSender>, SmsError> {
    match config.provider.as_str() {
        "http" => Ok(Arc::new(HttpSmsSender::new(config)?)),
        "console" => Ok(Arc::new(ConsoleSmsSender)),
        other => {
            error!(provider = %other, "Unknown SMS provider, using console");
            Ok(Arc::new(ConsoleSmsSender))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_sender_accepts_everything() {
        assert!(ConsoleSmsSender.send("9998887777", "hello").await.is_ok());
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, "bad number".into()),
            SmsError::InvalidDestination(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::SERVICE_UNAVAILABLE, String::new()),
            SmsError::Provider(_)
        ));
    }

    #[test]
    fn test_gateway_request_shape() {
        let json = serde_json::to_value(GatewayRequest {
            to: "9998887777",
            from: "EVTDSK",
            body: "code",
        })
        .unwrap();
        assert_eq!(json["to"], "9998887777");
        assert_eq!(json["from"], "EVTDSK");
    }
}
