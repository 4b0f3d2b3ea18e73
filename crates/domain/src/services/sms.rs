//! SMS delivery abstractions.

use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SmsError {
    #[error("Destination rejected: {0}")]
    InvalidDestination(String),

    #[error("SMS provider error: {0}")]
    Provider(String),
}

/// SMS delivery collaborator.
#[async_trait::async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError>;
}

/// A message captured by [`MockSmsSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub to: String,
    pub body: String,
}

/// Records messages instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct MockSmsSender {
    pub simulate_failure: bool,
    sent: Arc<Mutex<Vec<SentSms>>>,
}

impl MockSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: Arc::default(),
        }
    }

    /// Messages recorded so far, oldest first.
    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Body of the latest message sent to `to`.
    pub fn last_to(&self, to: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|sms| sms.to == to)
            .map(|sms| sms.body)
    }
}

#[async_trait::async_trait]
impl SmsSender for MockSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        if self.simulate_failure {
            tracing::warn!(to = %to, "Mock SMS sender simulating failure");
            return Err(SmsError::Provider("Simulated failure".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentSms {
                to: to.to_string(),
                body: body.to_string(),
            });
        }
        Ok(())
    }
}
