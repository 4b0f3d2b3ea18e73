//! Push notification abstractions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A push message sent to a single device token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
}

impl PushMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: HashMap::new(),
        }
    }
}

/// Result of a push attempt for one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Accepted by the provider.
    Delivered,
    /// The provider no longer recognises the token; it should be pruned.
    NotRegistered,
    /// Delivery failed for another reason.
    Failed(String),
}

/// Push delivery collaborator.
#[async_trait::async_trait]
pub trait PushNotifier: Send + Sync {
    async fn send(&self, token: &str, message: &PushMessage) -> PushOutcome;
}

/// Counts reported after a broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastSummary {
    pub sent: usize,
    pub failed: usize,
    pub pruned: usize,
}

impl BroadcastSummary {
    pub fn record(&mut self, outcome: &PushOutcome) {
        match outcome {
            PushOutcome::Delivered => self.sent += 1,
            PushOutcome::NotRegistered => {
                self.failed += 1;
                self.pruned += 1;
            }
            PushOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Mock push notifier for development and testing.
///
/// Logs messages but doesn't send them. Tokens listed in `unregistered`
/// report [`PushOutcome::NotRegistered`].
#[derive(Debug, Clone, Default)]
pub struct MockPushNotifier {
    pub simulate_failure: bool,
    pub unregistered: Vec<String>,
}

impl MockPushNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            unregistered: Vec::new(),
        }
    }

    pub fn with_unregistered(tokens: Vec<String>) -> Self {
        Self {
            simulate_failure: false,
            unregistered: tokens,
        }
    }
}

#[async_trait::async_trait]
impl PushNotifier for MockPushNotifier {
    async fn send(&self, token: &str, message: &PushMessage) -> PushOutcome {
        if self.unregistered.iter().any(|t| t == token) {
            return PushOutcome::NotRegistered;
        }
        if self.simulate_failure {
            tracing::warn!(title = %message.title, "Mock push notifier simulating failure");
            return PushOutcome::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            title = %message.title,
            body_len = message.body.len(),
            "Mock: Would send push notification"
        );
        PushOutcome::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = BroadcastSummary::default();
        summary.record(&PushOutcome::Delivered);
        summary.record(&PushOutcome::NotRegistered);
        summary.record(&PushOutcome::Failed("timeout".to_string()));
        assert_eq!(
            summary,
            BroadcastSummary {
                sent: 1,
                failed: 2,
                pruned: 1
            }
        );
    }

    #[test]
    fn test_message_serialization_skips_empty_data() {
        let json = serde_json::to_string(&PushMessage::new("Hi", "There")).unwrap();
        assert!(!json.contains("data"));
    }

    #[tokio::test]
    async fn test_mock_outcomes() {
        let message = PushMessage::new("Reminder", "Event starts soon");

        let notifier = MockPushNotifier::with_unregistered(vec!["stale".to_string()]);
        assert_eq!(notifier.send("fresh", &message).await, PushOutcome::Delivered);
        assert_eq!(notifier.send("stale", &message).await, PushOutcome::NotRegistered);

        let failing = MockPushNotifier::failing();
        assert!(matches!(
            failing.send("fresh", &message).await,
            PushOutcome::Failed(_)
        ));
    }
}
