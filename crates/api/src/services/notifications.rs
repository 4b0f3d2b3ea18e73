//! Push broadcast to every stored device token.

use domain::services::{BroadcastSummary, PushMessage, PushNotifier, PushOutcome};
use persistence::repositories::UserRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::middleware::metrics::record_push_broadcast;

pub struct NotificationService {
    users: UserRepository,
    push: Arc<dyn PushNotifier>,
}

impl NotificationService {
    pub fn new(pool: PgPool, push: Arc<dyn PushNotifier>) -> Self {
        Self {
            users: UserRepository::new(pool),
            push,
        }
    }

    /// Sends `message` to every token, then prunes tokens the provider no
    /// longer recognises from their owners' lists.
    pub async fn broadcast(&self, message: &PushMessage) -> Result<BroadcastSummary, sqlx::Error> {
        let tokens = self.users.all_push_tokens().await?;
        let mut summary = BroadcastSummary::default();
        let mut stale = Vec::new();

        for token in tokens {
            let outcome = self.push.send(&token, message).await;
            summary.record(&outcome);
            if outcome == PushOutcome::NotRegistered {
                stale.push(token);
            }
        }

        if !stale.is_empty() {
            let owners = self.users.prune_push_tokens(&stale).await?;
            info!(tokens = stale.len(), owners, "Pruned unregistered push tokens");
        }

        record_push_broadcast(summary.sent, summary.failed, summary.pruned);
        info!(
            sent = summary.sent,
            failed = summary.failed,
            pruned = summary.pruned,
            "Push broadcast finished"
        );
        Ok(summary)
    }
}
