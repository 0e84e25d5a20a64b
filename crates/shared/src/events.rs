//! Best-effort publication of user lifecycle events.
//!
//! The event channel/topic naming and delivery guarantee belong to the
//! external collaborator; this module only hands events off. Publication
//! never blocks the request path past the configured timeout, and a
//! failure to hand off is logged and swallowed.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

/// Message emitted after a user account is created.
#[derive(Debug, Clone, Serialize)]
pub struct UserCreated {
    /// ID of the created user.
    pub user_id: Uuid,
    /// Tenant the user belongs to.
    pub tenant_id: Uuid,
    /// Username of the created user.
    pub username: String,
    /// Email of the created user.
    pub email: String,
}

/// Fire-and-forget publisher for user lifecycle events.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::Sender<UserCreated>,
    send_timeout: Duration,
}

impl EventPublisher {
    /// Creates a publisher and the receiving half the event sink drains.
    #[must_use]
    pub fn channel(buffer: usize, send_timeout: Duration) -> (Self, mpsc::Receiver<UserCreated>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx, send_timeout }, rx)
    }

    /// Publishes a user-created event, best-effort.
    ///
    /// A full channel or a closed receiver is logged at `warn` and
    /// swallowed; the surrounding request must not fail because of it.
    pub async fn publish_user_created(&self, event: UserCreated) {
        let user_id = event.user_id;
        if let Err(e) = self.tx.send_timeout(event, self.send_timeout).await {
            warn!(user_id = %user_id, error = %e, "Failed to publish user-created event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> UserCreated {
        UserCreated {
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_publish_delivers_to_receiver() {
        let (publisher, mut rx) = EventPublisher::channel(8, Duration::from_millis(50));
        let event = sample_event();

        publisher.publish_user_created(event.clone()).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.user_id, event.user_id);
        assert_eq!(received.username, "alice");
    }

    #[tokio::test]
    async fn test_publish_with_closed_receiver_is_swallowed() {
        let (publisher, rx) = EventPublisher::channel(8, Duration::from_millis(50));
        drop(rx);

        // Must not panic or error out.
        publisher.publish_user_created(sample_event()).await;
    }

    #[tokio::test]
    async fn test_publish_with_full_channel_times_out() {
        let (publisher, _rx) = EventPublisher::channel(1, Duration::from_millis(10));

        publisher.publish_user_created(sample_event()).await;
        // Channel is now full and nobody is draining; this publish gives
        // up after the timeout instead of blocking the request.
        publisher.publish_user_created(sample_event()).await;
    }
}
