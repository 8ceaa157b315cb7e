//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use leafcfg_domain::error::FormError;
use leafcfg_domain::event::ParamsCommitted;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<ParamsCommitted>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ParamsCommitted> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(
        &self,
        event: ParamsCommitted,
    ) -> impl Future<Output = Result<(), FormError>> + Send {
        // send only fails without receivers
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafcfg_domain::time::now;

    fn event(schema: &str) -> ParamsCommitted {
        ParamsCommitted {
            schema: schema.to_string(),
            namespace: "xnl".to_string(),
            keys: vec!["canwrite".to_string()],
            timestamp: now(),
        }
    }

    #[tokio::test]
    async fn should_deliver_event_to_every_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(event("features")).await.unwrap();

        assert_eq!(rx1.recv().await.unwrap().schema, "features");
        assert_eq!(rx2.recv().await.unwrap().schema, "features");
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        assert!(bus.publish(event("battery")).await.is_ok());
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let bus = InProcessEventBus::new(16);
        bus.publish(event("features")).await.unwrap();

        let mut rx = bus.subscribe();
        bus.publish(event("battery")).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().schema, "battery");
    }
}
