//! Event bus port — publish/subscribe for commit events.

use std::future::Future;

use leafcfg_domain::error::FormError;
use leafcfg_domain::event::ParamsCommitted;

/// Publishes commit events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(
        &self,
        event: ParamsCommitted,
    ) -> impl Future<Output = Result<(), FormError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        event: ParamsCommitted,
    ) -> impl Future<Output = Result<(), FormError>> + Send {
        (**self).publish(event)
    }
}
