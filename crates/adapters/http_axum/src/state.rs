//! Shared application state for axum handlers.

use std::sync::Arc;

use leafcfg_app::ports::{ConfigStore, EventPublisher};
use leafcfg_app::services::parameter_form::ParameterFormProcessor;

/// Application state shared across all axum handlers.
///
/// Generic over the config store and event publisher to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone` — only the `Arc` is cloned.
pub struct AppState<S, P> {
    /// Validate/commit/read use-case.
    pub processor: Arc<ParameterFormProcessor<S, P>>,
}

impl<S, P> Clone for AppState<S, P> {
    fn clone(&self) -> Self {
        Self {
            processor: Arc::clone(&self.processor),
        }
    }
}

impl<S, P> AppState<S, P>
where
    S: ConfigStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    pub fn new(processor: ParameterFormProcessor<S, P>) -> Self {
        Self::from_arc(Arc::new(processor))
    }

    /// Use a processor already shared with other tasks.
    pub fn from_arc(processor: Arc<ParameterFormProcessor<S, P>>) -> Self {
        Self { processor }
    }
}
