//! Parameter form service — validate a submission, then commit it whole.
//!
//! A submission moves `Received → Validating → Rejected | Committed`.
//! Rejected submissions never reach the store; committed ones are written
//! as a single batch while the namespace commit lock is held.

use std::collections::BTreeMap;

use leafcfg_domain::batch::{SubmittedValues, ValidatedBatch};
use leafcfg_domain::error::FormError;
use leafcfg_domain::event::ParamsCommitted;
use leafcfg_domain::schema::{Schema, SchemaRegistry};

use crate::commit_lock::NamespaceLocks;
use crate::ports::{ConfigStore, EventPublisher};

/// Application service running the validate-then-commit protocol for every
/// registered schema.
pub struct ParameterFormProcessor<S, P> {
    registry: SchemaRegistry,
    store: S,
    publisher: P,
    commit_locks: NamespaceLocks,
}

impl<S, P> ParameterFormProcessor<S, P>
where
    S: ConfigStore + Sync,
    P: EventPublisher + Sync,
{
    /// Create a processor for `registry`, backed by `store`, announcing
    /// commits through `publisher`.
    pub fn new(registry: SchemaRegistry, store: S, publisher: P) -> Self {
        Self {
            registry,
            store,
            publisher,
            commit_locks: NamespaceLocks::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Look up a registered schema.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownSchema`] for unregistered names.
    pub fn schema(&self, name: &str) -> Result<&Schema, FormError> {
        self.registry.get(name)
    }

    /// Validate `submitted` against the named schema without touching the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Rejected`] carrying every field error, or
    /// [`FormError::UnknownSchema`].
    #[tracing::instrument(skip(self, submitted))]
    pub fn validate(
        &self,
        schema: &str,
        submitted: &SubmittedValues,
    ) -> Result<ValidatedBatch, FormError> {
        let schema = self.registry.get(schema)?;
        schema.validate(submitted).map_err(|errors| {
            tracing::debug!(count = errors.len(), "submission rejected");
            FormError::Rejected(errors)
        })
    }

    /// Write every field of `batch` to the store as one batch.
    ///
    /// Derived values are computed here, from the validated inputs. Commits
    /// to the same namespace are serialized.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Storage`] if the store fails (nothing is
    /// written), or [`FormError::UnknownSchema`] for a batch produced by a
    /// schema this processor does not know.
    #[tracing::instrument(skip(self, batch), fields(schema = batch.schema(), namespace = batch.namespace()))]
    pub async fn commit(&self, batch: ValidatedBatch) -> Result<ParamsCommitted, FormError> {
        self.registry.get(batch.schema())?;

        let lock = self.commit_locks.for_namespace(batch.namespace());
        {
            let _guard = lock.lock().await;
            self.store
                .set_params(batch.namespace(), batch.store_entries())
                .await
                .inspect_err(|err| tracing::error!(%err, "commit aborted"))?;
        }

        let event = ParamsCommitted::from_batch(&batch);
        tracing::info!(fields = event.keys.len(), "parameters committed");
        if let Err(err) = self.publisher.publish(event.clone()).await {
            tracing::warn!(%err, "failed to publish commit event");
        }
        Ok(event)
    }

    /// Validate and, when every field passes, commit.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate) and [`commit`](Self::commit).
    pub async fn submit(
        &self,
        schema: &str,
        submitted: &SubmittedValues,
    ) -> Result<ParamsCommitted, FormError> {
        let batch = self.validate(schema, submitted)?;
        self.commit(batch).await
    }

    /// Current value of every field of the named schema, falling back to
    /// the field default when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownSchema`] or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn read(&self, schema: &str) -> Result<BTreeMap<String, String>, FormError> {
        let schema = self.registry.get(schema)?;
        let keys: Vec<&str> = schema.keys().collect();
        let mut stored = self.store.get_params(schema.namespace(), &keys).await?;

        Ok(schema
            .fields()
            .iter()
            .map(|field| {
                let value = stored
                    .remove(field.key())
                    .unwrap_or_else(|| field.default_value().to_string());
                (field.key().to_string(), value)
            })
            .collect())
    }
}
