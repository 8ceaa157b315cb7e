//! Config store port — namespaced parameter persistence.

use std::collections::HashMap;
use std::future::Future;

use leafcfg_domain::error::FormError;
use leafcfg_domain::parse::{format_flag, parse_flag};

/// Durable `(namespace, key) -> value` storage owned by the host.
///
/// Implementations must make [`set_params`](Self::set_params) atomic with
/// respect to [`get_params`](Self::get_params): a reader sees either none or
/// all of a batch.
pub trait ConfigStore {
    /// Read the stored values of `keys`. Keys without a value are absent
    /// from the returned map.
    fn get_params(
        &self,
        namespace: &str,
        keys: &[&str],
    ) -> impl Future<Output = Result<HashMap<String, String>, FormError>> + Send;

    /// Write every entry, or none of them.
    fn set_params(
        &self,
        namespace: &str,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), FormError>> + Send;

    fn get_param(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, FormError>> + Send
    where
        Self: Sync,
    {
        async move {
            let mut values = self.get_params(namespace, &[key]).await?;
            Ok(values.remove(key))
        }
    }

    fn set_param(
        &self,
        namespace: &str,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), FormError>> + Send {
        self.set_params(namespace, vec![(key.to_string(), value)])
    }

    /// Read a flag; a missing or empty value yields `default`.
    fn get_param_bool(
        &self,
        namespace: &str,
        key: &str,
        default: bool,
    ) -> impl Future<Output = Result<bool, FormError>> + Send
    where
        Self: Sync,
    {
        async move {
            let value = self.get_param(namespace, key).await?;
            Ok(value
                .filter(|value| !value.is_empty())
                .map_or(default, |value| parse_flag(&value)))
        }
    }

    fn set_param_bool(
        &self,
        namespace: &str,
        key: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), FormError>> + Send {
        self.set_param(namespace, key, format_flag(value).to_string())
    }
}

impl<T: ConfigStore + Send + Sync> ConfigStore for std::sync::Arc<T> {
    fn get_params(
        &self,
        namespace: &str,
        keys: &[&str],
    ) -> impl Future<Output = Result<HashMap<String, String>, FormError>> + Send {
        (**self).get_params(namespace, keys)
    }

    fn set_params(
        &self,
        namespace: &str,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), FormError>> + Send {
        (**self).set_params(namespace, entries)
    }
}
