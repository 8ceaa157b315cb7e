//! Submitted and validated field sets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::field::{Derivation, FieldValue};
use crate::parse::format_flag;

/// Raw form input keyed by input name. Missing inputs read as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmittedValues(HashMap<String, String>);

impl SubmittedValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, input: impl Into<String>, value: impl Into<String>) {
        self.0.insert(input.into(), value.into());
    }

    /// Raw value of `input`, or the empty string when it was not submitted.
    #[must_use]
    pub fn get(&self, input: &str) -> &str {
        self.0.get(input).map_or("", String::as_str)
    }
}

impl From<HashMap<String, String>> for SubmittedValues {
    fn from(values: HashMap<String, String>) -> Self {
        Self(values)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubmittedValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One field of a [`ValidatedBatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedField {
    key: String,
    raw: String,
    value: FieldValue,
    derivation: Option<Derivation>,
}

impl ValidatedField {
    pub(crate) fn new(
        key: String,
        raw: String,
        value: FieldValue,
        derivation: Option<Derivation>,
    ) -> Self {
        Self {
            key,
            raw,
            value,
            derivation,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Text exactly as submitted.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Text written to the config store, derivation applied.
    #[must_use]
    pub fn stored_value(&self) -> String {
        match (&self.value, self.derivation) {
            (FieldValue::Bool(flag), Some(Derivation::Negate)) => format_flag(!flag).to_string(),
            (FieldValue::Bool(flag), None) => format_flag(*flag).to_string(),
            _ => self.raw.clone(),
        }
    }
}

/// A submission that passed validation for every field of its schema.
///
/// Only [`Schema::validate`](crate::schema::Schema::validate) creates batches,
/// so holding one proves the whole submission is well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBatch {
    schema: String,
    namespace: String,
    fields: Vec<ValidatedField>,
}

impl ValidatedBatch {
    pub(crate) fn new(schema: String, namespace: String, fields: Vec<ValidatedField>) -> Self {
        Self {
            schema,
            namespace,
            fields,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn fields(&self) -> &[ValidatedField] {
        &self.fields
    }

    /// Typed value of the field stored under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .map(ValidatedField::value)
    }

    /// `(key, stored value)` pairs in schema order.
    #[must_use]
    pub fn store_entries(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|field| (field.key.clone(), field.stored_value()))
            .collect()
    }
}
