//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`FormError`]
//! via `#[from]` or an explicit `From` impl.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level error returned by form processing operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// One or more submitted fields failed validation. Nothing was stored.
    #[error("submission rejected: {0}")]
    Rejected(#[from] ValidationErrors),

    /// No schema is registered under the requested name.
    #[error("unknown schema: {name}")]
    UnknownSchema { name: String },

    /// The schema has no field with the requested key.
    #[error("unknown field {key:?} in schema {schema:?}")]
    UnknownField { schema: String, key: String },

    /// A schema definition broke its own invariants.
    #[error("invalid schema definition")]
    Schema(#[from] SchemaError),

    /// The config store failed; the commit was aborted.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A single field-level validation failure.
///
/// `field` is the storage key of the offending field, `message` the
/// user-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every validation failure of one submission, in schema field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Whether any error was reported for the field with storage key `field`.
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|err| err.field == field)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            1 => f.write_str("1 invalid field"),
            n => write!(f, "{n} invalid fields"),
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors raised while building a field or schema definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field key must not be empty")]
    EmptyKey,

    #[error("duplicate field key {key:?} in schema {schema:?}")]
    DuplicateKey { schema: String, key: String },

    #[error("duplicate input name {input:?} in schema {schema:?}")]
    DuplicateInput { schema: String, input: String },

    #[error("choice field {key:?} has no options")]
    NoOptions { key: String },

    #[error("default {default:?} of field {key:?} is not one of its options")]
    DefaultNotAnOption { key: String, default: String },

    #[error("schema {name:?} is already registered")]
    DuplicateSchema { name: String },
}
