//! Schema — the ordered field set accepted by one configuration form.

use std::collections::{BTreeMap, HashSet};

use crate::batch::{SubmittedValues, ValidatedBatch, ValidatedField};
use crate::error::{FormError, SchemaError, ValidationErrors};
use crate::field::FieldSpec;

/// Ordered, uniquely-keyed set of fields stored under one namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    namespace: String,
    title: String,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Create a builder for a schema named `name` whose values live in
    /// store namespace `namespace`.
    #[must_use]
    pub fn builder(name: impl Into<String>, namespace: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            namespace: namespace.into(),
            title: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Human-readable form title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Storage keys in field order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::key)
    }

    /// Look up a field by storage key.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] when no field has that key.
    pub fn field(&self, key: &str) -> Result<&FieldSpec, FormError> {
        self.fields
            .iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| FormError::UnknownField {
                schema: self.name.clone(),
                key: key.to_string(),
            })
    }

    /// Stored-form defaults keyed by storage key.
    #[must_use]
    pub fn defaults(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|field| (field.key().to_string(), field.default_value().to_string()))
            .collect()
    }

    /// Validate every field of the schema against `submitted`.
    ///
    /// Inputs missing from `submitted` are checked as empty strings. All
    /// failures are collected; validation never stops at the first one.
    ///
    /// # Errors
    ///
    /// Returns every [`ValidationError`](crate::error::ValidationError) found,
    /// in field order.
    pub fn validate(&self, submitted: &SubmittedValues) -> Result<ValidatedBatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut validated = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            let raw = submitted.get(field.input());
            match field.check(raw) {
                Ok(value) => validated.push(ValidatedField::new(
                    field.key().to_string(),
                    raw.to_string(),
                    value,
                    field.derivation(),
                )),
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            Ok(ValidatedBatch::new(
                self.name.clone(),
                self.namespace.clone(),
                validated,
            ))
        } else {
            Err(errors)
        }
    }
}

/// Step-by-step builder for [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    namespace: String,
    title: Option<String>,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    fn check_unique(&self) -> Result<(), SchemaError> {
        let mut keys = HashSet::new();
        let mut inputs = HashSet::new();
        for field in &self.fields {
            if !keys.insert(field.key()) {
                return Err(SchemaError::DuplicateKey {
                    schema: self.name.clone(),
                    key: field.key().to_string(),
                });
            }
            if !inputs.insert(field.input()) {
                return Err(SchemaError::DuplicateInput {
                    schema: self.name.clone(),
                    input: field.input().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Consume the builder, validate, and return a [`Schema`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateKey`] or [`SchemaError::DuplicateInput`]
    /// when two fields share a storage key or an input name.
    pub fn build(self) -> Result<Schema, SchemaError> {
        self.check_unique()?;

        Ok(Schema {
            title: self.title.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            namespace: self.namespace,
            fields: self.fields,
        })
    }
}

/// All schemas known to a processor, addressed by name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateSchema`] if the name is taken.
    pub fn register(&mut self, schema: Schema) -> Result<(), SchemaError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateSchema {
                name: schema.name().to_string(),
            });
        }
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Look up a schema by name.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownSchema`] for unregistered names.
    pub fn get(&self, name: &str) -> Result<&Schema, FormError> {
        self.schemas
            .get(name)
            .ok_or_else(|| FormError::UnknownSchema {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}
