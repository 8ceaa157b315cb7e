//! Field — one typed input of a configuration form.
//!
//! A [`FieldSpec`] knows how to turn the raw submitted text into a typed
//! [`FieldValue`] or a [`ValidationError`] carrying the user-facing message.

use std::fmt;

use crate::error::{SchemaError, ValidationError};
use crate::parse::{format_flag, lenient_float, lenient_int};

/// The value type accepted by a field, with its inclusive bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Integer { min: Option<i64>, max: Option<i64> },
    Float { min: Option<f64>, max: Option<f64> },
    Boolean,
    Choice { options: Vec<String> },
}

impl FieldKind {
    /// Unbounded integer.
    #[must_use]
    pub fn integer() -> Self {
        Self::Integer {
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub fn integer_at_least(min: i64) -> Self {
        Self::Integer {
            min: Some(min),
            max: None,
        }
    }

    /// Unbounded float.
    #[must_use]
    pub fn float() -> Self {
        Self::Float {
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub fn float_at_least(min: f64) -> Self {
        Self::Float {
            min: Some(min),
            max: None,
        }
    }

    #[must_use]
    pub fn float_between(min: f64, max: f64) -> Self {
        Self::Float {
            min: Some(min),
            max: Some(max),
        }
    }

    #[must_use]
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice {
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Transformation applied to a validated value when it is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// Store the logical negation of a boolean input.
    Negate,
}

/// A successfully validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Optional field left blank.
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Enum(String),
    Str(String),
}

/// Definition of a single form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    key: String,
    input: String,
    label: String,
    kind: FieldKind,
    default: String,
    required: bool,
    derivation: Option<Derivation>,
    empty_message: Option<String>,
    range_message: Option<String>,
}

impl FieldSpec {
    /// Create a builder for a field stored under `key`.
    #[must_use]
    pub fn builder(key: impl Into<String>) -> FieldSpecBuilder {
        FieldSpecBuilder::new(key.into())
    }

    /// Storage key inside the schema namespace.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name of the submitted form variable.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Stored-form default returned when the store has no value.
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn derivation(&self) -> Option<Derivation> {
        self.derivation
    }

    /// Validate one raw submitted value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming this field when a required value
    /// is empty, a number falls outside its bounds, or a choice is not one of
    /// the declared options. Boolean fields never fail.
    pub fn check(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        match &self.kind {
            FieldKind::Boolean => Ok(FieldValue::Bool(raw == "yes")),
            _ if raw.is_empty() => {
                if self.required {
                    Err(self.error(self.empty_message()))
                } else {
                    Ok(FieldValue::Empty)
                }
            }
            FieldKind::Text => Ok(FieldValue::Str(raw.to_string())),
            FieldKind::Integer { min, max } => {
                let n = i64::from(lenient_int(raw));
                if min.is_some_and(|lo| n < lo) || max.is_some_and(|hi| n > hi) {
                    return Err(self.error(self.range_error(*min, *max)));
                }
                Ok(FieldValue::Int(n))
            }
            FieldKind::Float { min, max } => {
                // bounds apply to the single-precision value the firmware keeps
                let n = narrow(lenient_float(raw));
                let bounded = min.is_some() || max.is_some();
                if (bounded && n.is_nan())
                    || min.is_some_and(|lo| n < narrow(lo))
                    || max.is_some_and(|hi| n > narrow(hi))
                {
                    return Err(self.error(self.range_error(*min, *max)));
                }
                Ok(FieldValue::Float(f64::from(n)))
            }
            FieldKind::Choice { options } => {
                if options.iter().any(|option| option == raw) {
                    Ok(FieldValue::Enum(raw.to_string()))
                } else {
                    Err(self.error(format!("{} invalid selection", self.label)))
                }
            }
        }
    }

    fn error(&self, message: String) -> ValidationError {
        ValidationError::new(self.key.clone(), message)
    }

    fn empty_message(&self) -> String {
        self.empty_message
            .clone()
            .unwrap_or_else(|| format!("{} cannot be empty", self.label))
    }

    fn range_error<T: fmt::Display>(&self, min: Option<T>, max: Option<T>) -> String {
        if let Some(message) = &self.range_message {
            return message.clone();
        }
        let label = &self.label;
        match (min, max) {
            (Some(lo), Some(hi)) => format!("{label} invalid, must be {lo}…{hi}"),
            (Some(lo), None) => format!("{label} invalid, must be ≥ {lo}"),
            (None, Some(hi)) => format!("{label} invalid, must be ≤ {hi}"),
            (None, None) => format!("{label} invalid"),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(value: f64) -> f32 {
    value as f32
}

/// Step-by-step builder for [`FieldSpec`].
#[derive(Debug)]
pub struct FieldSpecBuilder {
    key: String,
    input: Option<String>,
    label: Option<String>,
    kind: FieldKind,
    default: String,
    required: bool,
    derivation: Option<Derivation>,
    empty_message: Option<String>,
    range_message: Option<String>,
}

impl FieldSpecBuilder {
    fn new(key: String) -> Self {
        Self {
            key,
            input: None,
            label: None,
            kind: FieldKind::Text,
            default: String::new(),
            required: false,
            derivation: None,
            empty_message: None,
            range_message: None,
        }
    }

    /// Form variable name, when it differs from the storage key.
    #[must_use]
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// Default for a boolean field, in stored flag form.
    #[must_use]
    pub fn default_flag(mut self, default: bool) -> Self {
        self.default = format_flag(default).to_string();
        self
    }

    /// Reject empty submissions.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn derived(mut self, derivation: Derivation) -> Self {
        self.derivation = Some(derivation);
        self
    }

    /// Replace the generated "cannot be empty" message.
    #[must_use]
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = Some(message.into());
        self
    }

    /// Replace the generated out-of-range message.
    #[must_use]
    pub fn range_message(mut self, message: impl Into<String>) -> Self {
        self.range_message = Some(message.into());
        self
    }

    /// Consume the builder, validate, and return a [`FieldSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the key is empty, a choice field has no
    /// options, or its default is not one of them.
    pub fn build(self) -> Result<FieldSpec, SchemaError> {
        if self.key.is_empty() {
            return Err(SchemaError::EmptyKey);
        }
        if let FieldKind::Choice { options } = &self.kind {
            if options.is_empty() {
                return Err(SchemaError::NoOptions { key: self.key });
            }
            if !self.default.is_empty() && !options.contains(&self.default) {
                return Err(SchemaError::DefaultNotAnOption {
                    key: self.key,
                    default: self.default,
                });
            }
        }

        Ok(FieldSpec {
            input: self.input.unwrap_or_else(|| self.key.clone()),
            label: self.label.unwrap_or_else(|| self.key.clone()),
            key: self.key,
            kind: self.kind,
            default: self.default,
            required: self.required,
            derivation: self.derivation,
            empty_message: self.empty_message,
            range_message: self.range_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soc_field() -> FieldSpec {
        FieldSpec::builder("suffsoc")
            .label("Sufficient SOC")
            .kind(FieldKind::float_between(0.0, 100.0))
            .default_value("0")
            .build()
            .unwrap()
    }

    #[test]
    fn should_default_input_and_label_to_key() {
        let field = FieldSpec::builder("canwrite")
            .kind(FieldKind::Boolean)
            .build()
            .unwrap();
        assert_eq!(field.input(), "canwrite");
        assert_eq!(field.label(), "canwrite");
    }

    #[test]
    fn should_accept_inclusive_bounds() {
        let field = soc_field();
        assert_eq!(field.check("100"), Ok(FieldValue::Float(100.0)));
        assert_eq!(field.check("0"), Ok(FieldValue::Float(0.0)));
    }

    #[test]
    fn should_reject_value_above_upper_bound() {
        let err = soc_field().check("100.1").unwrap_err();
        assert_eq!(err.field, "suffsoc");
        assert_eq!(err.message, "Sufficient SOC invalid, must be 0…100");
    }

    #[test]
    fn should_accept_empty_optional_value() {
        assert_eq!(soc_field().check(""), Ok(FieldValue::Empty));
    }

    #[test]
    fn should_treat_non_numeric_input_as_zero() {
        assert_eq!(soc_field().check("abc"), Ok(FieldValue::Float(0.0)));
    }

    #[test]
    fn should_compare_bounds_in_single_precision() {
        // 100.000001 rounds to 100.0 as an f32
        assert_eq!(soc_field().check("100.000001"), Ok(FieldValue::Float(100.0)));
        assert!(soc_field().check("100.00001").is_err());
    }

    #[test]
    fn should_reject_non_finite_values_on_bounded_fields() {
        let field = soc_field();
        for raw in ["inf", "-inf", "INFINITY", "nan", "0x1p7", "1e39"] {
            let err = field.check(raw).unwrap_err();
            assert_eq!(err.message, "Sufficient SOC invalid, must be 0…100", "{raw}");
        }
    }

    #[test]
    fn should_keep_non_finite_values_on_unbounded_fields() {
        let field = FieldSpec::builder("cabintempoffset")
            .kind(FieldKind::float())
            .build()
            .unwrap();
        assert_eq!(field.check("-inf"), Ok(FieldValue::Float(f64::NEG_INFINITY)));
        assert!(matches!(field.check("nan"), Ok(FieldValue::Float(n)) if n.is_nan()));
    }

    #[test]
    fn should_reject_model_year_that_wraps_negative() {
        let field = FieldSpec::builder("modelyear")
            .kind(FieldKind::integer_at_least(2011))
            .build()
            .unwrap();
        assert!(field.check("3000000000").is_err());
        assert_eq!(field.check("4294969307"), Ok(FieldValue::Int(2011)));
    }

    #[test]
    fn should_report_lower_bound_only() {
        let field = FieldSpec::builder("minrange")
            .label("Minimum range")
            .kind(FieldKind::float_at_least(0.0))
            .build()
            .unwrap();
        let err = field.check("-1").unwrap_err();
        assert_eq!(err.message, "Minimum range invalid, must be ≥ 0");
    }

    #[test]
    fn should_use_range_message_override() {
        let field = FieldSpec::builder("modelyear")
            .kind(FieldKind::integer_at_least(2011))
            .range_message("Model year must be ≥ 2011")
            .build()
            .unwrap();
        let err = field.check("2005").unwrap_err();
        assert_eq!(err.message, "Model year must be ≥ 2011");
        assert_eq!(field.check("2011"), Ok(FieldValue::Int(2011)));
    }

    #[test]
    fn should_reject_empty_required_value() {
        let field = FieldSpec::builder("note")
            .label("Note")
            .required()
            .build()
            .unwrap();
        let err = field.check("").unwrap_err();
        assert_eq!(err.message, "Note cannot be empty");
        assert_eq!(field.check("hi"), Ok(FieldValue::Str("hi".to_string())));
    }

    #[test]
    fn should_map_only_yes_to_true() {
        let field = FieldSpec::builder("canwrite")
            .kind(FieldKind::Boolean)
            .required()
            .build()
            .unwrap();
        assert_eq!(field.check("yes"), Ok(FieldValue::Bool(true)));
        assert_eq!(field.check("no"), Ok(FieldValue::Bool(false)));
        assert_eq!(field.check("YES"), Ok(FieldValue::Bool(false)));
        assert_eq!(field.check(""), Ok(FieldValue::Bool(false)));
    }

    #[test]
    fn should_reject_unknown_choice() {
        let field = FieldSpec::builder("suffrangecalc")
            .label("Range calculation")
            .kind(FieldKind::choice(["ideal", "est"]))
            .build()
            .unwrap();
        assert_eq!(
            field.check("est"),
            Ok(FieldValue::Enum("est".to_string()))
        );
        let err = field.check("fancy").unwrap_err();
        assert_eq!(err.message, "Range calculation invalid selection");
    }

    #[test]
    fn should_refuse_choice_without_options() {
        let result = FieldSpec::builder("port")
            .kind(FieldKind::choice(Vec::<String>::new()))
            .build();
        assert!(matches!(result, Err(SchemaError::NoOptions { .. })));
    }

    #[test]
    fn should_refuse_default_outside_options() {
        let result = FieldSpec::builder("port")
            .kind(FieldKind::choice(["1", "3"]))
            .default_value("2")
            .build();
        assert!(matches!(result, Err(SchemaError::DefaultNotAnOption { .. })));
    }

    #[test]
    fn should_refuse_empty_key() {
        assert_eq!(FieldSpec::builder("").build(), Err(SchemaError::EmptyKey));
    }

    #[test]
    fn should_store_flag_default() {
        let field = FieldSpec::builder("autocharge")
            .kind(FieldKind::Boolean)
            .default_flag(true)
            .build()
            .unwrap();
        assert_eq!(field.default_value(), "yes");
    }
}
