//! Structured failure records and the collector that accumulates them.

use serde::Serialize;
use std::fmt;

/// Who is at fault for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureClass {
    /// Programming defect in the validator itself
    Internal,
    /// The candidate entity is wrong
    Semantic,
}

/// What is wrong with the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureCondition {
    /// A required field or key is absent
    Missing,
    /// A value is present but not acceptable
    InvalidValue,
    /// A referenced id or name does not resolve
    NotFound,
    /// No specific condition recorded
    Unspecified,
}

impl FailureCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCondition::Missing => "missing",
            FailureCondition::InvalidValue => "invalid value",
            FailureCondition::NotFound => "not found",
            FailureCondition::Unspecified => "failed",
        }
    }
}

/// One reportable defect. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailureDetails {
    field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_field_name: Option<String>,
    class: FailureClass,
    condition: FailureCondition,
    reason: String,
}

impl ValidationFailureDetails {
    pub fn builder() -> ValidationFailureDetailsBuilder {
        ValidationFailureDetailsBuilder::new()
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn sub_field_name(&self) -> Option<&str> {
        self.sub_field_name.as_deref()
    }

    pub fn class(&self) -> FailureClass {
        self.class
    }

    pub fn condition(&self) -> FailureCondition {
        self.condition
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_internal_error(&self) -> bool {
        self.class == FailureClass::Internal
    }

    pub fn is_missing(&self) -> bool {
        self.condition == FailureCondition::Missing
    }
}

impl fmt::Display for ValidationFailureDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self.class {
            FailureClass::Internal => "INTERNAL",
            FailureClass::Semantic => "SEMANTIC",
        };
        write!(f, "[{}] ", class)?;
        if !self.field_name.is_empty() {
            write!(f, "{}", self.field_name)?;
            if let Some(sub) = &self.sub_field_name {
                write!(f, ".{}", sub)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{}", self.condition.as_str())?;
        if !self.reason.is_empty() {
            write!(f, " ({})", self.reason)?;
        }
        Ok(())
    }
}

/// Fluent builder for [`ValidationFailureDetails`].
///
/// Defaults to a semantic failure with an unspecified condition.
#[derive(Debug, Clone)]
pub struct ValidationFailureDetailsBuilder {
    field_name: String,
    sub_field_name: Option<String>,
    class: FailureClass,
    condition: FailureCondition,
    reason: String,
}

impl Default for ValidationFailureDetailsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationFailureDetailsBuilder {
    pub fn new() -> Self {
        Self {
            field_name: String::new(),
            sub_field_name: None,
            class: FailureClass::Semantic,
            condition: FailureCondition::Unspecified,
            reason: String::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    pub fn sub_field(mut self, name: impl Into<String>) -> Self {
        self.sub_field_name = Some(name.into());
        self
    }

    pub fn is_an_internal_error(mut self) -> Self {
        self.class = FailureClass::Internal;
        self
    }

    pub fn is_missing(mut self) -> Self {
        self.condition = FailureCondition::Missing;
        self
    }

    pub fn is_invalid_value(mut self) -> Self {
        self.condition = FailureCondition::InvalidValue;
        self
    }

    pub fn is_not_found(mut self) -> Self {
        self.condition = FailureCondition::NotFound;
        self
    }

    pub fn because_of(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn build(self) -> ValidationFailureDetails {
        ValidationFailureDetails {
            field_name: self.field_name,
            sub_field_name: self.sub_field_name,
            class: self.class,
            condition: self.condition,
            reason: self.reason,
        }
    }
}

/// Delimiter terminating each failure in an aggregated message.
pub const FAILURE_DELIMITER: &str = ";";

/// Append-only, ordered list of failures found in one validation pass.
#[derive(Debug, Clone, Default)]
pub struct FailureCollector {
    failures: Vec<ValidationFailureDetails>,
}

impl FailureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: ValidationFailureDetails) {
        self.failures.push(failure);
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationFailureDetails> {
        self.failures.iter()
    }

    pub fn as_slice(&self) -> &[ValidationFailureDetails] {
        &self.failures
    }

    pub fn into_vec(self) -> Vec<ValidationFailureDetails> {
        self.failures
    }

    /// Joins every failure, each terminated by [`FAILURE_DELIMITER`].
    ///
    /// Returns `None` for an empty collector.
    pub fn serialize(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let mut message = String::new();
        for failure in &self.failures {
            message.push_str(&failure.to_string());
            message.push_str(FAILURE_DELIMITER);
        }
        Some(message)
    }
}
