/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Render context types.
//!
//! A [`TemplateContext`] maps top-level variable names to [`TemplateValue`]s.
//! Values are either scalars, which the interpolator substitutes directly, or
//! sequences of [`Record`]s, which only `for` loops can consume.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};

/// One element of a sequence: property name to scalar value.
pub type Record = HashMap<String, String>;

/// A value bound in the render context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    /// A string or number, already in its rendered string form.
    Scalar(String),

    /// A list of records for `{% for %}` iteration.
    Sequence(Vec<Record>),
}

impl TemplateValue {
    /// The scalar string, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            TemplateValue::Scalar(s) => Some(s),
            TemplateValue::Sequence(_) => None,
        }
    }

    /// The records, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[Record]> {
        match self {
            TemplateValue::Sequence(records) => Some(records),
            TemplateValue::Scalar(_) => None,
        }
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Scalar(value)
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Scalar(value.to_string())
    }
}

impl From<Vec<Record>> for TemplateValue {
    fn from(records: Vec<Record>) -> Self {
        TemplateValue::Sequence(records)
    }
}

macro_rules! scalar_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TemplateValue {
                fn from(value: $ty) -> Self {
                    TemplateValue::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_number!(i32, i64, u32, u64, usize, f64);

/// Variable bindings for a single render call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    variables: HashMap<String, TemplateValue>,
}

impl TemplateContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context, replacing any previous binding.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TemplateValue>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TemplateValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a top-level variable.
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.variables.get(key)
    }

    /// Look up a top-level variable bound to a scalar.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TemplateValue::as_scalar)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateValue)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<TemplateValue>> FromIterator<(K, V)> for TemplateContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = TemplateContext::new();
        for (key, value) in iter {
            ctx.insert(key, value);
        }
        ctx
    }
}

/// Build a context from a JSON object.
///
/// Strings, numbers and booleans become scalars, `null` becomes the empty
/// string, and arrays of objects become sequences of records. Values the
/// render context cannot hold (nested objects, arrays with non-object
/// elements, non-scalar record properties) are skipped, so placeholders
/// naming them stay unresolved. Only a non-object top level is rejected with
/// [`TemplateError::InvalidContext`].
impl TryFrom<Value> for TemplateContext {
    type Error = TemplateError;

    fn try_from(value: Value) -> TemplateResult<Self> {
        let Value::Object(map) = value else {
            return Err(invalid("render context must be a JSON object"));
        };

        let mut ctx = TemplateContext::new();
        for (key, value) in map {
            let value = match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| record_from_json(&key, item))
                    .collect::<Option<Vec<_>>>()
                    .map(TemplateValue::Sequence),
                other => scalar_from_json(other).map(TemplateValue::Scalar),
            };
            match value {
                Some(value) => {
                    ctx.variables.insert(key, value);
                }
                None => debug!(key = %key, "skipping non-scalar, non-record context value"),
            }
        }
        Ok(ctx)
    }
}

fn record_from_json(key: &str, value: Value) -> Option<Record> {
    let Value::Object(map) = value else {
        return None;
    };

    let mut record = Record::with_capacity(map.len());
    for (property, value) in map {
        match scalar_from_json(value) {
            Some(scalar) => {
                record.insert(property, scalar);
            }
            None => debug!(key, property = %property, "skipping non-scalar property"),
        }
    }
    Some(record)
}

fn scalar_from_json(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn invalid(message: impl Into<String>) -> TemplateError {
    TemplateError::InvalidContext {
        message: message.into(),
    }
}
