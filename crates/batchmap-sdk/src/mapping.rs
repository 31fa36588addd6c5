//! Field mappings for fixed-width batch output
//!
//! A `FieldMapping` describes how one output cell is produced from a source
//! record: a constant, a copied source field, a composite of several fields,
//! the outcome of condition trees, or blanks. The rendered cell always has
//! exactly `length` characters.

use crate::engine::Engine;
use crate::error::{Result, SdkError};
use batchmap_core::condition::Condition;
use batchmap_core::types::{DataType, Record, Value};
use batchmap_runtime::EvalState;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

static NULL: Value = Value::Null;

/// How the cell value is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformationType {
    Constant,
    Source,
    Composite,
    Conditional,
    Blank,
}

/// Side the pad characters go on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pad {
    Left,
    #[default]
    Right,
}

/// How composite sources are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeTransform {
    Sum,
    Concat,
}

/// One input of a composite field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeSource {
    pub field: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
}

impl CompositeSource {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            form: None,
        }
    }
}

/// One output field of a fixed-width record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub field_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_field: Option<String>,

    /// Zero-based order of the cell in the output record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<usize>,

    /// Width of the rendered cell in characters
    pub length: usize,

    pub data_type: DataType,

    pub transformation_type: TransformationType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default)]
    pub pad: Pad,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_char: Option<char>,

    /// Constant value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<CompositeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<CompositeTransform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

impl FieldMapping {
    /// Create a mapping with no transformation details
    pub fn new(
        field_name: impl Into<String>,
        length: usize,
        data_type: DataType,
        transformation_type: TransformationType,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            source_field: None,
            target_position: None,
            length,
            data_type,
            transformation_type,
            default_value: None,
            pad: Pad::default(),
            pad_char: None,
            value: None,
            conditions: Vec::new(),
            sources: Vec::new(),
            transform: None,
            delimiter: None,
        }
    }

    pub fn constant(field_name: impl Into<String>, length: usize, value: impl Into<String>) -> Self {
        let mut mapping = Self::new(field_name, length, DataType::String, TransformationType::Constant);
        mapping.value = Some(value.into());
        mapping
    }

    pub fn source(
        field_name: impl Into<String>,
        length: usize,
        data_type: DataType,
        source_field: impl Into<String>,
    ) -> Self {
        let mut mapping = Self::new(field_name, length, data_type, TransformationType::Source);
        mapping.source_field = Some(source_field.into());
        mapping
    }

    pub fn conditional(
        field_name: impl Into<String>,
        length: usize,
        conditions: Vec<Condition>,
    ) -> Self {
        let mut mapping =
            Self::new(field_name, length, DataType::String, TransformationType::Conditional);
        mapping.conditions = conditions;
        mapping
    }

    pub fn composite(
        field_name: impl Into<String>,
        length: usize,
        transform: CompositeTransform,
        sources: Vec<CompositeSource>,
    ) -> Self {
        let data_type = match transform {
            CompositeTransform::Sum => DataType::Numeric,
            CompositeTransform::Concat => DataType::String,
        };
        let mut mapping = Self::new(field_name, length, data_type, TransformationType::Composite);
        mapping.transform = Some(transform);
        mapping.sources = sources;
        mapping
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.target_position = Some(position);
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_pad(mut self, pad: Pad, pad_char: char) -> Self {
        self.pad = pad;
        self.pad_char = Some(pad_char);
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    fn default_text(&self) -> String {
        self.default_value.clone().unwrap_or_default()
    }

    fn error(&self, message: impl Into<String>) -> SdkError {
        SdkError::MappingError {
            field: self.field_name.clone(),
            message: message.into(),
        }
    }

    /// Render the exact-width cell for a record
    pub(crate) fn render(&self, engine: &Engine, record: &Record) -> Result<String> {
        let raw = self.raw_value(engine, record)?;
        Ok(fit(&raw, self.length, self.pad, self.pad_char.unwrap_or(' ')))
    }

    /// Cell text before padding
    fn raw_value(&self, engine: &Engine, record: &Record) -> Result<String> {
        match self.transformation_type {
            TransformationType::Constant => Ok(self.value.clone().unwrap_or_else(|| self.default_text())),
            TransformationType::Source => {
                let field = self
                    .source_field
                    .as_deref()
                    .ok_or_else(|| self.error("source transformation needs a sourceField"))?;
                match record.get(field) {
                    Some(value) if !value.is_empty() => Ok(value.to_display_string()),
                    _ => Ok(self.default_text()),
                }
            }
            TransformationType::Composite => self.composite_value(record),
            TransformationType::Conditional => Ok(self.conditional_value(engine, record)),
            TransformationType::Blank => Ok(String::new()),
        }
    }

    fn composite_value(&self, record: &Record) -> Result<String> {
        if self.sources.is_empty() {
            return Ok(self.default_text());
        }
        let values = self
            .sources
            .iter()
            .map(|source| record.get(&source.field).unwrap_or(&NULL));

        match self.transform.unwrap_or(CompositeTransform::Concat) {
            CompositeTransform::Sum => {
                // decimal arithmetic keeps amounts like 10.10 exact
                let mut total = BigDecimal::default();
                for (source, value) in self.sources.iter().zip(values) {
                    if value.is_empty() {
                        continue;
                    }
                    let text = value.to_display_string();
                    let amount = BigDecimal::from_str(text.trim()).map_err(|_| {
                        self.error(format!(
                            "sum needs numeric sources, '{}' is '{}'",
                            source.field, value
                        ))
                    })?;
                    total += amount;
                }
                Ok(total.to_string())
            }
            CompositeTransform::Concat => {
                let delimiter = self.delimiter.as_deref().unwrap_or("");
                Ok(values
                    .map(Value::to_display_string)
                    .collect::<Vec<_>>()
                    .join(delimiter))
            }
        }
    }

    /// First condition that resolves to a branch wins; an evaluation error
    /// falls back to the default value.
    fn conditional_value(&self, engine: &Engine, record: &Record) -> String {
        for (i, condition) in self.conditions.iter().enumerate() {
            match engine.evaluate_condition_with_default(condition, record, &Value::Null) {
                Ok(outcome) if outcome.state == EvalState::Fallback => continue,
                Ok(outcome) => return outcome.value.to_display_string(),
                Err(e) => {
                    tracing::warn!(
                        "Condition {} of field '{}' failed: {}. Using default value.",
                        i,
                        self.field_name,
                        e
                    );
                    return self.default_text();
                }
            }
        }
        self.default_text()
    }
}

/// Pad or truncate to exactly `length` characters
fn fit(text: &str, length: usize, pad: Pad, pad_char: char) -> String {
    let count = text.chars().count();
    if count >= length {
        return text.chars().take(length).collect();
    }

    let padding: String = std::iter::repeat(pad_char).take(length - count).collect();
    match pad {
        Pad::Left => format!("{}{}", padding, text),
        Pad::Right => format!("{}{}", text, padding),
    }
}
