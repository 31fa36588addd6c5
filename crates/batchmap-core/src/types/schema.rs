//! Field catalog definitions
//!
//! The catalog is the schema of a source record: the ordered list of field
//! names the expression language may reference, with their declared types.
//! It is only consulted at parse/validation time; records are checked against
//! nothing.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Declared data type of a catalog field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[serde(alias = "String", alias = "STRING")]
    String,
    #[serde(alias = "Numeric", alias = "NUMERIC", alias = "number")]
    Numeric,
    #[serde(alias = "Date", alias = "DATE")]
    Date,
}

impl DataType {
    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Numeric => "numeric",
            DataType::Date => "date",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for DataType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(DataType::String),
            "numeric" | "number" => Ok(DataType::Numeric),
            "date" => Ok(DataType::Date),
            _ => Err(CoreError::UnknownDataType(s.to_string())),
        }
    }
}

/// A field in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogField {
    pub name: String,
    pub data_type: DataType,
}

impl CatalogField {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered catalog of available source fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CatalogField>", into = "Vec<CatalogField>")]
pub struct FieldCatalog {
    fields: Vec<CatalogField>,
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder style)
    pub fn with_field(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.push(CatalogField::new(name, data_type));
        self
    }

    /// Add a field. The first declaration of a name wins.
    pub fn push(&mut self, field: CatalogField) {
        if self.index.contains_key(&field.name) {
            log::warn!("Duplicate catalog field '{}' ignored", field.name);
            return;
        }
        self.index.insert(field.name.clone(), self.fields.len());
        self.fields.push(field);
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&CatalogField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn data_type(&self, name: &str) -> Option<DataType> {
        self.get(name).map(|f| f.data_type)
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<CatalogField>> for FieldCatalog {
    fn from(fields: Vec<CatalogField>) -> Self {
        let mut catalog = FieldCatalog::new();
        for field in fields {
            catalog.push(field);
        }
        catalog
    }
}

impl From<FieldCatalog> for Vec<CatalogField> {
    fn from(catalog: FieldCatalog) -> Self {
        catalog.fields
    }
}

impl FromIterator<CatalogField> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogField>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}
