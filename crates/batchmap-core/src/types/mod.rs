//! Type system for batchmap
//!
//! This module contains:
//! - Value types
//! - The field catalog (schema of a source record)

pub mod schema;
pub mod value;

pub use schema::{CatalogField, DataType, FieldCatalog};
pub use value::{Record, Value};
