//! Builder pattern for Engine

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::Result;
use crate::hook::ExpressionHook;
use batchmap_core::types::{CatalogField, DataType, FieldCatalog, Value};
use batchmap_parser::GroupingMode;
use std::sync::Arc;

/// Builder for Engine
///
/// # Example
///
/// ```rust,ignore
/// use batchmap_sdk::{EngineBuilder, DataType};
///
/// let engine = EngineBuilder::new()
///     .add_field("amount", DataType::Numeric)
///     .add_field("status", DataType::String)
///     .with_default_value("")
///     .build()?;
///
/// let report = engine.validate(&condition);
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    catalog: FieldCatalog,
    hook: Option<Arc<dyn ExpressionHook>>,
}

impl EngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            catalog: FieldCatalog::new(),
            hook: None,
        }
    }

    // ========== Configuration ==========

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn with_grouping(mut self, grouping: GroupingMode) -> Self {
        self.config.grouping = grouping;
        self
    }

    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.config.default_value = value.into();
        self
    }

    /// Enable or disable the parse cache
    pub fn cache_expressions(mut self, enabled: bool) -> Self {
        self.config.cache_expressions = enabled;
        self
    }

    // ========== Field catalog ==========

    /// Replace the field catalog
    pub fn with_catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Add one known source field
    pub fn add_field(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.catalog.push(CatalogField::new(name, data_type));
        self
    }

    // ========== Hooks ==========

    /// Set the external validation hook used by `validate_with_hook`
    pub fn with_hook(mut self, hook: Arc<dyn ExpressionHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;
        Ok(Engine::from_parts(self.config, self.catalog, self.hook))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
