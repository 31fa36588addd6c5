//! Configuration types for Engine

use crate::error::{Result, SdkError};
use batchmap_core::condition::DEFAULT_MAX_DEPTH;
use batchmap_core::Value;
use batchmap_parser::GroupingMode;
use serde::{Deserialize, Serialize};

/// Main engine configuration
///
/// ```yaml
/// max_depth: 5
/// grouping: logical
/// cache_expressions: true
/// default_value: ""
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum condition nesting depth (the root is depth 0)
    pub max_depth: usize,

    /// How binary operators associate
    pub grouping: GroupingMode,

    /// Memoize parsed expressions per source string
    pub cache_expressions: bool,

    /// Value used when no branch holds and a condition has no else
    pub default_value: Value,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            grouping: GroupingMode::Logical,
            cache_expressions: true,
            default_value: Value::Null,
        }
    }

    /// Load configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| SdkError::ConfigError(format!("invalid YAML configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SdkError::ConfigError(format!("invalid JSON configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set maximum condition depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set grouping mode
    pub fn with_grouping(mut self, grouping: GroupingMode) -> Self {
        self.grouping = grouping;
        self
    }

    /// Set the fallback value
    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Enable or disable the parse cache
    pub fn cache_expressions(mut self, enabled: bool) -> Self {
        self.cache_expressions = enabled;
        self
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(SdkError::ConfigError(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.grouping, GroupingMode::Logical);
        assert!(config.cache_expressions);
        assert_eq!(config.default_value, Value::Null);
    }

    #[test]
    fn test_engine_config_builder() {
        let config = EngineConfig::new()
            .with_max_depth(3)
            .with_grouping(GroupingMode::Flat)
            .with_default_value("N/A")
            .cache_expressions(false);

        assert_eq!(config.max_depth, 3);
        assert_eq!(config.grouping, GroupingMode::Flat);
        assert_eq!(config.default_value, Value::string("N/A"));
        assert!(!config.cache_expressions);
    }

    #[test]
    fn test_engine_config_from_yaml() {
        let config = EngineConfig::from_yaml(
            r#"
max_depth: 4
grouping: flat
"#,
        )
        .unwrap();

        assert_eq!(config.max_depth, 4);
        assert_eq!(config.grouping, GroupingMode::Flat);
        // unspecified keys keep their defaults
        assert!(config.cache_expressions);
    }

    #[test]
    fn test_engine_config_from_json() {
        let config =
            EngineConfig::from_json(r#"{"default_value": "UNKNOWN", "cache_expressions": false}"#)
                .unwrap();
        assert_eq!(config.default_value, Value::string("UNKNOWN"));
        assert!(!config.cache_expressions);
    }

    #[test]
    fn test_invalid_config() {
        let err = EngineConfig::from_yaml("max_depth: 0").unwrap_err();
        assert!(matches!(err, SdkError::ConfigError(_)));

        let err = EngineConfig::from_yaml("grouping: sideways").unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }
}
