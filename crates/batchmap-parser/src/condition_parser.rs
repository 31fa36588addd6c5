//! Condition payload reader
//!
//! Reads a condition tree from the JSON the configuration UI persists, or from
//! a YAML document carrying the same keys:
//!
//! ```yaml
//! ifExpr: "{age} >= 18"
//! then: adult
//! elseIfExprs:
//!   - ifExpr: "{age} >= 13"
//!     then: teen
//! elseExpr: child
//! ```
//!
//! Only the payload shape is checked here; expressions are left as source
//! text for the validator.

use crate::error::PayloadError;
use batchmap_core::condition::Condition;

/// Condition payload reader
pub struct ConditionParser;

impl ConditionParser {
    /// Parse a condition from JSON
    pub fn from_json(json: &str) -> Result<Condition, PayloadError> {
        let condition: Condition = serde_json::from_str(json)?;
        log::debug!("read condition payload (depth {}) from JSON", condition.depth());
        Ok(condition)
    }

    /// Parse a condition from YAML
    pub fn from_yaml(yaml: &str) -> Result<Condition, PayloadError> {
        let condition: Condition = serde_yaml::from_str(yaml)?;
        log::debug!("read condition payload (depth {}) from YAML", condition.depth());
        Ok(condition)
    }

    /// Serialize a condition back to the JSON payload form
    pub fn to_json(condition: &Condition) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(condition)?)
    }
}
