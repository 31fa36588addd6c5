//! Condition Tree Module
//!
//! The nested IF / ELSE-IF / ELSE structure attached to a conditional field
//! mapping. The payload is persisted by the surrounding application as JSON:
//!
//! ```json
//! {
//!   "ifExpr": "{age} >= 18",
//!   "then": "adult",
//!   "elseIfExprs": [
//!     { "ifExpr": "{age} >= 13", "then": "teen" }
//!   ],
//!   "elseExpr": "child"
//! }
//! ```
//!
//! `then` and `elseExpr` hold either an expression string or a nested
//! condition (composite transformation). Every `elseIfExprs` entry is itself a
//! condition one level deeper than its parent.

mod path;
mod types;

pub use path::NodePath;
pub use types::{Condition, ValueSource, DEFAULT_MAX_DEPTH};
