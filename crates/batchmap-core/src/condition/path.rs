//! Node paths inside a condition tree
//!
//! Paths use the payload keys so a UI can map them back onto form fields:
//! `ifExpr`, `then`, `elseIfExprs[2].then`, `then.elseExpr`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    /// The root condition itself (empty path)
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a named key below this node
    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            NodePath(key.to_string())
        } else {
            NodePath(format!("{}.{}", self.0, key))
        }
    }

    /// Path of the `index`-th else-if entry below this node
    pub fn else_if(&self, index: usize) -> Self {
        self.key(&format!("elseIfExprs[{}]", index))
    }

    pub fn if_expr(&self) -> Self {
        self.key("ifExpr")
    }

    pub fn then(&self) -> Self {
        self.key("then")
    }

    pub fn else_expr(&self) -> Self {
        self.key("elseExpr")
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let root = NodePath::root();
        assert!(root.is_root());
        assert_eq!(root.if_expr().as_str(), "ifExpr");
        assert_eq!(root.else_if(2).then().as_str(), "elseIfExprs[2].then");
        assert_eq!(root.then().else_expr().as_str(), "then.elseExpr");
        assert_eq!(root.to_string(), "<root>");
    }
}
