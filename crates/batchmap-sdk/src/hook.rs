//! External expression validation hook
//!
//! Lets an embedding service run its own check (a remote rules service,
//! a policy lookup) on every expression that passed local validation.

use crate::error::Result;
use async_trait::async_trait;
use batchmap_core::NodePath;

/// Answer of an external check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookVerdict {
    Accept,
    /// Rejected, with a message shown to the user
    Reject(String),
}

impl HookVerdict {
    pub fn reject(message: impl Into<String>) -> Self {
        HookVerdict::Reject(message.into())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, HookVerdict::Accept)
    }
}

/// Asynchronous per-expression check
///
/// A `Reject` becomes a validation error at `path`. An `Err` means the hook
/// itself could not run and aborts validation.
#[async_trait]
pub trait ExpressionHook: Send + Sync {
    async fn check(&self, path: &NodePath, source: &str) -> Result<HookVerdict>;
}
