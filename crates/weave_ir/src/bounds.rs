//! Resolved bit ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved `[left:right]` bit range in textual form.
///
/// Values are either plain numbers or, when an expression could not be
/// reduced, the expression with parameter references replaced by names. The
/// empty pair means "whole signal, no explicit range".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// The left bound.
    pub left: String,
    /// The right bound.
    pub right: String,
}

impl Bounds {
    /// Creates bounds from resolved text.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// The empty pair.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            Ok(())
        } else {
            write!(f, "[{}:{}]", self.left, self.right)
        }
    }
}
