//! Machine and global resource models.
//!
//! Both are identifier-only. Their single piece of simulation state, the
//! next time they become free, lives inside a scheduler run and never on
//! the model itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A machine that executes one task at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Machine {
    /// Unique machine identifier.
    pub id: String,
}

/// A cluster-wide exclusive resource.
///
/// At most one running task holds a given resource at any time, no matter
/// which machine that task runs on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalResource {
    /// Unique resource identifier.
    pub id: String,
}

impl Machine {
    /// Creates a machine.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl GlobalResource {
    /// Creates a global resource.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl fmt::Display for GlobalResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
