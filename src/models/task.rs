//! Task model.
//!
//! A task is a single non-preemptive unit of work. It runs on exactly one
//! machine for its whole duration and may additionally hold one or more
//! cluster-wide exclusive resources while it runs.

use serde::{Deserialize, Serialize};

/// A task to be scheduled.
///
/// # Time Representation
/// Durations are integer time units on the scheduler's discrete clock.
/// The consumer defines what one unit means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Processing time (time units, must be positive).
    pub duration: u64,
    /// Machines this task may run on, in preference order.
    /// Empty = any machine.
    #[serde(default)]
    pub allowed_machines: Vec<String>,
    /// Global resources held exclusively while the task runs.
    #[serde(default)]
    pub required_resources: Vec<String>,
}

impl Task {
    /// Creates a task that may run on any machine and needs no resources.
    pub fn new(id: impl Into<String>, duration: u64) -> Self {
        Self {
            id: id.into(),
            duration,
            allowed_machines: Vec::new(),
            required_resources: Vec::new(),
        }
    }

    /// Adds an allowed machine.
    pub fn with_machine(mut self, machine_id: impl Into<String>) -> Self {
        self.allowed_machines.push(machine_id.into());
        self
    }

    /// Replaces the allowed machine list.
    pub fn with_machines<I, S>(mut self, machine_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_machines = machine_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a required global resource.
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.required_resources.push(resource_id.into());
        self
    }

    /// Whether this task holds any global resource while running.
    pub fn uses_global_resource(&self) -> bool {
        !self.required_resources.is_empty()
    }

    /// Whether this task accepts any machine.
    pub fn runs_anywhere(&self) -> bool {
        self.allowed_machines.is_empty()
    }
}
