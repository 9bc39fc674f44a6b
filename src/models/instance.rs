//! Problem instance.
//!
//! `InstanceSpec` is the raw, as-parsed problem. `Instance` is the validated
//! and normalized form the scheduler consumes: every task, machine, and
//! resource gets a stable integer handle (its declaration index), and tasks
//! that accept "any machine" are expanded to the full machine list once,
//! here, instead of inside the scheduling loop.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{GlobalResource, Machine, Task};
use crate::error::{Result, ScheduleError};
use crate::validation::validate_input;

/// A problem instance as read from input, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSpec {
    /// Tasks in declaration order.
    pub tasks: Vec<Task>,
    /// Machines in declaration order (defines "any machine" scan order).
    #[serde(default)]
    pub machines: Vec<Machine>,
    /// Global resources in declaration order.
    #[serde(default)]
    pub resources: Vec<GlobalResource>,
}

impl InstanceSpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Adds a machine.
    pub fn with_machine(mut self, id: impl Into<String>) -> Self {
        self.machines.push(Machine::new(id));
        self
    }

    /// Adds a global resource.
    pub fn with_resource(mut self, id: impl Into<String>) -> Self {
        self.resources.push(GlobalResource::new(id));
        self
    }

    /// Validates and normalizes into an [`Instance`].
    pub fn build(self) -> Result<Instance> {
        Instance::new(self.tasks, self.machines, self.resources)
    }
}

/// A validated, normalized problem instance.
///
/// Immutable once built. Scheduler runs keep their own availability state,
/// so one instance can back any number of runs, in parallel if desired.
#[derive(Debug, Clone)]
pub struct Instance {
    tasks: Vec<Task>,
    machines: Vec<Machine>,
    resources: Vec<GlobalResource>,
    task_machines: Vec<Vec<usize>>,
    task_resources: Vec<Vec<usize>>,
    task_index: HashMap<String, usize>,
}

impl Instance {
    /// Validates the input and builds the handle tables.
    ///
    /// # Errors
    /// `MalformedInstance` with every detected problem if validation fails.
    pub fn new(
        mut tasks: Vec<Task>,
        machines: Vec<Machine>,
        resources: Vec<GlobalResource>,
    ) -> Result<Self> {
        validate_input(&tasks, &machines, &resources).map_err(ScheduleError::MalformedInstance)?;

        let machine_index: HashMap<&str, usize> = machines
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.as_str(), i))
            .collect();
        let resource_index: HashMap<&str, usize> = resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.as_str(), i))
            .collect();

        for task in tasks.iter_mut().filter(|t| t.runs_anywhere()) {
            task.allowed_machines = machines.iter().map(|m| m.id.clone()).collect();
        }

        // Validation guarantees every lookup below succeeds.
        let task_machines = tasks
            .iter()
            .map(|t| {
                t.allowed_machines
                    .iter()
                    .filter_map(|id| machine_index.get(id.as_str()).copied())
                    .collect()
            })
            .collect();
        let task_resources = tasks
            .iter()
            .map(|t| {
                t.required_resources
                    .iter()
                    .filter_map(|id| resource_index.get(id.as_str()).copied())
                    .collect()
            })
            .collect();
        let task_index = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();

        Ok(Self {
            tasks,
            machines,
            resources,
            task_machines,
            task_resources,
            task_index,
        })
    }

    /// Builds an instance from bare identifier lists.
    pub fn from_ids<M, R>(tasks: Vec<Task>, machine_ids: M, resource_ids: R) -> Result<Self>
    where
        M: IntoIterator,
        M::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self::new(
            tasks,
            machine_ids.into_iter().map(Machine::new).collect(),
            resource_ids.into_iter().map(GlobalResource::new).collect(),
        )
    }

    /// Tasks in declaration order, with "any machine" already expanded.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Machines in declaration order.
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// Global resources in declaration order.
    pub fn resources(&self) -> &[GlobalResource] {
        &self.resources
    }

    /// Task by handle.
    #[inline]
    pub fn task(&self, handle: usize) -> &Task {
        &self.tasks[handle]
    }

    /// Handle of the task with the given ID.
    pub fn task_handle(&self, task_id: &str) -> Option<usize> {
        self.task_index.get(task_id).copied()
    }

    /// Allowed machine handles of a task, in preference order.
    #[inline]
    pub fn machine_handles(&self, task: usize) -> &[usize] {
        &self.task_machines[task]
    }

    /// Required resource handles of a task.
    #[inline]
    pub fn resource_handles(&self, task: usize) -> &[usize] {
        &self.task_resources[task]
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the instance has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Sum of all task durations.
    pub fn total_duration(&self) -> u64 {
        self.tasks.iter().map(|t| t.duration).sum()
    }
}
