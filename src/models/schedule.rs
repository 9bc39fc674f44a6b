//! Schedule (solution) model.
//!
//! A scheduling run produces an ordered list of placement decisions and
//! the resulting makespan. Both are immutable once the run finishes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::dispatching::Strategy;

/// One placement: a task started on a machine at a given time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDecision {
    /// Placed task ID.
    pub task_id: String,
    /// Start time (time units).
    pub start: u64,
    /// Assigned machine ID.
    pub machine_id: String,
    /// End time (`start + duration`).
    pub end: u64,
}

/// Outcome of one scheduler run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingResult {
    /// Heuristic that produced the task order, if known.
    pub strategy: Option<Strategy>,
    /// Latest end time across all decisions (0 when empty).
    pub makespan: u64,
    /// Decisions in the order they were recorded.
    pub decisions: Vec<ScheduleDecision>,
    /// Number of simulated clock ticks.
    pub rounds: u64,
}

/// A property a finished schedule fails to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (task, machine, or resource).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A task of the instance has no decision.
    MissingTask,
    /// A task has more than one decision.
    DuplicateTask,
    /// A decision names a task the instance does not contain.
    UnknownTask,
    /// A task was placed on a machine outside its allowed list.
    MachineNotAllowed,
    /// Two decisions occupy the same machine at the same time.
    MachineOverlap,
    /// Two decisions hold the same global resource at the same time.
    ResourceOverlap,
    /// Reported makespan differs from the decisions' latest end.
    MakespanMismatch,
    /// A decision's end does not match its task's duration.
    DurationMismatch,
}

impl ScheduleDecision {
    /// Creates a decision for a task of the given duration.
    pub fn new(
        task_id: impl Into<String>,
        start: u64,
        machine_id: impl Into<String>,
        duration: u64,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            start,
            machine_id: machine_id.into(),
            end: start + duration,
        }
    }

    /// Occupied duration (end - start).
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the half-open intervals `[start, end)` of two decisions intersect.
    #[inline]
    pub fn overlaps(&self, other: &ScheduleDecision) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Decision line: `'task',start,'machine'.`
impl fmt::Display for ScheduleDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}',{},'{}'.", self.task_id, self.start, self.machine_id)
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl SchedulingResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags the result with the strategy that produced it.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Records a decision and extends the makespan if needed.
    pub fn add_decision(&mut self, decision: ScheduleDecision) {
        self.makespan = self.makespan.max(decision.end);
        self.decisions.push(decision);
    }

    /// Number of decisions.
    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }

    /// Whether no task was placed.
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Finds the decision for a given task.
    pub fn decision_for_task(&self, task_id: &str) -> Option<&ScheduleDecision> {
        self.decisions.iter().find(|d| d.task_id == task_id)
    }

    /// Returns all decisions placed on a given machine, in recorded order.
    pub fn decisions_for_machine(&self, machine_id: &str) -> Vec<&ScheduleDecision> {
        self.decisions
            .iter()
            .filter(|d| d.machine_id == machine_id)
            .collect()
    }

    /// Busy time per machine that received at least one task.
    pub fn machine_busy_time(&self) -> HashMap<&str, u64> {
        let mut busy: HashMap<&str, u64> = HashMap::new();
        for d in &self.decisions {
            *busy.entry(d.machine_id.as_str()).or_insert(0) += d.duration();
        }
        busy
    }

    /// Recomputes the makespan from the decisions alone.
    pub fn recomputed_makespan(&self) -> u64 {
        self.decisions.iter().map(|d| d.end).max().unwrap_or(0)
    }

    /// Output lines in recorded order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.decisions.iter().map(|d| d.to_string())
    }
}
