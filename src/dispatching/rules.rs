//! Built-in ordering rules.
//!
//! All rules return lower scores for tasks that should be scheduled first.
//! Equal scores keep declaration order.

use super::{OrderingRule, RuleScore};
use crate::models::Task;

/// Shortest duration first.
///
/// Tends to start many short tasks early and push long tasks to the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestFirst;

impl OrderingRule for ShortestFirst {
    fn name(&self) -> &'static str {
        "SHORTEST_FIRST"
    }

    fn evaluate(&self, task: &Task) -> RuleScore {
        task.duration as RuleScore
    }

    fn description(&self) -> &'static str {
        "Shortest duration first"
    }
}

/// Longest duration first.
///
/// Classic LPT list scheduling: starting long tasks early usually balances
/// parallel machines better.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestFirst;

impl OrderingRule for LongestFirst {
    fn name(&self) -> &'static str {
        "LONGEST_FIRST"
    }

    fn evaluate(&self, task: &Task) -> RuleScore {
        -(task.duration as RuleScore)
    }

    fn description(&self) -> &'static str {
        "Longest duration first"
    }
}

/// Resource users first.
///
/// Partitions tasks into those holding a global resource and those that do
/// not, the former scheduled first. Contended resources are the usual
/// bottleneck, so getting them busy early shortens the tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementsFirst;

impl OrderingRule for RequirementsFirst {
    fn name(&self) -> &'static str {
        "REQUIREMENTS_FIRST"
    }

    fn evaluate(&self, task: &Task) -> RuleScore {
        if task.uses_global_resource() {
            0
        } else {
            1
        }
    }

    fn description(&self) -> &'static str {
        "Global resource users first"
    }
}
