//! Heuristic task ordering.
//!
//! A strategy turns the task set into a priority list for the greedy
//! scheduler. Each strategy is an [`OrderingRule`] that scores tasks; the
//! order is a stable sort by score, so equal scores keep declaration order.
//!
//! # Usage
//!
//! ```
//! use greedy_schedule::dispatching::Strategy;
//! use greedy_schedule::models::Task;
//!
//! let tasks = vec![Task::new("t1", 2), Task::new("t2", 1), Task::new("t3", 3)];
//! let order = Strategy::ShortestFirst.order(&tasks);
//! assert_eq!(order, vec!["t2", "t1", "t3"]);
//!
//! let parsed: Strategy = "longest-first".parse().unwrap();
//! assert_eq!(parsed, Strategy::LongestFirst);
//! ```
//!
//! # References
//!
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies" (LPT)
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

pub mod rules;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::error::ScheduleError;
use crate::models::Task;

/// Score returned by an ordering rule.
///
/// Lower scores = earlier in the order. Wide enough to negate any `u64`
/// duration.
pub type RuleScore = i128;

/// A rule that scores tasks for ordering.
///
/// # Score Convention
/// **Lower score = scheduled earlier.**
pub trait OrderingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SHORTEST_FIRST").
    fn name(&self) -> &'static str;

    /// Scores a task.
    fn evaluate(&self, task: &Task) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }

    /// Returns task indices sorted by score, stable on ties.
    fn sort_indices(&self, tasks: &[Task]) -> Vec<usize> {
        let scores: Vec<RuleScore> = tasks.iter().map(|t| self.evaluate(t)).collect();
        let mut indices: Vec<usize> = (0..tasks.len()).collect();
        indices.sort_by_key(|&i| scores[i]);
        indices
    }
}

/// The named ordering heuristics.
///
/// Declaration order is the evaluation order used when comparing
/// heuristics, and therefore the tie-break between equal makespans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// Ascending duration.
    ShortestFirst,
    /// Descending duration.
    LongestFirst,
    /// Global resource users first, then the rest.
    RequirementsFirst,
}

impl Strategy {
    /// Every strategy, in evaluation order.
    pub const ALL: [Strategy; 3] = [
        Strategy::ShortestFirst,
        Strategy::LongestFirst,
        Strategy::RequirementsFirst,
    ];

    /// The scoring rule behind this strategy.
    pub fn rule(self) -> &'static dyn OrderingRule {
        match self {
            Strategy::ShortestFirst => &rules::ShortestFirst,
            Strategy::LongestFirst => &rules::LongestFirst,
            Strategy::RequirementsFirst => &rules::RequirementsFirst,
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        self.rule().name()
    }

    /// Orders tasks, returning handles (indices into `tasks`).
    ///
    /// The result is a permutation of `0..tasks.len()`.
    pub fn order_indices(self, tasks: &[Task]) -> Vec<usize> {
        self.rule().sort_indices(tasks)
    }

    /// Orders tasks, returning their identifiers.
    pub fn order(self, tasks: &[Task]) -> Vec<&str> {
        self.order_indices(tasks)
            .into_iter()
            .map(|i| tasks[i].id.as_str())
            .collect()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "SHORTEST_FIRST" => Ok(Strategy::ShortestFirst),
            "LONGEST_FIRST" => Ok(Strategy::LongestFirst),
            "REQUIREMENTS_FIRST" => Ok(Strategy::RequirementsFirst),
            _ => Err(ScheduleError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Orders tasks by a strategy given by name.
///
/// # Errors
/// `UnknownStrategy` if the name is not recognized; no partial order is
/// produced.
pub fn order_by_name<'a>(tasks: &'a [Task], strategy: &str) -> crate::Result<Vec<&'a str>> {
    let strategy: Strategy = strategy.parse()?;
    Ok(strategy.order(tasks))
}
