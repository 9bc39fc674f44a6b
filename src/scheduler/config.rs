//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::dispatching::Strategy;

/// Settings shared by the greedy scheduler and the heuristic selector.
///
/// Deserializable so it can be embedded in a larger configuration file;
/// every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Abort a run once the clock passes this time. `None` = unbounded.
    pub horizon: Option<u64>,
    /// Evaluate heuristics on the rayon thread pool.
    pub parallel: bool,
    /// Heuristics to compare, in tie-break order. Empty = all of them.
    pub strategies: Vec<Strategy>,
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time horizon.
    pub fn with_horizon(mut self, horizon: u64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Enables parallel heuristic evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the heuristics to compare.
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Effective strategy list: the configured one, or every strategy.
    pub fn strategies(&self) -> Vec<Strategy> {
        if self.strategies.is_empty() {
            Strategy::ALL.to_vec()
        } else {
            self.strategies.clone()
        }
    }
}
