//! Discrete-time greedy list scheduler.
//!
//! # Algorithm
//!
//! The clock advances one unit per round. In each round the pending tasks
//! are scanned in priority order; a task starts now if every global
//! resource it needs is free and one of its allowed machines (first free
//! one in preference order) is free. Started tasks reserve their machine
//! and resources until `now + duration` and leave the pending list at the
//! end of the round.
//!
//! A round that starts nothing while every machine and resource is already
//! free proves that no later round can start anything either, so the run
//! fails with `Unschedulable` instead of spinning.
//!
//! # Complexity
//! O(T * n * c) where T=makespan, n=tasks, c=allowed machines + resources per task.
//!
//! # Reference
//! Graham (1966), "Bounds for Certain Multiprocessing Anomalies"

use tracing::{debug, trace, warn};

use super::SchedulerConfig;
use crate::dispatching::Strategy;
use crate::error::{Result, ScheduleError};
use crate::models::{Instance, ScheduleDecision, SchedulingResult};

/// Time-stepped greedy scheduler.
///
/// Stateless between runs: every call allocates fresh availability tables,
/// so one scheduler (and one instance) can serve any number of runs.
///
/// # Example
///
/// ```
/// use greedy_schedule::dispatching::Strategy;
/// use greedy_schedule::models::{InstanceSpec, Task};
/// use greedy_schedule::scheduler::GreedyScheduler;
///
/// let instance = InstanceSpec::new()
///     .with_task(Task::new("t1", 2))
///     .with_task(Task::new("t2", 1))
///     .with_task(Task::new("t3", 3).with_resource("r1"))
///     .with_machine("m1")
///     .with_resource("r1")
///     .build()
///     .unwrap();
///
/// let result = GreedyScheduler::new()
///     .run_strategy(&instance, Strategy::ShortestFirst)
///     .unwrap();
/// assert_eq!(result.makespan, 6);
/// assert_eq!(result.decision_for_task("t3").unwrap().start, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyScheduler {
    horizon: Option<u64>,
}

impl GreedyScheduler {
    /// Creates a scheduler without a time horizon.
    pub fn new() -> Self {
        Self { horizon: None }
    }

    /// Creates a scheduler from configuration.
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            horizon: config.horizon,
        }
    }

    /// Aborts any run whose clock passes `horizon`.
    pub fn with_horizon(mut self, horizon: u64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Configured horizon, if any.
    pub fn horizon(&self) -> Option<u64> {
        self.horizon
    }

    /// Orders the instance's tasks by `strategy` and schedules them.
    pub fn run_strategy(&self, instance: &Instance, strategy: Strategy) -> Result<SchedulingResult> {
        let order = strategy.order_indices(instance.tasks());
        let result = self.schedule(instance, &order)?;
        debug!(
            %strategy,
            makespan = result.makespan,
            rounds = result.rounds,
            "heuristic evaluated"
        );
        Ok(result.with_strategy(strategy))
    }

    /// Schedules tasks in the given priority order (task identifiers).
    ///
    /// # Errors
    /// `InvalidOrder` if an identifier is unknown, plus everything
    /// [`schedule`](Self::schedule) reports.
    pub fn schedule_ids<S: AsRef<str>>(
        &self,
        instance: &Instance,
        order: &[S],
    ) -> Result<SchedulingResult> {
        let handles = order
            .iter()
            .map(|id| {
                let id = id.as_ref();
                instance
                    .task_handle(id)
                    .ok_or_else(|| ScheduleError::InvalidOrder(format!("unknown task '{id}'")))
            })
            .collect::<Result<Vec<usize>>>()?;
        self.schedule(instance, &handles)
    }

    /// Schedules tasks in the given priority order (task handles).
    ///
    /// # Errors
    /// - `InvalidOrder` if `order` is not a permutation of the task handles.
    /// - `Unschedulable` if some task can never start, or the horizon is
    ///   exceeded.
    pub fn schedule(&self, instance: &Instance, order: &[usize]) -> Result<SchedulingResult> {
        check_permutation(instance, order)?;

        let mut machine_free = vec![0u64; instance.machines().len()];
        let mut resource_free = vec![0u64; instance.resources().len()];
        let mut pending: Vec<usize> = order.to_vec();
        let mut result = SchedulingResult::new();
        let mut now: u64 = 0;

        while !pending.is_empty() {
            if let Some(horizon) = self.horizon {
                if now > horizon {
                    warn!(horizon, pending = pending.len(), "horizon exceeded");
                    return Err(unschedulable(instance, now, &pending));
                }
            }

            let placed_before = result.decision_count();

            // Scan order is fixed for the round; retain visits each task once.
            pending.retain(|&task| {
                let Some(machine) = find_slot(instance, task, now, &machine_free, &resource_free)
                else {
                    return true;
                };

                let duration = instance.task(task).duration;
                // Bounded by the validated duration sum.
                let end = now + duration;
                machine_free[machine] = end;
                for &r in instance.resource_handles(task) {
                    resource_free[r] = end;
                }

                let decision = ScheduleDecision::new(
                    &instance.task(task).id,
                    now,
                    &instance.machines()[machine].id,
                    duration,
                );
                trace!(task = %decision.task_id, machine = %decision.machine_id, start = now, end, "placed");
                result.add_decision(decision);
                false
            });

            let placed = result.decision_count() - placed_before;
            if placed == 0
                && machine_free.iter().all(|&t| t <= now)
                && resource_free.iter().all(|&t| t <= now)
            {
                warn!(time = now, pending = pending.len(), "no progress possible");
                return Err(unschedulable(instance, now, &pending));
            }

            now += 1;
        }

        result.rounds = now;
        Ok(result)
    }
}

/// First free allowed machine for `task` at `now`, provided all of its
/// resources are free too.
fn find_slot(
    instance: &Instance,
    task: usize,
    now: u64,
    machine_free: &[u64],
    resource_free: &[u64],
) -> Option<usize> {
    let resources_free = instance
        .resource_handles(task)
        .iter()
        .all(|&r| resource_free[r] <= now);
    if !resources_free {
        return None;
    }
    instance
        .machine_handles(task)
        .iter()
        .copied()
        .find(|&m| machine_free[m] <= now)
}

fn check_permutation(instance: &Instance, order: &[usize]) -> Result<()> {
    let n = instance.task_count();
    if order.len() != n {
        return Err(ScheduleError::InvalidOrder(format!(
            "order has {} entries but the instance has {n} tasks",
            order.len()
        )));
    }
    let mut seen = vec![false; n];
    for &t in order {
        if t >= n {
            return Err(ScheduleError::InvalidOrder(format!(
                "task handle {t} out of range"
            )));
        }
        if std::mem::replace(&mut seen[t], true) {
            return Err(ScheduleError::InvalidOrder(format!(
                "task '{}' appears more than once",
                instance.task(t).id
            )));
        }
    }
    Ok(())
}

fn unschedulable(instance: &Instance, time: u64, pending: &[usize]) -> ScheduleError {
    ScheduleError::Unschedulable {
        time,
        tasks: pending
            .iter()
            .map(|&t| instance.task(t).id.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InstanceSpec, Task};
    use crate::validation::audit_schedule;

    fn scenario_instance() -> Instance {
        InstanceSpec::new()
            .with_task(Task::new("t1", 2))
            .with_task(Task::new("t2", 1))
            .with_task(Task::new("t3", 3).with_resource("r1"))
            .with_machine("m1")
            .with_resource("r1")
            .build()
            .unwrap()
    }

    #[test]
    fn test_shortest_first_scenario() {
        let inst = scenario_instance();
        let result = GreedyScheduler::new()
            .run_strategy(&inst, Strategy::ShortestFirst)
            .unwrap();

        let starts: Vec<(&str, u64, &str)> = result
            .decisions
            .iter()
            .map(|d| (d.task_id.as_str(), d.start, d.machine_id.as_str()))
            .collect();
        assert_eq!(
            starts,
            vec![("t2", 0, "m1"), ("t1", 1, "m1"), ("t3", 3, "m1")]
        );
        assert_eq!(result.makespan, 6);
        assert_eq!(result.rounds, 4);
        assert_eq!(result.strategy, Some(Strategy::ShortestFirst));
    }

    #[test]
    fn test_empty_instance() {
        let inst = InstanceSpec::new().with_machine("m1").build().unwrap();
        let result = GreedyScheduler::new().schedule(&inst, &[]).unwrap();
        assert_eq!(result.makespan, 0);
        assert!(result.is_empty());
        assert_eq!(result.rounds, 0);
    }

    #[test]
    fn test_parallel_machines() {
        let inst = InstanceSpec::new()
            .with_task(Task::new("a", 1))
            .with_task(Task::new("b", 2))
            .with_task(Task::new("c", 3))
            .with_task(Task::new("d", 4))
            .with_machine("m1")
            .with_machine("m2")
            .build()
            .unwrap();
        let result = GreedyScheduler::new()
            .run_strategy(&inst, Strategy::ShortestFirst)
            .unwrap();

        let order: Vec<&str> = result.decisions.iter().map(|d| d.task_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
        let starts: Vec<u64> = result.decisions.iter().map(|d| d.start).collect();
        assert_eq!(starts, vec![0, 0, 1, 2]);
        assert!(starts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(result.makespan, 6);
    }

    #[test]
    fn test_resource_exclusive_across_machines() {
        let inst = InstanceSpec::new()
            .with_task(Task::new("a", 3).with_resource("r1"))
            .with_task(Task::new("b", 2).with_resource("r1"))
            .with_task(Task::new("c", 2))
            .with_machine("m1")
            .with_machine("m2")
            .with_resource("r1")
            .build()
            .unwrap();
        let result = GreedyScheduler::new().schedule(&inst, &[0, 1, 2]).unwrap();

        let a = result.decision_for_task("a").unwrap();
        let b = result.decision_for_task("b").unwrap();
        let c = result.decision_for_task("c").unwrap();
        assert_eq!((a.start, a.machine_id.as_str()), (0, "m1"));
        // b waits for r1 even though m2 is free
        assert_eq!(b.start, 3);
        assert_eq!((c.start, c.machine_id.as_str()), (0, "m2"));
        assert_eq!(result.makespan, 5);
        assert!(audit_schedule(&inst, &result).is_empty());
    }

    #[test]
    fn test_allowed_machine_preference_order() {
        let inst = InstanceSpec::new()
            .with_task(Task::new("a", 1).with_machines(["m2", "m1"]))
            .with_machine("m1")
            .with_machine("m2")
            .build()
            .unwrap();
        let result = GreedyScheduler::new().schedule(&inst, &[0]).unwrap();
        assert_eq!(result.decisions[0].machine_id, "m2");
    }

    #[test]
    fn test_later_task_fills_gap_in_same_round() {
        // "a" blocks on r1, "b" behind it in order still starts at 0
        let inst = InstanceSpec::new()
            .with_task(Task::new("hold", 4).with_resource("r1"))
            .with_task(Task::new("a", 1).with_resource("r1"))
            .with_task(Task::new("b", 1))
            .with_machine("m1")
            .with_machine("m2")
            .with_resource("r1")
            .build()
            .unwrap();
        let result = GreedyScheduler::new().schedule(&inst, &[0, 1, 2]).unwrap();
        assert_eq!(result.decision_for_task("b").unwrap().start, 0);
        assert_eq!(result.decision_for_task("a").unwrap().start, 4);
        let order: Vec<&str> = result.decisions.iter().map(|d| d.task_id.as_str()).collect();
        assert_eq!(order, vec!["hold", "b", "a"]);
    }

    #[test]
    fn test_no_machines_is_unschedulable() {
        let inst = InstanceSpec::new()
            .with_task(Task::new("t1", 1))
            .build()
            .unwrap();
        let err = GreedyScheduler::new().schedule(&inst, &[0]).unwrap_err();
        match err {
            ScheduleError::Unschedulable { time, tasks } => {
                assert_eq!(time, 0);
                assert_eq!(tasks, vec!["t1"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_end_times_stay_in_range() {
        let err = InstanceSpec::new()
            .with_task(Task::new("small", 1))
            .with_task(Task::new("big", u64::MAX))
            .with_machine("m1")
            .build()
            .unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedInstance(_)));

        let inst = InstanceSpec::new()
            .with_task(Task::new("small", 1))
            .with_task(Task::new("big", u64::MAX - 1))
            .with_machine("m1")
            .build()
            .unwrap();
        let result = GreedyScheduler::new().schedule(&inst, &[0, 1]).unwrap();
        assert_eq!(result.makespan, u64::MAX);
        assert_eq!(result.decision_for_task("big").unwrap().start, 1);
    }

    #[test]
    fn test_horizon_exceeded() {
        let inst = InstanceSpec::new()
            .with_task(Task::new("t1", 5))
            .with_task(Task::new("t2", 5))
            .with_machine("m1")
            .build()
            .unwrap();
        let err = GreedyScheduler::new()
            .with_horizon(3)
            .schedule(&inst, &[0, 1])
            .unwrap_err();
        match err {
            ScheduleError::Unschedulable { time, tasks } => {
                assert_eq!(time, 4);
                assert_eq!(tasks, vec!["t2"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_horizon_does_not_change_result() {
        let inst = scenario_instance();
        let free = GreedyScheduler::new()
            .run_strategy(&inst, Strategy::LongestFirst)
            .unwrap();
        let bounded = GreedyScheduler::new()
            .with_horizon(100)
            .run_strategy(&inst, Strategy::LongestFirst)
            .unwrap();
        assert_eq!(free, bounded);
    }

    #[test]
    fn test_invalid_orders() {
        let inst = scenario_instance();
        let s = GreedyScheduler::new();
        assert!(matches!(s.schedule(&inst, &[0, 1]), Err(ScheduleError::InvalidOrder(_))));
        assert!(matches!(s.schedule(&inst, &[0, 1, 1]), Err(ScheduleError::InvalidOrder(_))));
        assert!(matches!(s.schedule(&inst, &[0, 1, 7]), Err(ScheduleError::InvalidOrder(_))));
        assert!(matches!(
            s.schedule_ids(&inst, &["t1", "t2", "nope"]),
            Err(ScheduleError::InvalidOrder(_))
        ));
    }

    #[test]
    fn test_schedule_ids_matches_handles() {
        let inst = scenario_instance();
        let s = GreedyScheduler::new();
        let by_id = s.schedule_ids(&inst, &["t2", "t1", "t3"]).unwrap();
        let by_handle = s.schedule(&inst, &[1, 0, 2]).unwrap();
        assert_eq!(by_id, by_handle);
    }

    #[test]
    fn test_deterministic_and_independent_runs() {
        let inst = scenario_instance();
        let s = GreedyScheduler::new();
        let first = s.run_strategy(&inst, Strategy::RequirementsFirst).unwrap();
        let _other = s.run_strategy(&inst, Strategy::ShortestFirst).unwrap();
        let again = s.run_strategy(&inst, Strategy::RequirementsFirst).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_requirements_first_scenario() {
        let inst = scenario_instance();
        let result = GreedyScheduler::new()
            .run_strategy(&inst, Strategy::RequirementsFirst)
            .unwrap();
        // t3, t1, t2 on the single machine back to back
        let starts: Vec<(&str, u64)> = result
            .decisions
            .iter()
            .map(|d| (d.task_id.as_str(), d.start))
            .collect();
        assert_eq!(starts, vec![("t3", 0), ("t1", 3), ("t2", 5)]);
        assert_eq!(result.makespan, 6);
    }
}
