//! Greedy scheduling, heuristic selection, and KPI evaluation.
//!
//! # Algorithm
//!
//! `GreedyScheduler` runs a discrete-time list schedule for one task order.
//! `HeuristicSelector` runs it once per ordering strategy and keeps the
//! smallest makespan.
//!
//! # KPI
//!
//! `ScheduleKpi` computes machine and resource utilization and idle time.
//!
//! # References
//!
//! - Graham (1966), "Bounds for Certain Multiprocessing Anomalies"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4

mod config;
mod greedy;
mod kpi;
mod selection;

pub use config::SchedulerConfig;
pub use greedy::GreedyScheduler;
pub use kpi::ScheduleKpi;
pub use selection::{Evaluation, HeuristicSelector, Selection};
