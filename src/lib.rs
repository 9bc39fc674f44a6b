//! Greedy list scheduling of tasks on machines with exclusive global resources.
//!
//! Assigns a fixed set of tasks to a fixed set of machines on a discrete
//! clock. Tasks may be restricted to some machines and may hold cluster-wide
//! exclusive resources while they run. Several task-ordering heuristics are
//! simulated and the one with the smallest makespan wins.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `Machine`, `GlobalResource`,
//!   `Instance`, `ScheduleDecision`, `SchedulingResult`
//! - **`validation`**: Input integrity checks and schedule auditing
//! - **`dispatching`**: Ordering heuristics (`Strategy`)
//! - **`scheduler`**: `GreedyScheduler`, `HeuristicSelector`, `ScheduleKpi`
//! - **`io`**: Fact-format and JSON instances, decision-line output
//! - **`generator`**: Seeded random instances
//!
//! # Example
//!
//! ```
//! use greedy_schedule::io::parse_facts;
//! use greedy_schedule::scheduler::HeuristicSelector;
//!
//! let text = "\
//! test( 'build', 4, [], ['license']).
//! test( 'lint', 1, [], []).
//! test( 'docs', 2, ['m2'], []).
//! embedded_board( 'm1').
//! embedded_board( 'm2').
//! resource( 'license', 1).
//! ";
//! let instance = parse_facts(text).unwrap().build().unwrap();
//! let selection = HeuristicSelector::new().select(&instance).unwrap();
//! assert_eq!(selection.makespan(), 4);
//! ```
//!
//! # References
//!
//! - Graham (1966), "Bounds for Certain Multiprocessing Anomalies"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod dispatching;
pub mod error;
pub mod generator;
pub mod io;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Result, ScheduleError};
