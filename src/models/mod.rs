//! Scheduling domain models.
//!
//! Provides the data types for a problem instance (tasks, machines, global
//! resources) and for the outcome of a scheduling run.
//!
//! # Domain Mappings
//!
//! | greedy-schedule | Test lab | Build farm | Manufacturing |
//! |-----------------|----------|------------|---------------|
//! | Task | Test case | Build job | Order |
//! | Machine | Embedded board | Worker | Station |
//! | GlobalResource | Shared probe | License seat | Crane |
//! | ScheduleDecision | Slot booking | Dispatch | Work order |

mod instance;
mod resource;
mod schedule;
mod task;

pub use instance::{Instance, InstanceSpec};
pub use resource::{GlobalResource, Machine};
pub use schedule::{ScheduleDecision, SchedulingResult, Violation, ViolationType};
pub use task::Task;
