//! Schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Machine utilization | busy time / makespan, per machine |
//! | Resource utilization | held time / makespan, per global resource |
//! | Idle time | machines × makespan − total busy time |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use crate::models::{Instance, SchedulingResult};

/// Schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: u64,
    /// Per-machine utilization (0.0..1.0), every declared machine included.
    pub machine_utilization: HashMap<String, f64>,
    /// Per-resource utilization (0.0..1.0), every declared resource included.
    pub resource_utilization: HashMap<String, f64>,
    /// Mean machine utilization.
    pub avg_machine_utilization: f64,
    /// Machine time left unused before the makespan.
    pub total_idle_time: u64,
}

impl ScheduleKpi {
    /// Computes KPIs from a result and the instance it was produced for.
    ///
    /// Decisions naming tasks outside the instance are ignored for
    /// resource accounting.
    pub fn calculate(instance: &Instance, result: &SchedulingResult) -> Self {
        let makespan = result.makespan;

        let mut machine_busy: HashMap<&str, u64> = instance
            .machines()
            .iter()
            .map(|m| (m.id.as_str(), 0))
            .collect();
        let mut resource_busy = vec![0u64; instance.resources().len()];

        for d in &result.decisions {
            *machine_busy.entry(d.machine_id.as_str()).or_insert(0) += d.duration();
            if let Some(handle) = instance.task_handle(&d.task_id) {
                for &r in instance.resource_handles(handle) {
                    resource_busy[r] += d.duration();
                }
            }
        }

        let ratio = |busy: u64| {
            if makespan == 0 {
                0.0
            } else {
                busy as f64 / makespan as f64
            }
        };

        let total_busy: u64 = machine_busy.values().sum();
        let machine_utilization: HashMap<String, f64> = machine_busy
            .iter()
            .map(|(id, &busy)| (id.to_string(), ratio(busy)))
            .collect();
        let resource_utilization = instance
            .resources()
            .iter()
            .zip(&resource_busy)
            .map(|(r, &busy)| (r.id.clone(), ratio(busy)))
            .collect();

        let avg_machine_utilization = if machine_utilization.is_empty() {
            0.0
        } else {
            machine_utilization.values().sum::<f64>() / machine_utilization.len() as f64
        };

        let capacity = (instance.machines().len() as u64).saturating_mul(makespan);
        Self {
            makespan,
            machine_utilization,
            resource_utilization,
            avg_machine_utilization,
            total_idle_time: capacity.saturating_sub(total_busy),
        }
    }

    /// Whether average machine utilization reaches `min_utilization`.
    pub fn meets_threshold(&self, min_utilization: f64) -> bool {
        self.avg_machine_utilization >= min_utilization
    }
}
