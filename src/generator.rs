//! Seeded random instance generation.
//!
//! Produces well-formed instances for benchmarking the heuristics and for
//! property checks: every generated task has a positive duration, any
//! machine restriction names declared machines only, and resource
//! requirements name declared resources only.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Instance, InstanceSpec, Task};

/// Parameters of a random instance family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceGenerator {
    /// Number of tasks.
    pub num_tasks: usize,
    /// Number of machines (at least 1 for a schedulable instance).
    pub num_machines: usize,
    /// Number of global resources.
    pub num_resources: usize,
    /// Durations are drawn uniformly from `1..=max_duration`.
    pub max_duration: u64,
    /// Probability that a task is restricted to a subset of machines.
    pub machine_restriction_probability: f64,
    /// Probability that a task requires each individual resource.
    pub resource_usage_probability: f64,
}

impl Default for InstanceGenerator {
    fn default() -> Self {
        Self {
            num_tasks: 20,
            num_machines: 3,
            num_resources: 2,
            max_duration: 10,
            machine_restriction_probability: 0.3,
            resource_usage_probability: 0.2,
        }
    }
}

impl InstanceGenerator {
    /// Creates a generator with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of tasks.
    pub fn with_tasks(mut self, n: usize) -> Self {
        self.num_tasks = n;
        self
    }

    /// Sets the number of machines.
    pub fn with_machines(mut self, n: usize) -> Self {
        self.num_machines = n;
        self
    }

    /// Sets the number of global resources.
    pub fn with_resources(mut self, n: usize) -> Self {
        self.num_resources = n;
        self
    }

    /// Sets the maximum duration (clamped to at least 1).
    pub fn with_max_duration(mut self, max: u64) -> Self {
        self.max_duration = max.max(1);
        self
    }

    /// Sets the machine restriction probability (clamped to 0.0..=1.0).
    pub fn with_machine_restriction(mut self, p: f64) -> Self {
        self.machine_restriction_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-resource usage probability (clamped to 0.0..=1.0).
    pub fn with_resource_usage(mut self, p: f64) -> Self {
        self.resource_usage_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Generates the raw instance for `seed`.
    ///
    /// Identical seeds and parameters yield identical instances.
    pub fn generate_spec(&self, seed: u64) -> InstanceSpec {
        let mut rng = StdRng::seed_from_u64(seed);
        let machine_ids: Vec<String> = (1..=self.num_machines).map(|i| format!("m{i}")).collect();
        let resource_ids: Vec<String> =
            (1..=self.num_resources).map(|i| format!("r{i}")).collect();
        let max_duration = self.max_duration.max(1);

        let mut spec = InstanceSpec::new();
        for i in 1..=self.num_tasks {
            let mut task = Task::new(format!("t{i}"), rng.random_range(1..=max_duration));

            if !machine_ids.is_empty() && rng.random_bool(self.machine_restriction_probability) {
                let mut allowed: Vec<String> = machine_ids
                    .iter()
                    .filter(|_| rng.random_bool(0.5))
                    .cloned()
                    .collect();
                if allowed.is_empty() {
                    let pick = rng.random_range(0..machine_ids.len());
                    allowed.push(machine_ids[pick].clone());
                }
                task.allowed_machines = allowed;
            }

            task.required_resources = resource_ids
                .iter()
                .filter(|_| rng.random_bool(self.resource_usage_probability))
                .cloned()
                .collect();

            spec.tasks.push(task);
        }
        for id in machine_ids {
            spec = spec.with_machine(id);
        }
        for id in resource_ids {
            spec = spec.with_resource(id);
        }
        spec
    }

    /// Generates and validates the instance for `seed`.
    pub fn generate(&self, seed: u64) -> Result<Instance> {
        self.generate_spec(seed).build()
    }
}
