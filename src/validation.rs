//! Input validation and schedule auditing.
//!
//! [`validate_input`] checks structural integrity of an instance before any
//! simulation starts. Detects:
//! - Duplicate IDs (tasks, machines, resources)
//! - Machine references outside the declared machine set
//! - Resource references outside the declared resource set
//! - Zero-duration tasks
//! - Total duration beyond the clock range
//!
//! [`audit_schedule`] independently re-checks a finished schedule against
//! its instance: coverage, machine exclusivity, resource exclusivity, and
//! the reported makespan.

use std::collections::{HashMap, HashSet};

use crate::models::{
    GlobalResource, Instance, Machine, ScheduleDecision, SchedulingResult, Task, Violation,
    ViolationType,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A task lists a machine that is not declared.
    InvalidMachineReference,
    /// A task requires a resource that is not declared.
    InvalidResourceReference,
    /// A task has zero duration.
    ZeroDuration,
    /// The durations sum past `u64::MAX`, so some end time would not fit.
    DurationOverflow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a scheduling problem.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. No duplicate machine IDs
/// 3. No duplicate resource IDs
/// 4. All task durations are positive
/// 5. All allowed-machine references point to declared machines
/// 6. All required-resource references point to declared resources
/// 7. The sum of all durations fits in `u64`
///
/// The last check bounds every time the scheduler computes: some task runs
/// at every instant before the makespan, so no end time exceeds the sum.
///
/// An empty machine set is not an error here: tasks that accept any machine
/// then have nowhere to run, which the scheduler reports as unschedulable.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    tasks: &[Task],
    machines: &[Machine],
    resources: &[GlobalResource],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut machine_ids = HashSet::new();
    for m in machines {
        if !machine_ids.insert(m.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate machine ID: {}", m.id),
            ));
        }
    }

    let mut resource_ids = HashSet::new();
    for r in resources {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.id),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }

        if task.duration == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!("Task '{}' has zero duration", task.id),
            ));
        }

        for m in &task.allowed_machines {
            if !machine_ids.contains(m.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidMachineReference,
                    format!("Task '{}' references unknown machine '{}'", task.id, m),
                ));
            }
        }

        for r in &task.required_resources {
            if !resource_ids.contains(r.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!("Task '{}' references unknown resource '{}'", task.id, r),
                ));
            }
        }
    }

    let total = tasks
        .iter()
        .try_fold(0u64, |acc, t| acc.checked_add(t.duration));
    if total.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DurationOverflow,
            "Sum of task durations overflows the clock",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Re-checks a finished schedule against its instance.
///
/// Returns every violation found; an empty list means the schedule covers
/// each task exactly once, respects allowed machines, never double-books a
/// machine or a global resource, and reports the correct makespan.
pub fn audit_schedule(instance: &Instance, result: &SchedulingResult) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut placed: Vec<(usize, &ScheduleDecision)> = Vec::with_capacity(result.decisions.len());

    for d in &result.decisions {
        *seen.entry(d.task_id.as_str()).or_insert(0) += 1;

        let Some(handle) = instance.task_handle(&d.task_id) else {
            violations.push(Violation::new(
                ViolationType::UnknownTask,
                &d.task_id,
                format!("Decision for unknown task '{}'", d.task_id),
            ));
            continue;
        };
        let task = instance.task(handle);

        if d.duration() != task.duration {
            violations.push(Violation::new(
                ViolationType::DurationMismatch,
                &d.task_id,
                format!(
                    "Task '{}' occupies {} units but has duration {}",
                    d.task_id,
                    d.duration(),
                    task.duration
                ),
            ));
        }
        if !task.allowed_machines.iter().any(|m| *m == d.machine_id) {
            violations.push(Violation::new(
                ViolationType::MachineNotAllowed,
                &d.task_id,
                format!("Task '{}' placed on disallowed machine '{}'", d.task_id, d.machine_id),
            ));
        }
        placed.push((handle, d));
    }

    for task in instance.tasks() {
        match seen.get(task.id.as_str()).copied().unwrap_or(0) {
            0 => violations.push(Violation::new(
                ViolationType::MissingTask,
                &task.id,
                format!("Task '{}' was never placed", task.id),
            )),
            1 => {}
            n => violations.push(Violation::new(
                ViolationType::DuplicateTask,
                &task.id,
                format!("Task '{}' was placed {n} times", task.id),
            )),
        }
    }

    for (i, (_, a)) in placed.iter().enumerate() {
        for (_, b) in &placed[i + 1..] {
            if a.machine_id == b.machine_id && a.overlaps(b) {
                violations.push(Violation::new(
                    ViolationType::MachineOverlap,
                    &a.machine_id,
                    format!(
                        "Tasks '{}' and '{}' overlap on machine '{}'",
                        a.task_id, b.task_id, a.machine_id
                    ),
                ));
            }
        }
    }

    for (r, resource) in instance.resources().iter().enumerate() {
        let holders: Vec<&ScheduleDecision> = placed
            .iter()
            .filter(|(h, _)| instance.resource_handles(*h).contains(&r))
            .map(|(_, d)| *d)
            .collect();
        for (i, a) in holders.iter().enumerate() {
            for b in &holders[i + 1..] {
                if a.overlaps(b) {
                    violations.push(Violation::new(
                        ViolationType::ResourceOverlap,
                        &resource.id,
                        format!(
                            "Tasks '{}' and '{}' hold resource '{}' at the same time",
                            a.task_id, b.task_id, resource.id
                        ),
                    ));
                }
            }
        }
    }

    let expected = result.recomputed_makespan();
    if result.makespan != expected {
        violations.push(Violation::new(
            ViolationType::MakespanMismatch,
            "",
            format!("Reported makespan {} but decisions end at {expected}", result.makespan),
        ));
    }

    violations
}
