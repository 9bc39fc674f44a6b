//! Crate error type.
//!
//! Every failure surfaces to the caller immediately. The simulation is
//! deterministic, so nothing is retried.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors produced while loading, ordering, or scheduling an instance.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The instance references undeclared machines/resources, repeats
    /// identifiers, or carries invalid durations.
    #[error("malformed instance: {}", summarize(.0))]
    MalformedInstance(Vec<ValidationError>),

    /// A strategy name that the orderer does not know.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Some tasks can never be placed.
    #[error("unschedulable at t={time}: {} task(s) can never be placed ({})", .tasks.len(), .tasks.join(", "))]
    Unschedulable { time: u64, tasks: Vec<String> },

    /// A task ordering that is not a permutation of the instance's tasks.
    #[error("invalid task order: {0}")]
    InvalidOrder(String),

    /// A malformed line in a fact-format instance.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_malformed_message_lists_all_errors() {
        let err = ScheduleError::MalformedInstance(vec![
            ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate task ID: t1"),
            ValidationError::new(ValidationErrorKind::ZeroDuration, "Task 't2' has zero duration"),
        ]);
        assert_eq!(
            err.to_string(),
            "malformed instance: Duplicate task ID: t1; Task 't2' has zero duration"
        );
    }

    #[test]
    fn test_unschedulable_message() {
        let err = ScheduleError::Unschedulable {
            time: 7,
            tasks: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "unschedulable at t=7: 2 task(s) can never be placed (a, b)"
        );
    }

    #[test]
    fn test_parse_message() {
        let err = ScheduleError::Parse {
            line: 3,
            message: "expected 4 fields".into(),
        };
        assert_eq!(err.to_string(), "parse error on line 3: expected 4 fields");
    }
}
