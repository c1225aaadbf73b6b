use report_store::StoreError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// One reason a submission was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("All agreements must be accepted")]
    AgreementsNotAccepted,

    #[error("Invalid value for {field}: {value}")]
    InvalidChoice { field: String, value: String },

    /// Carries the rejected raw value
    #[error("Invalid odometer reading")]
    InvalidOdometer(String),
}

/// Every problem found in a submission, collected rather than short-circuited
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed with {} issue(s)", .issues.len())]
pub struct ValidationFailure {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn missing_fields(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter_map(|issue| match issue {
                ValidationIssue::MissingField(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, issue: &ValidationIssue) -> bool {
        self.issues.contains(issue)
    }

    /// Human-readable issue lines, in detection order
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// `{"message": "Validation failed", "errors": ["Missing required field: zip", ...]}`
impl Serialize for ValidationFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationFailure", 2)?;
        state.serialize_field("message", "Validation failed")?;
        state.serialize_field("errors", &self.messages())?;
        state.end()
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// The store refused a structurally valid report
    #[error("Report rejected by storage: {}", .0.join("; "))]
    PersistenceRejected(Vec<String>),

    #[error("Storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for SubmitError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation(messages) => SubmitError::PersistenceRejected(messages),
            other => SubmitError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages() {
        let failure = ValidationFailure::new(vec![
            ValidationIssue::MissingField("zip".into()),
            ValidationIssue::AgreementsNotAccepted,
            ValidationIssue::InvalidOdometer("abc".into()),
        ]);
        assert_eq!(
            failure.messages(),
            vec![
                "Missing required field: zip",
                "All agreements must be accepted",
                "Invalid odometer reading",
            ]
        );
        assert_eq!(failure.to_string(), "Validation failed with 3 issue(s)");
    }

    #[test]
    fn test_serializes_as_message_and_errors() {
        let failure = ValidationFailure::new(vec![ValidationIssue::MissingField("email".into())]);
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "message": "Validation failed",
                "errors": ["Missing required field: email"]
            })
        );
    }

    #[test]
    fn test_store_constraint_violation_maps_to_persistence_rejected() {
        let err = SubmitError::from(StoreError::ConstraintViolation(vec!["a: b".into()]));
        assert!(matches!(err, SubmitError::PersistenceRejected(ref m) if m == &["a: b"]));

        let err = SubmitError::from(StoreError::Poisoned);
        assert!(matches!(err, SubmitError::Storage(StoreError::Poisoned)));
    }
}
