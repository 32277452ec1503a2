use thiserror::Error;

use super::gate::ResourceKind;
use crate::database::StorageError;

/// Outcome of a failed marketplace operation
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<&'static str>,
        problem: FieldProblem,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("caller may not modify {kind} {id}")]
    Forbidden { kind: ResourceKind, id: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// What is wrong with each field listed in a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    /// Required on create but absent or empty
    Missing,
    /// Optional on update but supplied empty
    Empty,
}

impl FieldProblem {
    pub fn describe(self) -> &'static str {
        match self {
            FieldProblem::Missing => "This field is required",
            FieldProblem::Empty => "This field cannot be empty",
        }
    }
}

impl WorkflowError {
    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        WorkflowError::NotFound { kind, id: id.into() }
    }

    pub fn missing_fields(message: impl Into<String>, fields: Vec<&'static str>) -> Self {
        WorkflowError::Validation {
            message: message.into(),
            fields,
            problem: FieldProblem::Missing,
        }
    }

    pub fn empty_fields(message: impl Into<String>, fields: Vec<&'static str>) -> Self {
        WorkflowError::Validation {
            message: message.into(),
            fields,
            problem: FieldProblem::Empty,
        }
    }
}

/// Names of required fields that are absent or empty
pub fn missing_required(fields: &[(&'static str, Option<&str>)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.map_or(true, str::is_empty))
        .map(|(name, _)| *name)
        .collect()
}

/// Names of optional fields that were supplied but empty
pub fn empty_when_present(fields: &[(&'static str, Option<&str>)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_some_and(str::is_empty))
        .map(|(name, _)| *name)
        .collect()
}
