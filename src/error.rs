//! Errors raised while building ARM and EER models.

/// Failure of a single model construction step.
///
/// Nothing in the model layer recovers from these; they propagate to the
/// loader or transformer that issued the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Constraint violation: {entity} has no attribute named {attribute}")]
    ConstraintViolation { entity: String, attribute: String },
    #[error("Duplicate attribute {attribute} in {entity}")]
    DuplicateAttribute { entity: String, attribute: String },
    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),
}
