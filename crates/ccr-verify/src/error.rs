use thiserror::Error;

/// Errors produced by verification engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerifyError {
    /// A submission field is missing, malformed, or out of range.
    /// Caller-facing and side-effect free: resubmit with corrected input.
    #[error("validation failed for `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl VerifyError {
    /// Convenience constructor for field validation failures.
    pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
