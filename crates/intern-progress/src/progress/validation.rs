use super::skills::MAX_PROGRESS;

/// Rejected façade input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("progress must be between 0 and 100, found {0}")]
    ProgressOutOfRange(u8),
    #[error("unknown application status '{0}'")]
    UnknownStatus(String),
}

pub(crate) fn non_blank<'a>(
    field: &'static str,
    value: &'a str,
) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(trimmed)
    }
}

pub(crate) fn progress_percent(value: u8) -> Result<u8, ValidationError> {
    if value > MAX_PROGRESS {
        Err(ValidationError::ProgressOutOfRange(value))
    } else {
        Ok(value)
    }
}
