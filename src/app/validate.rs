//! Input checks shared by create/update use cases.

use crate::error::AppError;

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn optional_text(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

pub(crate) fn non_negative(field: &str, value: i64) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!("{field} must be >= 0")));
    }
    Ok(())
}

pub(crate) fn optional_non_negative(field: &str, value: Option<i64>) -> Result<(), AppError> {
    match value {
        Some(v) => non_negative(field, v),
        None => Ok(()),
    }
}
