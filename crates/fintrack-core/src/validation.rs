//! Validation utilities.

use crate::{FieldError, FintrackError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `FintrackError` on failure.
    fn validate_request(&self) -> Result<(), FintrackError> {
        self.validate().map_err(validation_errors_to_fintrack_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors, sorted by field name.
#[must_use]
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));
    field_errors
}

/// Converts `validator::ValidationErrors` to `FintrackError`.
#[must_use]
pub fn validation_errors_to_fintrack_error(errors: ValidationErrors) -> FintrackError {
    let message = collect_field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    FintrackError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[derive(Validate)]
    struct LabelForm {
        #[validate(length(min = 1, message = "required"))]
        name: String,
        #[validate(custom(function = "not_blank"))]
        description: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("rent").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let form = LabelForm {
            name: String::new(),
            description: "  ".to_string(),
        };
        let err = form.validate_request().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name: required"));
        assert!(message.contains("description: not_blank"));
    }
}
