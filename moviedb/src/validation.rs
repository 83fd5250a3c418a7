//! Validation Support
//!
//! Create and update payloads implement [`Validatable`]; handlers call it before
//! opening a save so that bad input is rejected with 422 without touching the
//! database.
//!
//! # Example
//!
//! ```rust,ignore
//! use moviedb::validation::{validators, Validatable, ValidationErrors};
//!
//! impl Validatable for GenreCreate {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         errors.check(validators::validate_required("name", &self.name));
//!         errors.result()
//!     }
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Serialize, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the error of a single validator, if any.
    pub fn check(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(error) = outcome {
            self.add(error);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Trait for payloads that can be validated before they are saved
pub trait Validatable {
    /// # Errors
    ///
    /// Returns every rule the payload breaks.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Helper validators for common patterns
pub mod validators {
    use super::ValidationError;
    use rust_decimal::Decimal;
    use std::collections::HashSet;
    use std::fmt;
    use std::hash::Hash;

    /// Validate string length (in characters) is within range
    pub fn validate_length(
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<(), ValidationError> {
        let len = value.chars().count();

        if let Some(min_len) = min {
            if len < min_len {
                return Err(ValidationError::new(
                    field,
                    format!("Must be at least {min_len} characters"),
                ));
            }
        }

        if let Some(max_len) = max {
            if len > max_len {
                return Err(ValidationError::new(
                    field,
                    format!("Must be at most {max_len} characters"),
                ));
            }
        }

        Ok(())
    }

    /// Validate number is within range
    pub fn validate_range<T: PartialOrd + fmt::Display>(
        field: &str,
        value: T,
        min: Option<T>,
        max: Option<T>,
    ) -> Result<(), ValidationError> {
        if let Some(min_val) = min {
            if value < min_val {
                return Err(ValidationError::new(
                    field,
                    format!("Must be at least {min_val}"),
                ));
            }
        }

        if let Some(max_val) = max {
            if value > max_val {
                return Err(ValidationError::new(
                    field,
                    format!("Must be at most {max_val}"),
                ));
            }
        }

        Ok(())
    }

    /// Validate value is not blank
    pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "This field is required"));
        }
        Ok(())
    }

    /// Validate a decimal fits a `DECIMAL(precision, scale)` column without rounding.
    pub fn validate_decimal(
        field: &str,
        value: Decimal,
        precision: u32,
        scale: u32,
    ) -> Result<(), ValidationError> {
        let normalized = value.normalize();
        if normalized.scale() > scale {
            return Err(ValidationError::new(
                field,
                format!("Must have at most {scale} decimal places"),
            ));
        }

        let integer_digits = normalized.trunc().abs().to_string().trim_start_matches('0').len();
        let allowed = (precision - scale) as usize;
        if integer_digits > allowed {
            return Err(ValidationError::new(
                field,
                format!("Must have at most {allowed} digits before the decimal point"),
            ));
        }

        Ok(())
    }

    /// Validate that a list of keys has no repeats.
    pub fn validate_unique<T: Eq + Hash + fmt::Display>(
        field: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for value in values {
            if seen.contains(&value) {
                return Err(ValidationError::new(
                    field,
                    format!("Duplicate entry {value}"),
                ));
            }
            seen.insert(value);
        }
        Ok(())
    }
}
