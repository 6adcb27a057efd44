//! Property validation.
//!
//! Bounds and choice membership are checked after a property has been
//! loaded, read from arguments and prompted. Failures accumulate into
//! [`ValidationErrors`] using stillwater's `Validation`, so one pass reports
//! every broken rule of a property.

use stillwater::Validation;

use crate::capture::property_choices;
use crate::error::{CaptureValidation, ValidationError, ValidationErrors};
use crate::options::Options;
use crate::property::Property;
use crate::value::{Field, Kind};

/// Check `field` against the bounds and choices of `prop`.
///
/// Values no source supplied are only checked when they are not zero, so an
/// untouched optional property never fails. Ignored values always pass.
pub fn validate_property(opts: &Options, prop: &Property, field: &dyn Field) -> CaptureValidation {
    if field.kind() == Kind::Ignored {
        return Validation::Success(());
    }
    if prop.flags.is_empty() && field.is_zero() {
        return Validation::Success(());
    }

    let mut errors = Vec::new();

    if prop.min.is_some() || prop.max.is_some() {
        let size = field.measure().unwrap_or(0.0);
        match (prop.min, prop.max) {
            (Some(min), _) if size < min => {
                errors.push(ValidationError::new(&prop.name, format!("has a min of {}", min)))
            }
            (_, Some(max)) if size > max => {
                errors.push(ValidationError::new(&prop.name, format!("has a max of {}", max)))
            }
            _ => {}
        }
    }

    if field.kind() == Kind::Scalar {
        if let Some(choices) = property_choices(opts, prop, field) {
            let current = field.display();
            let found = choices
                .values()
                .any(|value| textually_equal(field, value, &current));
            if !found {
                errors.push(
                    ValidationError::new(
                        &prop.name,
                        format!("has an invalid option value: {}", current),
                    )
                    .with_value(current),
                );
            }
        }
    }

    match ValidationErrors::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(()),
    }
}

/// A declared choice value equals the current value when it parses into the
/// same type and renders the same way; unparseable values compare as text.
fn textually_equal(field: &dyn Field, choice: &str, current: &str) -> bool {
    let mut parsed = field.stage();
    match parsed.parse_text(choice) {
        Ok(()) => parsed.display() == current,
        Err(_) => choice == current,
    }
}

/// Fail with `message` for `property` unless `condition` holds.
///
/// A building block for record validators:
///
/// ```
/// use argprompt::{ensure, CaptureValidation};
/// use stillwater::Validation;
///
/// let from = 5;
/// let to = 3;
/// let result: CaptureValidation = ensure(from <= to, "To", "must not be before From");
/// assert!(matches!(result, Validation::Failure(_)));
/// ```
pub fn ensure(condition: bool, property: &str, message: &str) -> CaptureValidation {
    if condition {
        Validation::Success(())
    } else {
        Validation::Failure(ValidationErrors::single(ValidationError::new(
            property, message,
        )))
    }
}
