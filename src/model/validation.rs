//! Field validators plugged into `#[validate(custom(...))]` on the payloads.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::model::upload::UploadField;

/// Precision of `progress` and `score` columns, `NUMERIC(5, 2)`.
pub const DECIMAL_MAX_DIGITS: u32 = 5;
pub const DECIMAL_PLACES: u32 = 2;

fn error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Letters, digits and `@ . + - _`.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));

    if valid {
        Ok(())
    } else {
        Err(error(
            "invalid_username",
            String::from(
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            ),
        ))
    }
}

pub fn validate_decimal(value: &Decimal) -> Result<(), ValidationError> {
    let normalized = value.normalize();
    let decimals = normalized.scale();
    let digits = normalized.mantissa().unsigned_abs().to_string().len() as u32;
    let whole_digits = digits.saturating_sub(decimals);

    if decimals > DECIMAL_PLACES {
        return Err(error(
            "max_decimal_places",
            format!("Ensure that there are no more than {DECIMAL_PLACES} decimal places."),
        ));
    }

    if whole_digits > DECIMAL_MAX_DIGITS - DECIMAL_PLACES {
        return Err(error(
            "max_whole_digits",
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                DECIMAL_MAX_DIGITS - DECIMAL_PLACES
            ),
        ));
    }

    Ok(())
}

pub fn validate_profile_picture(value: &str) -> Result<(), ValidationError> {
    UploadField::ProfilePicture.validate(value)
}

pub fn validate_course_image(value: &str) -> Result<(), ValidationError> {
    UploadField::CourseImage.validate(value)
}

pub fn validate_module_resource(value: &str) -> Result<(), ValidationError> {
    UploadField::ModuleResource.validate(value)
}

pub fn validate_video(value: &str) -> Result<(), ValidationError> {
    UploadField::Video.validate(value)
}
