//! Listing field rules.
//!
//! A listing is a vehicle record (`make`, `model`, `year`, `description`).
//! [`ListingFields`] has no owner: the owner always comes from the
//! authenticated caller, never from submitted data.

use crate::error::CoreError;
use crate::fields::{self, FieldErrors, IntegerInput};

/// Maximum length of the `make` field (characters).
pub const MAX_MAKE_LENGTH: usize = 100;
/// Maximum length of the `model` field (characters).
pub const MAX_MODEL_LENGTH: usize = 100;
/// Largest accepted `year` (the column is a positive 32-bit integer).
pub const MAX_YEAR: i64 = 2_147_483_647;

/// Validated, trimmed listing fields ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFields {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub description: String,
}

/// Validate listing fields submitted as JSON, where `year` may be a number
/// or a numeric string.
pub fn validate_listing(
    make: Option<&str>,
    model: Option<&str>,
    year: IntegerInput<'_>,
    description: Option<&str>,
) -> Result<ListingFields, CoreError> {
    let mut errors = FieldErrors::new();
    let year = fields::integer_input(&mut errors, "year", year);
    collect(&mut errors, make, model, year, description)
}

/// Validate listing fields submitted from an HTML form, where `year` is text.
pub fn validate_listing_form(
    make: Option<&str>,
    model: Option<&str>,
    year: Option<&str>,
    description: Option<&str>,
) -> Result<ListingFields, CoreError> {
    let mut errors = FieldErrors::new();
    let year = fields::parse_integer(&mut errors, "year", year);
    collect(&mut errors, make, model, year, description)
}

fn collect(
    errors: &mut FieldErrors,
    make: Option<&str>,
    model: Option<&str>,
    year: Option<i64>,
    description: Option<&str>,
) -> Result<ListingFields, CoreError> {
    let make = fields::required_text(errors, "make", make, Some(MAX_MAKE_LENGTH));
    let model = fields::required_text(errors, "model", model, Some(MAX_MODEL_LENGTH));
    let description = fields::required_text(errors, "description", description, None);

    if let Some(y) = year {
        if y < 0 {
            errors.add("year", "Ensure this value is greater than or equal to 0.");
        } else if y > MAX_YEAR {
            errors.add(
                "year",
                format!("Ensure this value is less than or equal to {MAX_YEAR}."),
            );
        }
    }

    std::mem::take(errors).into_result(ListingFields {
        make,
        model,
        year: year.unwrap_or_default(),
        description,
    })
}
