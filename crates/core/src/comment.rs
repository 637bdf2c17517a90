//! Comment field rules.

use crate::error::CoreError;
use crate::fields::{self, FieldErrors};

/// Validate comment content, returning it trimmed.
pub fn validate_content(content: Option<&str>) -> Result<String, CoreError> {
    let mut errors = FieldErrors::new();
    let content = fields::required_text(&mut errors, "content", content, None);
    errors.into_result(content)
}
