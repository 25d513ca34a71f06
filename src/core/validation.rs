//! Instance id validation.
//!
//! Ids for new instances must be short and made of letters, digits, dashes
//! and underscores so that any state store can use them as keys. Ids that
//! refer to existing instances only need to be present: the engine decides
//! whether they exist.

use unicode_general_category::{get_general_category, GeneralCategory};

use super::error::ApiError;

/// Maximum length, in characters, of an id passed to start
pub const MAX_INSTANCE_ID_LENGTH: usize = 64;

/// Validate a caller-supplied instance id.
///
/// `is_create` is true only for starting a new instance. The length check
/// runs before the character check, so an id that is both too long and
/// malformed reports `InstanceIdTooLong`.
pub fn validate_instance_id(instance_id: &str, is_create: bool) -> Result<(), ApiError> {
    if instance_id.is_empty() {
        return Err(ApiError::MissingInstanceId);
    }

    if !is_create {
        return Ok(());
    }

    if instance_id.chars().count() > MAX_INSTANCE_ID_LENGTH {
        return Err(ApiError::InstanceIdTooLong {
            limit: MAX_INSTANCE_ID_LENGTH,
        });
    }

    if !instance_id.chars().all(|c| is_letter_or_digit(c) || c == '_' || c == '-') {
        return Err(ApiError::InvalidInstanceId {
            instance_id: instance_id.to_string(),
        });
    }

    Ok(())
}

/// Unicode letter (any L category) or decimal digit (Nd).
///
/// Narrower than `char::is_alphanumeric`, which also admits other numerics
/// such as `½` or `Ⅷ` and alphabetic marks.
fn is_letter_or_digit(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}
