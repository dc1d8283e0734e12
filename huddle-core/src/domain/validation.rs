use thiserror::Error;

/// Input validation failures surfaced to callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error(
        "Please select exactly {expected} teams. You've selected {actual}."
    )]
    DraftSize { expected: usize, actual: usize },

    #[error("Each team can only be selected once")]
    DuplicateTeam,
}

/// Trim `raw` and require a non-empty value no longer than `max` characters.
pub fn required_text(
    field: &'static str,
    raw: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

pub fn in_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_bounds() {
        assert_eq!(required_text("Name", "  Bills  ", 10).unwrap(), "Bills");
        assert_eq!(
            required_text("Name", "   ", 10),
            Err(ValidationError::Required { field: "Name" })
        );
        assert_eq!(
            required_text("Name", "abcdefghijk", 10),
            Err(ValidationError::TooLong {
                field: "Name",
                max: 10
            })
        );
    }

    #[test]
    fn draft_size_message_matches_board_copy() {
        let err = ValidationError::DraftSize {
            expected: 4,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Please select exactly 4 teams. You've selected 2."
        );
    }
}
