//! Field-level validation for user input.
//!
//! Every check returns `Err` with a human-readable message suitable for a
//! `400 Bad Request` body.

use validator::ValidateEmail;

/// Maximum length of a user's first name, in characters.
pub const MAX_FIRST_NAME_LEN: usize = 100;

/// Minimum password length enforced on user creation and password changes.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Bounds for `PATCH /user-sessions/{id}/extend`.
pub const MIN_EXTEND_DAYS: i64 = 1;
pub const MAX_EXTEND_DAYS: i64 = 365;

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(format!("'{email}' is not a valid email address"))
    }
}

pub fn validate_first_name(first_name: &str) -> Result<(), String> {
    let trimmed = first_name.trim();
    if trimmed.is_empty() {
        return Err("First name must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_FIRST_NAME_LEN {
        return Err(format!(
            "First name must be at most {MAX_FIRST_NAME_LEN} characters"
        ));
    }
    Ok(())
}

pub fn validate_extend_days(days: i64) -> Result<(), String> {
    if (MIN_EXTEND_DAYS..=MAX_EXTEND_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(format!(
            "days must be between {MIN_EXTEND_DAYS} and {MAX_EXTEND_DAYS}, got {days}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_email() {
        assert!(validate_email("user@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn first_name_bounds() {
        assert!(validate_first_name("Alex").is_ok());
        assert!(validate_first_name("   ").is_err());
        assert!(validate_first_name(&"x".repeat(MAX_FIRST_NAME_LEN)).is_ok());
        assert!(validate_first_name(&"x".repeat(MAX_FIRST_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn extend_days_range() {
        assert!(validate_extend_days(1).is_ok());
        assert!(validate_extend_days(365).is_ok());
        assert!(validate_extend_days(0).is_err());
        assert!(validate_extend_days(366).is_err());
    }
}
