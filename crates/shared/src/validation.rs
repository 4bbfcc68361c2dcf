//! Common validation utilities for entry and team payloads.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum length for the short area label on an entry.
pub const MAX_AREA_LENGTH: usize = 100;

/// Maximum length for a team name.
pub const MAX_TEAM_NAME_LENGTH: usize = 120;

lazy_static! {
    static ref LINK_RE: Regex =
        Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("link regex is valid");
}

/// Validates that time saved per year is non-negative.
pub fn validate_time_saved(hours: i64) -> Result<(), ValidationError> {
    if hours >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_saved_range");
        err.message = Some("Time saved per year must be non-negative".into());
        Err(err)
    }
}

/// Validates that an entry link is an http(s) URL.
pub fn validate_link(link: &str) -> Result<(), ValidationError> {
    if LINK_RE.is_match(link) {
        Ok(())
    } else {
        let mut err = ValidationError::new("link_format");
        err.message = Some("Link must be an http or https URL".into());
        Err(err)
    }
}

/// Validates password strength: at least 8 characters with one uppercase
/// letter, one lowercase letter, and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "Password must be at least 8 characters with uppercase, lowercase, and a digit".into(),
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_time_saved() {
        assert!(validate_time_saved(0).is_ok());
        assert!(validate_time_saved(2000).is_ok());
        assert!(validate_time_saved(-1).is_err());
    }

    #[test]
    fn test_validate_time_saved_error_message() {
        let err = validate_time_saved(-10).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Time saved per year must be non-negative"
        );
    }

    #[test]
    fn test_validate_link_accepts_http_and_https() {
        assert!(validate_link("https://wiki.example.com/idea/42").is_ok());
        assert!(validate_link("http://example.com").is_ok());
    }

    #[test]
    fn test_validate_link_rejects_other_schemes() {
        assert!(validate_link("ftp://example.com").is_err());
        assert!(validate_link("javascript:alert(1)").is_err());
        assert!(validate_link("example.com").is_err());
        assert!(validate_link("").is_err());
    }

    #[test]
    fn test_validate_link_rejects_whitespace() {
        assert!(validate_link("https://example.com/a b").is_err());
    }

    #[test]
    fn test_password_strength_ok() {
        assert!(validate_password_strength("Sw4rmSecure").is_ok());
    }

    #[test]
    fn test_password_strength_too_short() {
        assert!(validate_password_strength("Ab1").is_err());
    }

    #[test]
    fn test_password_strength_missing_classes() {
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1").is_err());
        assert!(validate_password_strength("NoDigitsHere").is_err());
    }

    #[test]
    fn test_password_strength_unicode_counts_chars() {
        // 8 unicode chars with required classes
        assert!(validate_password_strength("Päss1wör").is_ok());
    }
}
