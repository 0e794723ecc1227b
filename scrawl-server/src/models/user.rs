//! User field validation
//!
//! Username and email are checked at the API boundary; the database
//! additionally enforces uniqueness on both.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 50;

/// Pragmatic email shape: local part, '@', domain with at least one dot.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// Validated username (3-50 characters, surrounding whitespace trimmed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let len = trimmed.chars().count();

        if len == 0 {
            return Err(ValidationError::Empty { field: "username" });
        }
        if len < MIN_USERNAME_LEN {
            return Err(ValidationError::TooShort {
                field: "username",
                min: MIN_USERNAME_LEN,
            });
        }
        if len > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must be a valid email address",
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_usernames() {
        assert!(Username::new("bob").is_ok());
        assert!(Username::new("alice_rand").is_ok());
        assert!(Username::new(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn username_trims_whitespace() {
        let name = Username::new("  carol  ").unwrap();
        assert_eq!(name.as_str(), "carol");
    }

    #[test]
    fn username_length_bounds() {
        let err = Username::new("ab").unwrap_err();
        assert!(matches!(err, ValidationError::TooShort { min: 3, .. }));

        let err = Username::new(&"a".repeat(51)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 50, .. }));
    }

    #[test]
    fn rejects_empty_username() {
        let err = Username::new("   ").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn valid_emails() {
        assert!(Email::new("a@example.com").is_ok());
        assert!(Email::new("first.last@sub.domain.org").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["plainaddress", "no@dot", "two@@example.com", "spa ce@x.com"] {
            assert!(Email::new(bad).is_err(), "accepted {bad:?}");
        }
    }
}
