//! Post field validation

use super::ValidationError;

const MIN_TITLE_LEN: usize = 3;
const MAX_TITLE_LEN: usize = 100;
const MIN_CONTENT_LEN: usize = 10;

/// Validated post title (3-100 characters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let len = trimmed.chars().count();

        if len == 0 {
            return Err(ValidationError::Empty { field: "title" });
        }
        if len < MIN_TITLE_LEN {
            return Err(ValidationError::TooShort {
                field: "title",
                min: MIN_TITLE_LEN,
            });
        }
        if len > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated post body (at least 10 characters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let len = trimmed.chars().count();

        if len == 0 {
            return Err(ValidationError::Empty { field: "content" });
        }
        if len < MIN_CONTENT_LEN {
            return Err(ValidationError::TooShort {
                field: "content",
                min: MIN_CONTENT_LEN,
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
    fn title_bounds() {
        assert!(PostTitle::new("abc").is_ok());
        assert!(PostTitle::new(&"t".repeat(100)).is_ok());

        let err = PostTitle::new("ab").unwrap_err();
        assert!(matches!(err, ValidationError::TooShort { min: 3, .. }));

        let err = PostTitle::new(&"t".repeat(101)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 100, .. }));
    }

    #[test]
    fn content_minimum() {
        assert!(PostContent::new("0123456789").is_ok());

        let err = PostContent::new("too short").unwrap_err();
        assert!(matches!(err, ValidationError::TooShort { min: 10, .. }));
    }

    #[test]
    fn empty_fields() {
        assert!(matches!(
            PostTitle::new("").unwrap_err(),
            ValidationError::Empty { field: "title" }
        ));
        assert!(matches!(
            PostContent::new("  ").unwrap_err(),
            ValidationError::Empty { field: "content" }
        ));
    }
}
