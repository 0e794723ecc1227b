//! Sort allow-lists
//!
//! These enums are the single source of truth for what may appear in an
//! ORDER BY clause. Handlers parse raw query strings into them, rejecting
//! anything else with a 400, and repositories accept only the enum — so no
//! raw user input is ever interpolated into SQL.

use super::ValidationError;

/// Sortable user columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortField {
    Id,
    Username,
    Email,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl UserSortField {
    /// Parse a `sort_by` query value. Absent means the default ordering.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        match raw {
            "id" => Ok(Self::Id),
            "username" => Ok(Self::Username),
            "email" => Ok(Self::Email),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            other => Err(ValidationError::InvalidVariant {
                field: "sort_by",
                value: other.to_owned(),
            }),
        }
    }

    /// Column name for ORDER BY interpolation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Username => "username",
            Self::Email => "email",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sortable post columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSortField {
    Id,
    Title,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl PostSortField {
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        match raw {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            other => Err(ValidationError::InvalidVariant {
                field: "sort_by",
                value: other.to_owned(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse an `order` query value, case-insensitively. Absent means DESC.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        if raw.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(ValidationError::InvalidVariant {
                field: "order",
                value: raw.to_owned(),
            })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_means_default() {
        assert_eq!(UserSortField::parse(None).unwrap(), UserSortField::CreatedAt);
        assert_eq!(PostSortField::parse(None).unwrap(), PostSortField::CreatedAt);
        assert_eq!(SortOrder::parse(None).unwrap(), SortOrder::Desc);
    }

    #[test]
    fn known_fields_resolve() {
        assert_eq!(
            UserSortField::parse(Some("username")).unwrap().as_str(),
            "username"
        );
        assert_eq!(PostSortField::parse(Some("title")).unwrap().as_str(), "title");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = UserSortField::parse(Some("password")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "sort_by", .. }));

        // A column that exists on users but not posts must still be rejected
        assert!(PostSortField::parse(Some("email")).is_err());

        // Injection attempts never resolve
        assert!(UserSortField::parse(Some("id; DROP TABLE users")).is_err());
    }

    #[test]
    fn order_is_case_insensitive() {
        assert_eq!(SortOrder::parse(Some("asc")).unwrap(), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("ASC")).unwrap(), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("Desc")).unwrap(), SortOrder::Desc);
        assert!(SortOrder::parse(Some("random")).is_err());
    }
}
