//! Explicit parsing of listing query parameters into a typed filter.
//!
//! Absent parameters take the documented defaults; present-but-malformed
//! input is a validation error rather than a silent fallback.

use serde::Deserialize;

use super::ApiError;
use crate::constants::limits;
use crate::services::user_admin_service::UserListFilter;

/// Raw query parameters as they arrive on `GET /api/admin/users`.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<String>,
}

pub fn parse_list_query(query: ListUsersQuery) -> Result<UserListFilter, ApiError> {
    let page = parse_positive(query.page.as_deref(), "page", 1)?;
    let limit = parse_positive(query.limit.as_deref(), "limit", limits::DEFAULT_PAGE_SIZE)?;

    if limit > limits::MAX_PAGE_SIZE {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be at most {}",
            limits::MAX_PAGE_SIZE
        )));
    }

    let is_active = match query.is_active.as_deref() {
        None => None,
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(other) => {
            return Err(ApiError::validation(format!(
                "Invalid isActive: '{other}'. Must be 'true' or 'false'"
            )));
        }
    };

    let search = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let role = query.role.filter(|r| !r.is_empty());

    Ok(UserListFilter {
        page,
        limit,
        search,
        role,
        is_active,
    })
}

fn parse_positive(raw: Option<&str>, name: &str, default: u64) -> Result<u64, ApiError> {
    match raw {
        None => Ok(default),
        Some(s) => match s.parse::<u64>() {
            Ok(value) if value >= 1 => Ok(value),
            _ => Err(ApiError::validation(format!(
                "Invalid {name}: '{s}'. Must be a positive integer"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_params_take_defaults() {
        let filter = parse_list_query(ListUsersQuery::default()).unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, limits::DEFAULT_PAGE_SIZE);
        assert!(filter.search.is_none());
        assert!(filter.role.is_none());
        assert!(filter.is_active.is_none());
    }

    #[test]
    fn test_malformed_page_is_rejected() {
        let query = ListUsersQuery {
            page: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(parse_list_query(query).is_err());

        let query = ListUsersQuery {
            page: Some("0".to_string()),
            ..Default::default()
        };
        assert!(parse_list_query(query).is_err());
    }

    #[test]
    fn test_is_active_accepts_only_literals() {
        for (raw, expected) in [("true", Some(true)), ("false", Some(false))] {
            let query = ListUsersQuery {
                is_active: Some(raw.to_string()),
                ..Default::default()
            };
            assert_eq!(parse_list_query(query).unwrap().is_active, expected);
        }

        let query = ListUsersQuery {
            is_active: Some("banana".to_string()),
            ..Default::default()
        };
        assert!(parse_list_query(query).is_err());
    }

    #[test]
    fn test_limit_is_capped() {
        let query = ListUsersQuery {
            limit: Some("1000".to_string()),
            ..Default::default()
        };
        assert!(parse_list_query(query).is_err());
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let query = ListUsersQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(parse_list_query(query).unwrap().search.is_none());
    }
}
