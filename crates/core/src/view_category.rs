//! View category constants and validation functions.
//!
//! Categories group a board's saved views. They are either `system`
//! (board defaults) or `custom` (created by a user). A view with no
//! membership row, or whose membership points at
//! [`UNCATEGORIZED_CATEGORY_ID`], is uncategorized.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Category type for board-provided defaults.
pub const CATEGORY_TYPE_SYSTEM: &str = "system";

/// Category type for user-created categories.
pub const CATEGORY_TYPE_CUSTOM: &str = "custom";

/// All valid category types.
pub const VALID_CATEGORY_TYPES: &[&str] = &[CATEGORY_TYPE_SYSTEM, CATEGORY_TYPE_CUSTOM];

/// Reserved category id meaning "no category". Never a real row.
pub const UNCATEGORIZED_CATEGORY_ID: &str = "";

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Whether `category_id` is the reserved uncategorized sentinel.
pub fn is_uncategorized(category_id: &str) -> bool {
    category_id == UNCATEGORIZED_CATEGORY_ID
}

/// Validate that the category type is one of the allowed values.
pub fn validate_category_type(category_type: &str) -> Result<(), String> {
    if VALID_CATEGORY_TYPES.contains(&category_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid view category type '{category_type}'. Must be one of: {}",
            VALID_CATEGORY_TYPES.join(", ")
        ))
    }
}

/// Validate a category name. The name is expected to be trimmed already.
pub fn validate_category_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("View category name is required".to_string());
    }
    Ok(())
}

/// Validate a required identifier field (`id`, `user_id`, `board_id`, ...).
pub fn validate_required_id(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("View category {field} is required"))
    } else {
        Ok(())
    }
}

/// Validate the full set of fields of a category about to be stored.
///
/// `id` and `name` must already be trimmed. Rejecting an empty `id` also
/// keeps the uncategorized sentinel from ever becoming a real row.
pub fn validate_category(
    id: &str,
    name: &str,
    user_id: &str,
    board_id: &str,
    category_type: &str,
) -> Result<(), String> {
    validate_required_id("id", id)?;
    validate_category_name(name)?;
    validate_required_id("user id", user_id)?;
    validate_required_id("board id", board_id)?;
    validate_category_type(category_type)
}

/// Validate the list of view ids passed to a categorize call.
pub fn validate_view_ids(view_ids: &[String]) -> Result<(), String> {
    if view_ids.is_empty() {
        return Err("At least one view id is required".to_string());
    }
    if view_ids.iter().any(|v| v.trim().is_empty()) {
        return Err("View ids must not be empty".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_category_type ---------------------------------------------

    #[test]
    fn valid_category_types_accepted() {
        assert!(validate_category_type("system").is_ok());
        assert!(validate_category_type("custom").is_ok());
    }

    #[test]
    fn invalid_category_type_rejected() {
        let result = validate_category_type("shared");
        assert!(result.unwrap_err().contains("Invalid view category type"));
    }

    #[test]
    fn category_type_is_case_sensitive() {
        assert!(validate_category_type("Custom").is_err());
    }

    // -- validate_category_name ---------------------------------------------

    #[test]
    fn empty_name_rejected() {
        assert!(validate_category_name("").is_err());
    }

    #[test]
    fn long_name_accepted() {
        let name = "n".repeat(500);
        assert!(validate_category_name(&name).is_ok());
        assert!(validate_category("c1", &name, "u1", "b1", "custom").is_ok());
    }

    // -- validate_category --------------------------------------------------

    #[test]
    fn complete_category_accepted() {
        assert!(validate_category("c1", "Reports", "u1", "b1", "custom").is_ok());
    }

    #[test]
    fn sentinel_id_cannot_be_stored() {
        let err = validate_category(UNCATEGORIZED_CATEGORY_ID, "Reports", "u1", "b1", "custom")
            .unwrap_err();
        assert!(err.contains("id is required"));
    }

    #[test]
    fn missing_owner_or_board_rejected() {
        assert!(validate_category("c1", "Reports", "", "b1", "custom").is_err());
        assert!(validate_category("c1", "Reports", "u1", "  ", "custom").is_err());
    }

    // -- view ids / sentinel ------------------------------------------------

    #[test]
    fn view_ids_must_be_present() {
        assert!(validate_view_ids(&[]).is_err());
        assert!(validate_view_ids(&["".to_string()]).is_err());
        assert!(validate_view_ids(&["v1".to_string()]).is_ok());
    }

    #[test]
    fn sentinel_detection() {
        assert!(is_uncategorized(""));
        assert!(!is_uncategorized("c1"));
    }
}
