//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest display name accepted at registration.
pub const MAX_NAME_LENGTH: usize = 32;

/// Validates that a player name fits in a cookie without escaping.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Alice")      // Ok
/// validate_player_name("al-ice_2.0") // Ok
/// validate_player_name("Alice Doe")  // Err - space
/// validate_player_name("")           // Err - empty
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let length = name.chars().count();
    if length == 0 || length > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be 1 to {MAX_NAME_LENGTH} characters (got {length})").into(),
        );
        return Err(err);
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        let mut err = ValidationError::new("player_name_format");
        err.message =
            Some("Player name may only contain ASCII letters, digits, '-', '_' and '.'".into());
        return Err(err);
    }

    Ok(())
}
