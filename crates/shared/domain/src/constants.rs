//! Domain-level constants.
//!
//! These constants define the account validation rules. The HTTP request
//! validators check against them, counting UTF-16 code units.

// =============================================================================
// Validation
// =============================================================================

/// Minimum display name length
pub const MIN_NAME_LENGTH: usize = 1;

/// Maximum display name length
pub const MAX_NAME_LENGTH: usize = 100;

/// Minimum password length for new passwords
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length for new passwords
pub const MAX_PASSWORD_LENGTH: usize = 32;

// =============================================================================
// Messages
// =============================================================================

/// Confirmation returned after a successful password change
pub const PASSWORD_CHANGED_MESSAGE: &str = "Password successfully changed";
