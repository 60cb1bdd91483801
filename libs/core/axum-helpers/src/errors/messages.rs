//! Standard error messages and codes for consistent API responses.

pub const INTERNAL_ERROR: &str = "An internal server error occurred";
pub const VALIDATION_FAILED: &str = "Request validation failed";
pub const INVALID_UUID: &str = "Invalid UUID format";
pub const NOT_FOUND_RESOURCE: &str = "Resource not found";
pub const UNAUTHORIZED: &str = "Authentication required";
pub const FORBIDDEN: &str = "Access forbidden";

// Error codes for client parsing
pub const CODE_INTERNAL: &str = "INTERNAL_ERROR";
pub const CODE_VALIDATION: &str = "VALIDATION_ERROR";
pub const CODE_UUID: &str = "INVALID_UUID";
pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
pub const CODE_UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const CODE_FORBIDDEN: &str = "FORBIDDEN";
pub const CODE_CONFLICT: &str = "CONFLICT";
pub const CODE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
