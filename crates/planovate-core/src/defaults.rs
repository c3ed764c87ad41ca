//! Centralized default constants for planovate.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers, and environment variable names live here alongside them.

// =============================================================================
// BUDGET
// =============================================================================

/// Minimum user-supplied budget that is honoured at commit time.
/// Smaller budgets fall back to the analysis estimate.
pub const MIN_BUDGET: f64 = 15_000.0;

/// Currency assumed when the analysis service omits one.
pub const CURRENCY: &str = "INR";

// =============================================================================
// ANALYSIS SERVICE
// =============================================================================

/// Default analysis service base URL.
pub const ANALYSIS_URL: &str = "http://localhost:8000";

/// Path of the analysis endpoint, relative to the base URL.
pub const ANALYZE_PATH: &str = "/analyze";

/// Path of the analysis health endpoint, relative to the base URL.
pub const ANALYSIS_HEALTH_PATH: &str = "/api/health";

/// Timeout for analysis requests in seconds. Vision models are slow.
pub const ANALYSIS_TIMEOUT_SECS: u64 = 120;

/// Timeout for health checks in seconds.
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// STORAGE COLLABORATOR
// =============================================================================

/// Timeout for storage requests in seconds.
pub const STORE_TIMEOUT_SECS: u64 = 30;

/// Identifier placeholder asking the storage service to generate an ID.
pub const UNIQUE_ID: &str = "unique()";

/// Preview thumbnail width in pixels.
pub const PREVIEW_WIDTH: u32 = 400;

/// Preview thumbnail height in pixels.
pub const PREVIEW_HEIGHT: u32 = 300;

/// Preview thumbnail JPEG quality.
pub const PREVIEW_QUALITY: u8 = 80;

// =============================================================================
// DISPLAY PLACEHOLDERS
// =============================================================================

pub const PLACEHOLDER_BUDGET: &str = "N/A";
pub const PLACEHOLDER_DESCRIPTION: &str = "No description provided";
pub const PLACEHOLDER_TITLE: &str = "Untitled project";
pub const PLACEHOLDER_CITY: &str = "Unknown location";
pub const PLACEHOLDER_DATE: &str = "Unknown date";

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

pub const ENV_ANALYSIS_URL: &str = "PLANOVATE_ANALYSIS_URL";
pub const ENV_ANALYSIS_TIMEOUT_SECS: &str = "PLANOVATE_ANALYSIS_TIMEOUT_SECS";
pub const ENV_STORE_ENDPOINT: &str = "PLANOVATE_STORE_ENDPOINT";
pub const ENV_STORE_PROJECT_ID: &str = "PLANOVATE_STORE_PROJECT_ID";
pub const ENV_STORE_DATABASE_ID: &str = "PLANOVATE_STORE_DATABASE_ID";
pub const ENV_STORE_TABLE_ID: &str = "PLANOVATE_STORE_TABLE_ID";
pub const ENV_STORE_BUCKET_ID: &str = "PLANOVATE_STORE_BUCKET_ID";
pub const ENV_STORE_API_KEY: &str = "PLANOVATE_STORE_API_KEY";
pub const ENV_STORE_TIMEOUT_SECS: &str = "PLANOVATE_STORE_TIMEOUT_SECS";
pub const ENV_MIN_BUDGET: &str = "PLANOVATE_MIN_BUDGET";
pub const ENV_USER_ID: &str = "PLANOVATE_USER_ID";
pub const ENV_USER_NAME: &str = "PLANOVATE_USER_NAME";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_budget_matches_form_minimum() {
        assert_eq!(MIN_BUDGET, 15_000.0);
    }

    #[test]
    fn test_paths_are_rooted() {
        assert!(ANALYZE_PATH.starts_with('/'));
        assert!(ANALYSIS_HEALTH_PATH.starts_with('/'));
    }
}
