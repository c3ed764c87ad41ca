//! Structured logging schema and field name constants for planovate.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Unexpected failure with no interactive recovery |
//! | WARN  | Recoverable failure, user may retry (upload failed, orphaned assets) |
//! | INFO  | Lifecycle events, operation completions (analysis done, project saved) |
//! | DEBUG | Decision points, intermediate values (budget branch, envelope shape) |
//! | TRACE | Per-item iteration (plan items, list rows) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "analysis", "store", "workflow", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "http_client", "rest_repository", "controller", "normalizer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "analyze", "upload_asset", "create_project", "commit"
pub const OPERATION: &str = "op";

/// Monotonic workflow run counter; changes on every analysis/commit attempt.
pub const RUN_ID: &str = "run_id";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Project record identifier.
pub const PROJECT_ID: &str = "project_id";

/// Uploaded asset identifier.
pub const ASSET_ID: &str = "asset_id";

/// Asset role ("current image", "ideal image").
pub const ASSET_ROLE: &str = "asset_role";

/// Owning user identifier.
pub const USER_ID: &str = "user_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of an uploaded payload.
pub const PAYLOAD_LEN: &str = "payload_len";

/// Number of plan items in an analysis result.
pub const PLAN_ITEMS: &str = "plan_items";

/// Number of records produced by a list call.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// HTTP status code returned by a collaborator.
pub const STATUS: &str = "status";

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique() {
        let fields = [
            SUBSYSTEM, COMPONENT, OPERATION, RUN_ID, PROJECT_ID, ASSET_ID, ASSET_ROLE, USER_ID,
            DURATION_MS, PAYLOAD_LEN, PLAN_ITEMS, RESULT_COUNT, STATUS, SUCCESS, ERROR_MSG,
        ];
        let unique: HashSet<_> = fields.iter().collect();
        assert_eq!(unique.len(), fields.len());
    }

    #[test]
    fn test_operation_field_is_short() {
        assert_eq!(OPERATION, "op");
    }
}
