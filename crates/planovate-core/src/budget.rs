//! Final budget resolution at commit time.

use tracing::debug;

/// Resolve the integer budget recorded on a project.
///
/// Resolution order:
/// 1. The user's budget, if present and at least `min_budget`
/// 2. The analysis estimate
/// 3. `None`
///
/// Both candidates are rounded to the nearest integer. Non-finite values are
/// treated as absent.
pub fn resolve_budget(
    user_budget: Option<f64>,
    estimated_cost: Option<f64>,
    min_budget: f64,
) -> Option<i64> {
    if let Some(budget) = user_budget.filter(|b| b.is_finite()) {
        if budget >= min_budget {
            debug!(budget, "Using user-supplied budget");
            return Some(budget.round() as i64);
        }
        debug!(
            budget,
            min_budget, "User budget below minimum, falling back to estimate"
        );
    }

    match estimated_cost.filter(|e| e.is_finite()) {
        Some(estimate) => {
            debug!(estimate, "Using analysis estimate as budget");
            Some(estimate.round() as i64)
        }
        None => None,
    }
}
