//! Workflow configuration.

use planovate_core::defaults;

/// Configuration for the workflow controller.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    /// Smallest user budget accepted at commit; anything lower falls back
    /// to the analysis estimate.
    pub min_budget: f64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            min_budget: defaults::MIN_BUDGET,
        }
    }
}

impl WorkflowConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `PLANOVATE_MIN_BUDGET` | `15000` | Minimum accepted user budget |
    pub fn from_env() -> Self {
        let min_budget = std::env::var(defaults::ENV_MIN_BUDGET)
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(defaults::MIN_BUDGET);

        Self { min_budget }
    }

    pub fn with_min_budget(mut self, min_budget: f64) -> Self {
        self.min_budget = min_budget;
        self
    }
}
