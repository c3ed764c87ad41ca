//! Mock analysis backend for deterministic testing.
//!
//! Responses are scripted up front and handed out in order; once the script
//! is exhausted the fallback response is repeated. A [`tokio::sync::Notify`]
//! gate can hold every call in flight until the test releases it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use planovate_analysis::mock::{sample_result, MockAnalysisBackend};
//!
//! let backend = MockAnalysisBackend::new()
//!     .with_failure(Some(503), "model warming up")
//!     .with_success(sample_result());
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use planovate_core::{
    AnalysisBackend, AnalysisRequest, AnalysisResult, Error, PlanItem, Priority, Result,
};
use tokio::sync::Notify;

/// One scripted analysis outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Success(AnalysisResult),
    Failure { status: Option<u16>, detail: String },
}

impl MockOutcome {
    fn into_result(self) -> Result<AnalysisResult> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failure { status, detail } => Err(Error::Analysis { status, detail }),
        }
    }
}

/// A recorded call to the mock backend.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub budget: Option<f64>,
    pub location: Option<String>,
    pub current_len: usize,
    pub ideal_len: usize,
}

/// Mock analysis backend for testing.
#[derive(Clone)]
pub struct MockAnalysisBackend {
    script: Arc<Mutex<VecDeque<MockOutcome>>>,
    fallback: MockOutcome,
    gate: Option<Arc<Notify>>,
    healthy: bool,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockAnalysisBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalysisBackend {
    /// Create a backend that always returns [`sample_result`].
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: MockOutcome::Success(sample_result()),
            gate: None,
            healthy: true,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful response.
    pub fn with_success(self, result: AnalysisResult) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(MockOutcome::Success(result));
        self
    }

    /// Queue a failed response.
    pub fn with_failure(self, status: Option<u16>, detail: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(MockOutcome::Failure {
            status,
            detail: detail.into(),
        });
        self
    }

    /// Response used once the script is exhausted.
    pub fn with_fallback(mut self, outcome: MockOutcome) -> Self {
        self.fallback = outcome;
        self
    }

    /// Hold every call until the gate is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalysisBackend for MockAnalysisBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        self.call_log.lock().unwrap().push(MockCall {
            budget: request.budget,
            location: request.location.clone(),
            current_len: request.current_image.len(),
            ideal_len: request.ideal_image.len(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone()).into_result()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy)
    }
}

/// The reference analysis result: one high-priority repaint task.
pub fn sample_result() -> AnalysisResult {
    AnalysisResult {
        score: 0.65,
        estimated_cost: 72000.0,
        currency: "INR".to_string(),
        optimized: true,
        plan: vec![PlanItem {
            task: "repaint".to_string(),
            priority: Priority::High,
            cost: 20000.0,
            description: "Repaint all walls with washable emulsion.".to_string(),
        }],
        explanation: "Needs repair.".to_string(),
    }
}
