//! Core data models for planovate.
//!
//! These types are shared across all planovate crates and represent
//! the renovation workflow's domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{Error, Result};

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Opaque user identifier supplied by the authentication collaborator.
    UserId
);
string_id!(
    /// Opaque, stable project record identifier assigned by the repository.
    ProjectId
);
string_id!(
    /// Opaque handle for an uploaded binary payload.
    AssetId
);

// =============================================================================
// SESSION
// =============================================================================

/// The signed-in user, passed explicitly into the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: UserId,
    pub display_name: Option<String>,
}

impl UserSession {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

// =============================================================================
// INPUT TYPES
// =============================================================================

/// A binary image payload with the metadata needed to upload it.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImagePayload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Image bytes are never worth dumping into logs.
impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Which of the two project photos an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetRole {
    Current,
    Ideal,
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current image"),
            Self::Ideal => write!(f, "ideal image"),
        }
    }
}

/// A required input that was not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    CurrentImage,
    IdealImage,
    Title,
    City,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentImage => write!(f, "current image"),
            Self::IdealImage => write!(f, "ideal image"),
            Self::Title => write!(f, "title"),
            Self::City => write!(f, "city"),
        }
    }
}

/// Everything the user has entered for a project so far.
///
/// This is the form state carried by the `Collecting` phase. It survives a
/// re-analysis so images do not have to be selected again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectInput {
    pub current_image: Option<ImagePayload>,
    pub ideal_image: Option<ImagePayload>,
    pub budget: Option<f64>,
    pub city: Option<String>,
    pub title: Option<String>,
}

impl ProjectInput {
    pub fn new(current_image: Option<ImagePayload>, ideal_image: Option<ImagePayload>) -> Self {
        Self {
            current_image,
            ideal_image,
            ..Default::default()
        }
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Fields that must be present before analysis can be requested.
    pub fn missing_for_analysis(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if !has_image(&self.current_image) {
            missing.push(MissingField::CurrentImage);
        }
        if !has_image(&self.ideal_image) {
            missing.push(MissingField::IdealImage);
        }
        missing
    }

    /// Fields that must be present before a project can be saved.
    pub fn missing_for_commit(&self) -> Vec<MissingField> {
        let mut missing = self.missing_for_analysis();
        if !has_text(&self.title) {
            missing.push(MissingField::Title);
        }
        if !has_text(&self.city) {
            missing.push(MissingField::City);
        }
        missing
    }

    /// Validate and build the request sent to the analysis service.
    pub fn to_analysis_request(&self) -> Result<AnalysisRequest> {
        match (&self.current_image, &self.ideal_image) {
            (Some(current), Some(ideal)) if !current.is_empty() && !ideal.is_empty() => {
                Ok(AnalysisRequest {
                    current_image: current.clone(),
                    ideal_image: ideal.clone(),
                    budget: self.budget.filter(|b| b.is_finite() && *b > 0.0),
                    location: non_blank(&self.city),
                    title: non_blank(&self.title),
                })
            }
            _ => Err(Error::Validation {
                missing: self.missing_for_analysis(),
            }),
        }
    }
}

fn has_image(image: &Option<ImagePayload>) -> bool {
    image.as_ref().is_some_and(|i| !i.is_empty())
}

fn has_text(text: &Option<String>) -> bool {
    text.as_ref().is_some_and(|t| !t.trim().is_empty())
}

fn non_blank(text: &Option<String>) -> Option<String> {
    text.as_ref()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// A validated request for the remote analysis service.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub current_image: ImagePayload,
    pub ideal_image: ImagePayload,
    pub budget: Option<f64>,
    pub location: Option<String>,
    pub title: Option<String>,
}

// =============================================================================
// ANALYSIS RESULT TYPES
// =============================================================================

/// Task priority in a renovation plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parse a priority label. Unrecognised labels rank as `Low`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Capitalized label for human-readable output.
    pub fn title(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// One line of a renovation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub task: String,
    pub priority: Priority,
    pub cost: f64,
    #[serde(default)]
    pub description: String,
}

/// Structured result returned by the analysis service.
///
/// Plan order is significant and is never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Condition score in `[0.0, 1.0]`; higher means more work needed.
    pub score: f64,
    pub estimated_cost: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Whether the plan was fitted to a supplied budget.
    #[serde(default)]
    pub optimized: bool,
    #[serde(default)]
    pub plan: Vec<PlanItem>,
    #[serde(default)]
    pub explanation: String,
}

fn default_currency() -> String {
    crate::defaults::CURRENCY.to_string()
}

impl AnalysisResult {
    /// Check the invariants a well-formed analysis result must satisfy.
    pub fn validate(&self) -> Result<()> {
        if !self.score.is_finite() || !(0.0..=1.0).contains(&self.score) {
            return Err(Error::malformed_analysis(format!(
                "score {} is outside [0, 1]",
                self.score
            )));
        }
        if !self.estimated_cost.is_finite() || self.estimated_cost < 0.0 {
            return Err(Error::malformed_analysis(format!(
                "estimated cost {} is negative",
                self.estimated_cost
            )));
        }
        for (index, item) in self.plan.iter().enumerate() {
            if item.task.trim().is_empty() {
                return Err(Error::malformed_analysis(format!(
                    "plan item {} has an empty task label",
                    index + 1
                )));
            }
            if !item.cost.is_finite() || item.cost < 0.0 {
                return Err(Error::malformed_analysis(format!(
                    "plan item {} has negative cost {}",
                    index + 1,
                    item.cost
                )));
            }
        }
        Ok(())
    }

    /// Plan item costs, each rounded to the nearest whole unit.
    pub fn rounded_item_costs(&self) -> Vec<i64> {
        self.plan.iter().map(|item| item.cost.round() as i64).collect()
    }

    /// Sum of the rounded plan item costs, so displayed items add up to it.
    pub fn plan_total(&self) -> i64 {
        self.rounded_item_costs().iter().sum()
    }
}

// =============================================================================
// PROJECT RECORD TYPES
// =============================================================================

/// A persisted renovation project.
///
/// Decoding is lenient: storage rows may use either the collaborator's
/// column names (`$id`, `Title`, `Budget`, ...) or snake_case, and every
/// display field tolerates absence or an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(alias = "$id")]
    pub id: ProjectId,
    #[serde(
        default,
        alias = "Title",
        deserialize_with = "lenient::string"
    )]
    pub title: Option<String>,
    #[serde(default, alias = "City", deserialize_with = "lenient::string")]
    pub city: Option<String>,
    #[serde(
        default,
        alias = "CurrentPhoto",
        deserialize_with = "lenient::asset"
    )]
    pub current_photo: Option<AssetId>,
    #[serde(
        default,
        alias = "Idealphoto",
        alias = "IdealPhoto",
        deserialize_with = "lenient::asset"
    )]
    pub ideal_photo: Option<AssetId>,
    #[serde(default, alias = "Budget", deserialize_with = "lenient::budget")]
    pub budget: Option<i64>,
    #[serde(
        default,
        alias = "Description",
        deserialize_with = "lenient::string"
    )]
    pub description: Option<String>,
    #[serde(default, alias = "UserId", deserialize_with = "lenient::user")]
    pub user_id: Option<UserId>,
    #[serde(
        default,
        alias = "$createdAt",
        deserialize_with = "lenient::timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "$updatedAt",
        deserialize_with = "lenient::timestamp"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for creating a project record.
///
/// Both asset identifiers are required by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProjectRequest {
    pub title: String,
    pub city: String,
    pub current_photo: AssetId,
    pub ideal_photo: AssetId,
    pub budget: Option<i64>,
    pub description: String,
    pub user_id: UserId,
}

/// Raw, shape-unspecified response of a repository list call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawProjectList(pub serde_json::Value);

impl From<serde_json::Value> for RawProjectList {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

// =============================================================================
// WORKFLOW PHASE
// =============================================================================

/// Observable phase of a workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowPhase {
    Collecting,
    Analyzing,
    Reviewing,
    Committing,
    Done,
}

impl WorkflowPhase {
    /// Busy phases reject new analysis or commit requests.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Analyzing | Self::Committing)
    }
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collecting => write!(f, "collecting"),
            Self::Analyzing => write!(f, "analyzing"),
            Self::Reviewing => write!(f, "reviewing"),
            Self::Committing => write!(f, "committing"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Deserializers that turn unexpected field shapes into `None`.
mod lenient {
    use super::{AssetId, UserId};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn asset<'de, D: Deserializer<'de>>(d: D) -> Result<Option<AssetId>, D::Error> {
        Ok(string(d)?.map(AssetId))
    }

    pub fn user<'de, D: Deserializer<'de>>(d: D) -> Result<Option<UserId>, D::Error> {
        Ok(string(d)?.map(UserId))
    }

    pub fn budget<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let amount = match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
            _ => None,
        };
        Ok(amount.filter(|a| *a >= 0))
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image(name: &str) -> ImagePayload {
        ImagePayload::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    #[test]
    fn test_missing_for_analysis_names_each_field() {
        let input = ProjectInput::default();
        assert_eq!(
            input.missing_for_analysis(),
            vec![MissingField::CurrentImage, MissingField::IdealImage]
        );

        let input = ProjectInput::new(None, Some(image("ideal.jpg")));
        assert_eq!(input.missing_for_analysis(), vec![MissingField::CurrentImage]);
    }

    #[test]
    fn test_empty_image_counts_as_missing() {
        let empty = ImagePayload::new("blank.jpg", "image/jpeg", Vec::new());
        let input = ProjectInput::new(Some(image("current.jpg")), Some(empty));
        assert_eq!(input.missing_for_analysis(), vec![MissingField::IdealImage]);
    }

    #[test]
    fn test_missing_for_commit_includes_title_and_city() {
        let input = ProjectInput::new(Some(image("a.jpg")), Some(image("b.jpg"))).with_city("  ");
        assert_eq!(
            input.missing_for_commit(),
            vec![MissingField::Title, MissingField::City]
        );
    }

    #[test]
    fn test_to_analysis_request_passes_metadata_through() {
        let input = ProjectInput::new(Some(image("a.jpg")), Some(image("b.jpg")))
            .with_budget(20000.5)
            .with_city(" Pune ")
            .with_title("Kitchen");
        let request = input.to_analysis_request().unwrap();
        assert_eq!(request.budget, Some(20000.5));
        assert_eq!(request.location.as_deref(), Some("Pune"));
        assert_eq!(request.title.as_deref(), Some("Kitchen"));
        assert_eq!(request.current_image.file_name, "a.jpg");
    }

    #[test]
    fn test_to_analysis_request_drops_non_positive_budget() {
        for budget in [0.0, -500.0, f64::NAN] {
            let input =
                ProjectInput::new(Some(image("a.jpg")), Some(image("b.jpg"))).with_budget(budget);
            let request = input.to_analysis_request().unwrap();
            assert_eq!(request.budget, None, "budget {}", budget);
        }
    }

    #[test]
    fn test_plan_total_sums_rounded_costs() {
        let mut result: AnalysisResult = serde_json::from_value(serde_json::json!({
            "score": 0.5,
            "estimated_cost": 100,
            "plan": [
                {"task": "a", "priority": "low", "cost": 10.4},
                {"task": "b", "priority": "low", "cost": 10.4}
            ]
        }))
        .unwrap();
        assert_eq!(result.rounded_item_costs(), vec![10, 10]);
        assert_eq!(result.plan_total(), 20);

        result.plan.clear();
        assert_eq!(result.plan_total(), 0);
    }

    #[test]
    fn test_to_analysis_request_rejects_missing_images() {
        let err = ProjectInput::default().to_analysis_request().unwrap_err();
        match err {
            Error::Validation { missing } => assert_eq!(missing.len(), 2),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_priority_parses_case_insensitively() {
        assert_eq!(Priority::from_label("HIGH"), Priority::High);
        assert_eq!(Priority::from_label("Medium"), Priority::Medium);
        assert_eq!(Priority::from_label("urgent"), Priority::Low);
    }

    #[test]
    fn test_analysis_result_defaults() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "score": 0.4,
            "estimated_cost": 1000,
            "plan": [{"task": "paint", "priority": "low", "cost": 1000}]
        }))
        .unwrap();
        assert_eq!(result.currency, "INR");
        assert!(!result.optimized);
        assert!(result.explanation.is_empty());
        assert_eq!(result.plan[0].description, "");
    }

    #[test]
    fn test_analysis_result_validate_rejects_out_of_range_score() {
        let result = AnalysisResult {
            score: 1.5,
            estimated_cost: 10.0,
            currency: "INR".to_string(),
            optimized: false,
            plan: vec![],
            explanation: String::new(),
        };
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_analysis_result_validate_rejects_blank_task() {
        let result = AnalysisResult {
            score: 0.5,
            estimated_cost: 10.0,
            currency: "INR".to_string(),
            optimized: false,
            plan: vec![PlanItem {
                task: " ".to_string(),
                priority: Priority::High,
                cost: 10.0,
                description: String::new(),
            }],
            explanation: String::new(),
        };
        let err = result.validate().unwrap_err();
        assert!(err.to_string().contains("empty task label"));
    }

    #[test]
    fn test_project_record_from_storage_row() {
        let record: ProjectRecord = serde_json::from_value(json!({
            "$id": "row-1",
            "Title": "Living Room",
            "City": "Mumbai",
            "CurrentPhoto": "file-a",
            "Idealphoto": "file-b",
            "Budget": 72000,
            "Description": "Needs repair.",
            "UserId": "user-9",
            "$createdAt": "2025-01-05T10:00:00.000+00:00",
            "$updatedAt": "2025-01-06T10:00:00.000+00:00"
        }))
        .unwrap();
        assert_eq!(record.id.as_str(), "row-1");
        assert_eq!(record.title.as_deref(), Some("Living Room"));
        assert_eq!(record.ideal_photo, Some(AssetId::new("file-b")));
        assert_eq!(record.budget, Some(72000));
        assert_eq!(record.user_id, Some(UserId::new("user-9")));
        assert!(record.created_at.is_some());
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn test_project_record_tolerates_missing_and_odd_fields() {
        let record: ProjectRecord = serde_json::from_value(json!({
            "id": "row-2",
            "budget": "15000.4",
            "description": null,
            "created_at": "not a date"
        }))
        .unwrap();
        assert_eq!(record.budget, Some(15000));
        assert!(record.description.is_none());
        assert!(record.created_at.is_none());
        assert!(record.title.is_none());
        assert!(record.current_photo.is_none());
    }

    #[test]
    fn test_image_payload_debug_hides_bytes() {
        let debug = format!("{:?}", image("a.jpg"));
        assert!(debug.contains("len: 3"));
        assert!(!debug.contains("255"));
    }

    #[test]
    fn test_workflow_phase_busy() {
        assert!(WorkflowPhase::Analyzing.is_busy());
        assert!(WorkflowPhase::Committing.is_busy());
        assert!(!WorkflowPhase::Reviewing.is_busy());
    }
}
