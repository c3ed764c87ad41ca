//! Classification of analysis service failures.

use planovate_core::Error;

/// Why an analysis call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// The service rejected the images or form fields.
    RejectedInput,
    /// The endpoint or a referenced resource does not exist.
    NotFound,
    /// Too many requests.
    RateLimited,
    /// The service failed while analyzing.
    ServerError,
    /// No response was received.
    Unreachable,
    /// Unknown error.
    Unknown,
}

impl AnalysisStatus {
    /// Determine the failure class from an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 413 | 415 | 422 => Self::RejectedInput,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Classify a core analysis error.
    pub fn of(error: &Error) -> Option<Self> {
        match error {
            Error::Analysis {
                status: Some(code), ..
            } => Some(Self::from_status(*code)),
            Error::Analysis { status: None, .. } => Some(Self::Unreachable),
            _ => None,
        }
    }

    /// Check if this failure is worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::Unreachable
        )
    }
}

/// Build an analysis error from a non-success response.
///
/// `detail` is the service-provided message when one was available.
pub fn to_analysis_error(status: u16, reason: &str, detail: Option<String>) -> Error {
    let detail = detail
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("Analysis failed: {}", reason));
    Error::Analysis {
        status: Some(status),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_400() {
        assert_eq!(AnalysisStatus::from_status(400), AnalysisStatus::RejectedInput);
    }

    #[test]
    fn test_status_from_422() {
        assert_eq!(AnalysisStatus::from_status(422), AnalysisStatus::RejectedInput);
    }

    #[test]
    fn test_status_from_429() {
        assert_eq!(AnalysisStatus::from_status(429), AnalysisStatus::RateLimited);
    }

    #[test]
    fn test_status_from_502() {
        assert_eq!(AnalysisStatus::from_status(502), AnalysisStatus::ServerError);
    }

    #[test]
    fn test_status_from_unknown() {
        assert_eq!(AnalysisStatus::from_status(418), AnalysisStatus::Unknown);
    }

    #[test]
    fn test_retryable() {
        assert!(AnalysisStatus::RateLimited.is_retryable());
        assert!(AnalysisStatus::ServerError.is_retryable());
        assert!(AnalysisStatus::Unreachable.is_retryable());
        assert!(!AnalysisStatus::RejectedInput.is_retryable());
        assert!(!AnalysisStatus::NotFound.is_retryable());
    }

    #[test]
    fn test_of_transport_failure() {
        let err = Error::Analysis {
            status: None,
            detail: "connection refused".to_string(),
        };
        assert_eq!(AnalysisStatus::of(&err), Some(AnalysisStatus::Unreachable));
        assert_eq!(AnalysisStatus::of(&Error::Superseded), None);
    }

    #[test]
    fn test_to_analysis_error_prefers_detail() {
        let err = to_analysis_error(400, "Bad Request", Some("Unsupported file type".into()));
        assert_eq!(err.to_string(), "Analysis error: Unsupported file type");
    }

    #[test]
    fn test_to_analysis_error_generic_fallback() {
        let err = to_analysis_error(500, "Internal Server Error", None);
        assert_eq!(
            err.to_string(),
            "Analysis error: Analysis failed: Internal Server Error"
        );
        match err {
            Error::Analysis { status, .. } => assert_eq!(status, Some(500)),
            _ => panic!("Expected Analysis error"),
        }
    }
}
