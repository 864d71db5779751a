//! Typed error hierarchy for the upload orchestration client.
//!
//! Two enums cover the two layers:
//! - `ApiError`: transport, status, and response-decode failures from the
//!   HTTP layer
//! - `UploadError`: the workflow taxonomy surfaced to the host UI, one
//!   variant per failure class with its user-facing wording

use thiserror::Error;

/// Fallback shown when a transfer fails without a backend message.
pub(crate) const TRANSFER_FALLBACK: &str = "Failed to upload project. Please try again.";

/// Fallback shown when team creation fails without a backend message.
pub(crate) const TEAM_CREATION_FALLBACK: &str = "Failed to create team";

/// Fallback shown when the analysis job reports failure without a message.
pub(crate) const ANALYSIS_FALLBACK: &str = "Analysis failed. Please try again.";

/// Shown when a status poll dies on a transport or decode problem.
pub(crate) const POLL_TRANSPORT_FALLBACK: &str =
    "Failed to check analysis status. Please refresh the page.";

/// Errors from the HTTP layer, before workflow classification.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error")]
    Transport(#[source] reqwest::Error),

    #[error("Request timeout - please check your connection")]
    Timeout(#[source] reqwest::Error),

    #[error("{}", .message.as_deref().unwrap_or("Request failed"))]
    Status {
        status: reqwest::StatusCode,
        /// Backend-supplied `{ message }` body, when one was present.
        message: Option<String>,
    },

    #[error("Unexpected response shape from {endpoint}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// The backend's own message, if the failure carried one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Workflow failures, one variant per class. `Display` is the exact string
/// shown in the host UI's single message region.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Pre-flight form rejection. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// Team creation failed; backend message verbatim, never retried.
    #[error("{0}")]
    TeamCreation(String),

    /// The transfer itself failed (non-2xx, network, or the 60 s ceiling).
    #[error("{0}")]
    Transfer(String),

    /// The backend accepted the upload but reported the analysis failed.
    #[error("{0}")]
    AnalysisFailed(String),

    /// The client stopped watching after the attempt budget; the analysis
    /// may still be running.
    #[error("Analysis is taking longer than expected. Please check your project later.")]
    AnalysisTimedOut,

    /// A status poll died on transport; distinct from a reported failure.
    #[error("{0}")]
    PollTransport(String),
}

impl UploadError {
    pub(crate) fn team_creation_from(err: ApiError) -> Self {
        let message = err
            .backend_message()
            .unwrap_or(TEAM_CREATION_FALLBACK)
            .to_owned();
        UploadError::TeamCreation(message)
    }

    pub(crate) fn transfer_from(err: ApiError) -> Self {
        let message = err
            .backend_message()
            .unwrap_or(TRANSFER_FALLBACK)
            .to_owned();
        UploadError::Transfer(message)
    }

    pub(crate) fn poll_from(err: ApiError) -> Self {
        let message = err
            .backend_message()
            .unwrap_or(POLL_TRANSPORT_FALLBACK)
            .to_owned();
        UploadError::PollTransport(message)
    }

    pub(crate) fn analysis_failed(backend_error: Option<String>) -> Self {
        UploadError::AnalysisFailed(backend_error.unwrap_or_else(|| ANALYSIS_FALLBACK.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16, message: Option<&str>) -> ApiError {
        ApiError::Status {
            status: reqwest::StatusCode::from_u16(status).unwrap(),
            message: message.map(str::to_owned),
        }
    }

    #[test]
    fn status_error_displays_backend_message() {
        let err = status_error(400, Some("Team name already taken"));
        assert_eq!(err.to_string(), "Team name already taken");
    }

    #[test]
    fn status_error_without_body_uses_generic_wording() {
        let err = status_error(502, None);
        assert_eq!(err.to_string(), "Request failed");
    }

    #[test]
    fn team_creation_surfaces_backend_message_verbatim() {
        let err = UploadError::team_creation_from(status_error(409, Some("Duplicate team")));
        match &err {
            UploadError::TeamCreation(msg) => assert_eq!(msg, "Duplicate team"),
            _ => panic!("Expected TeamCreation"),
        }
    }

    #[test]
    fn team_creation_falls_back_without_backend_message() {
        let err = UploadError::team_creation_from(status_error(500, None));
        assert_eq!(err.to_string(), TEAM_CREATION_FALLBACK);
    }

    #[test]
    fn transfer_fallback_message() {
        let err = UploadError::transfer_from(status_error(500, None));
        assert_eq!(err.to_string(), "Failed to upload project. Please try again.");
    }

    #[test]
    fn analysis_failed_uses_backend_error_when_present() {
        let err = UploadError::analysis_failed(Some("Unsupported language".into()));
        assert_eq!(err.to_string(), "Unsupported language");
    }

    #[test]
    fn analysis_failed_fallback() {
        let err = UploadError::analysis_failed(None);
        assert_eq!(err.to_string(), "Analysis failed. Please try again.");
    }

    #[test]
    fn timeout_wording_does_not_claim_backend_failure() {
        let msg = UploadError::AnalysisTimedOut.to_string();
        assert!(msg.contains("taking longer than expected"));
        assert!(!msg.to_lowercase().contains("failed"));
    }

    #[test]
    fn poll_transport_is_distinct_from_analysis_failure() {
        let transport = UploadError::poll_from(status_error(500, None));
        let analysis = UploadError::analysis_failed(None);
        assert_ne!(transport.to_string(), analysis.to_string());
        assert!(transport.to_string().contains("refresh"));
    }
}
