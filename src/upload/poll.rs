//! The analysis completion protocol: bounded, strictly sequential polling
//! of the job-status endpoint.
//!
//! Two timers run while a deferred analysis is pending: the poll cadence
//! itself and a one-shot message escalation. Both hang off a child
//! `CancellationToken` whose drop guard fires on every exit path, so no
//! terminal transition can leave a timer alive to touch state afterwards.

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::api::types::AnalysisStatus;
use crate::config::PollConfig;
use crate::errors::UploadError;
use crate::upload::state::{StateCell, UploadEvent};

/// How a completed polling loop ended, short of an error.
#[derive(Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The backend finished analysis; navigate to the report.
    Completed,
    /// The caller went away; stop without touching state further.
    Cancelled,
}

/// Poll until the job reaches a terminal state, the attempt budget runs
/// out, or the caller cancels. Exactly one status request is in flight at
/// any time.
pub async fn poll_analysis(
    api: &ApiClient,
    job_id: &str,
    cfg: &PollConfig,
    cancel: &CancellationToken,
    state: &StateCell,
) -> Result<PollOutcome, UploadError> {
    // Escalation timer: reword the status message once the delay elapses.
    // The guard cancels it on every return path below, and the caller's
    // token reaches it through the parent link.
    let escalation = cancel.child_token();
    let _escalation_guard = escalation.clone().drop_guard();
    {
        let state = state.clone();
        let delay = cfg.escalate_after;
        tokio::spawn(async move {
            tokio::select! {
                _ = escalation.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    state.apply(UploadEvent::MessageEscalated);
                }
            }
        });
    }

    let mut attempts: u32 = 0;
    loop {
        if cancel.is_cancelled() {
            return Ok(PollOutcome::Cancelled);
        }

        let resp = match api.analysis_status(job_id).await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(job_id, error = %err, "analysis status poll failed");
                return Err(UploadError::poll_from(err));
            }
        };

        match resp.analysis_status {
            AnalysisStatus::Completed if resp.project.is_some() => {
                tracing::info!(job_id, attempts, "analysis completed");
                return Ok(PollOutcome::Completed);
            }
            AnalysisStatus::Failed => {
                tracing::warn!(job_id, attempts, "analysis reported failure");
                return Err(UploadError::analysis_failed(resp.error));
            }
            // Pending, analyzing, or a completed report whose project has
            // not materialized yet: count the attempt and keep watching.
            _ => {
                attempts += 1;
                state.apply(UploadEvent::PollAttempt { attempt: attempts });
                if attempts >= cfg.max_attempts {
                    tracing::warn!(job_id, attempts, "analysis poll budget exhausted");
                    return Err(UploadError::AnalysisTimedOut);
                }
                tokio::select! {
                    _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
                    _ = tokio::time::sleep(cfg.interval) => {}
                }
            }
        }
    }
}
