//! The submission driver: gate → team resolution → transfer → completion
//! protocol → navigation.
//!
//! One `Uploader` corresponds to one upload surface in the host UI. Every
//! state transition is published on a `watch` channel; the caller's
//! cancellation token (the "navigated away" signal) is checked at each
//! continuation point, after which nothing touches published state again.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::errors::UploadError;
use crate::upload::poll::{PollOutcome, poll_analysis};
use crate::upload::progress::ProgressFn;
use crate::upload::state::{StateCell, UploadEvent, UploadState};
use crate::upload::team::{TeamRoster, resolve_team};
use crate::upload::transfer::run_transfer;
use crate::upload::validate::UploadDraft;

/// Where the host sends the user once a submission succeeds.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

pub struct Uploader {
    api: Arc<ApiClient>,
    cfg: ClientConfig,
    navigator: Arc<dyn Navigator>,
    state: StateCell,
    state_rx: watch::Receiver<UploadState>,
}

impl Uploader {
    pub fn new(api: Arc<ApiClient>, cfg: ClientConfig, navigator: Arc<dyn Navigator>) -> Self {
        let (state, state_rx) = StateCell::new();
        Self {
            api,
            cfg,
            navigator,
            state,
            state_rx,
        }
    }

    /// Live view of the submission state for the host UI.
    pub fn state(&self) -> watch::Receiver<UploadState> {
        self.state_rx.clone()
    }

    /// Drive one submission to its terminal state.
    ///
    /// Returns the project id on success, `Ok(None)` when cancelled before
    /// finishing, and the classified failure otherwise. Failures are also
    /// published as `Failed { reason }`; except after cancellation, when
    /// published state is left untouched.
    pub async fn submit(
        &self,
        draft: UploadDraft,
        roster: &mut TeamRoster,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, UploadError> {
        self.state.apply(UploadEvent::SubmitStarted);

        let intent = match draft.into_intent() {
            Ok(intent) => intent,
            Err(err) => {
                self.state.apply(UploadEvent::Rejected {
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        if cancel.is_cancelled() {
            return Ok(None);
        }

        // Not rolled back if the transfer below fails; the user keeps the
        // team and resubmits into it.
        let team_id = match resolve_team(&self.api, roster, &intent.team_target).await {
            Ok(team_id) => team_id,
            Err(err) => return Err(self.fail(err, cancel)),
        };

        if cancel.is_cancelled() {
            return Ok(None);
        }

        self.state.apply(UploadEvent::TransferStarted);
        let progress: ProgressFn = {
            let state = self.state.clone();
            Arc::new(move |percent| state.apply(UploadEvent::Progress { percent }))
        };

        let resp = match run_transfer(&self.api, &intent, team_id.as_deref(), progress).await {
            Ok(resp) => resp,
            Err(err) => return Err(self.fail(err, cancel)),
        };

        if cancel.is_cancelled() {
            return Ok(None);
        }

        let project_id = resp.project.id;

        // Deferred analysis only when the backend says so *and* names a
        // job; an analyzing flag without a job id is an immediate result.
        let deferred_job = if resp.analyzing { resp.job_id } else { None };
        if let Some(job_id) = deferred_job {
            self.state.apply(UploadEvent::AnalysisAccepted {
                job_id: job_id.clone(),
            });
            match poll_analysis(&self.api, &job_id, &self.cfg.poll, cancel, &self.state).await {
                Ok(PollOutcome::Completed) => {}
                Ok(PollOutcome::Cancelled) => return Ok(None),
                Err(err) => return Err(self.fail(err, cancel)),
            }
        }

        self.state.apply(UploadEvent::Completed {
            project_id: project_id.clone(),
        });

        // Brief pause so the host UI can show the completed state before
        // leaving the page.
        tokio::select! {
            _ = cancel.cancelled() => return Ok(None),
            _ = tokio::time::sleep(self.cfg.feedback_delay) => {}
        }
        self.navigator.navigate(&format!("/report/{project_id}"));
        Ok(Some(project_id))
    }

    /// Publish a failure unless the caller has already gone away.
    fn fail(&self, err: UploadError, cancel: &CancellationToken) -> UploadError {
        if !cancel.is_cancelled() {
            self.state.apply(UploadEvent::Failed {
                reason: err.to_string(),
            });
        }
        err
    }
}

/// A navigator that records visited paths; for hosts under test and
/// headless embedding.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: std::sync::Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().expect("navigator lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.lock().expect("navigator lock").push(path.to_owned());
    }
}
