//! The submission state machine.
//!
//! One tagged union, advanced by a pure reducer, published over a `watch`
//! channel. Terminal states absorb every later event, which is what makes
//! a late timer or straggling poll response harmless: it can fire, but it
//! cannot mutate anything the host UI sees.

use tokio::sync::watch;

/// Initial wording while a deferred analysis runs.
pub(crate) const ANALYZING_MESSAGE: &str = "Analyzing your project...";

/// Wording after the escalation delay has elapsed.
pub(crate) const ANALYZING_LONG_MESSAGE: &str =
    "Analyzing your project. Large project detected, this may take some time...";

/// Where one submission currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Validating,
    Uploading {
        percent: u8,
    },
    /// Transfer done (visually 100%), deferred analysis still running.
    AsyncPending {
        job_id: String,
        attempt: u32,
        message: String,
    },
    Succeeded {
        project_id: String,
    },
    Failed {
        reason: String,
    },
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Succeeded { .. } | UploadState::Failed { .. })
    }
}

/// Everything that can happen to a submission.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    SubmitStarted,
    Rejected { reason: String },
    TransferStarted,
    Progress { percent: u8 },
    AnalysisAccepted { job_id: String },
    PollAttempt { attempt: u32 },
    MessageEscalated,
    Completed { project_id: String },
    Failed { reason: String },
}

/// Pure transition function. Unexpected event/state pairs keep the current
/// state rather than inventing one.
pub fn reduce(state: &UploadState, event: &UploadEvent) -> UploadState {
    if state.is_terminal() {
        return state.clone();
    }
    match (state, event) {
        (_, UploadEvent::SubmitStarted) => UploadState::Validating,
        (_, UploadEvent::Rejected { reason }) => UploadState::Failed {
            reason: reason.clone(),
        },
        (_, UploadEvent::TransferStarted) => UploadState::Uploading { percent: 0 },
        (UploadState::Uploading { percent }, UploadEvent::Progress { percent: next }) => {
            UploadState::Uploading {
                percent: (*next).max(*percent),
            }
        }
        (UploadState::Uploading { .. }, UploadEvent::AnalysisAccepted { job_id }) => {
            UploadState::AsyncPending {
                job_id: job_id.clone(),
                attempt: 0,
                message: ANALYZING_MESSAGE.to_owned(),
            }
        }
        (
            UploadState::AsyncPending {
                job_id, message, ..
            },
            UploadEvent::PollAttempt { attempt },
        ) => UploadState::AsyncPending {
            job_id: job_id.clone(),
            attempt: *attempt,
            message: message.clone(),
        },
        (
            UploadState::AsyncPending {
                job_id, attempt, ..
            },
            UploadEvent::MessageEscalated,
        ) => UploadState::AsyncPending {
            job_id: job_id.clone(),
            attempt: *attempt,
            message: ANALYZING_LONG_MESSAGE.to_owned(),
        },
        (_, UploadEvent::Completed { project_id }) => UploadState::Succeeded {
            project_id: project_id.clone(),
        },
        (_, UploadEvent::Failed { reason }) => UploadState::Failed {
            reason: reason.clone(),
        },
        _ => state.clone(),
    }
}

/// Shared state holder: applies events through the reducer and publishes
/// only real changes, so `watch` subscribers never wake up for a terminal
/// state absorbing a stale event.
#[derive(Debug, Clone)]
pub struct StateCell {
    tx: watch::Sender<UploadState>,
}

impl StateCell {
    pub fn new() -> (Self, watch::Receiver<UploadState>) {
        let (tx, rx) = watch::channel(UploadState::Idle);
        (Self { tx }, rx)
    }

    pub fn apply(&self, event: UploadEvent) {
        self.tx.send_if_modified(|state| {
            let next = reduce(state, &event);
            if next != *state {
                tracing::debug!(?event, ?next, "upload state transition");
                *state = next;
                true
            } else {
                false
            }
        });
    }

    pub fn snapshot(&self) -> UploadState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.tx.subscribe()
    }
}
