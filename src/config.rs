use std::time::Duration;

/// Largest accepted archive, in bytes (100 MiB).
pub const MAX_ARCHIVE_BYTES: u64 = 100 * 1024 * 1024;

/// Ceiling applied to every transfer request. This is a distinct timeout
/// domain from the polling loop's overall budget.
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(60);

/// Pause between a terminal success and navigation, so the host UI can
/// show its completed state briefly.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

/// Cadence and budget of the analysis-status polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between consecutive status requests.
    pub interval: Duration,
    /// Attempt budget; reaching it gives up client-side (~6 minutes at the
    /// default cadence) without claiming the analysis failed.
    pub max_attempts: u32,
    /// How long to wait before escalating the status message to the
    /// large-project wording.
    pub escalate_after: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 180,
            escalate_after: Duration::from_secs(5),
        }
    }
}

/// Runtime configuration for the upload client.
///
/// The host shell supplies the API origin; everything else defaults to the
/// platform's fixed values and is only overridden by tests.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the Code Doctor REST API, without a trailing slash.
    pub base_url: String,
    pub transfer_timeout: Duration,
    pub feedback_delay: Duration,
    pub max_archive_bytes: u64,
    pub poll: PollConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            transfer_timeout: TRANSFER_TIMEOUT,
            feedback_delay: FEEDBACK_DELAY,
            max_archive_bytes: MAX_ARCHIVE_BYTES,
            poll: PollConfig::default(),
        }
    }
}
