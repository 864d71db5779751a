//! Client-side upload orchestration: validation gate, team resolution,
//! transfer coordination, and the analysis completion protocol.

pub mod intent;
pub mod poll;
pub mod progress;
pub mod projects;
pub mod state;
pub mod team;
pub mod transfer;
pub mod validate;
pub mod workflow;

pub use intent::{Archive, ArchiveError, TeamTarget, UploadIntent};
pub use poll::PollOutcome;
pub use progress::{ProgressFn, noop_progress};
pub use state::{UploadEvent, UploadState};
pub use team::TeamRoster;
pub use transfer::TransferRoute;
pub use validate::{TeamDraft, UploadDraft, validate};
pub use workflow::{Navigator, RecordingNavigator, Uploader};
