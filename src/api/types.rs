//! One explicit response schema per consumed endpoint.
//!
//! The backend is a Mongo-backed REST API: ids arrive as `_id`, field names
//! as camelCase, and a few references (project owner, team creator) arrive
//! either as a bare id string or as an expanded document depending on the
//! endpoint. Each shape is pinned here; anything that does not match is a
//! loud `ApiError::Decode`, never an optional-chain fallback.

use serde::Deserialize;

/// Minimal project reference returned by upload and status endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Response of `POST create-project` and `PATCH update-project/:id`.
///
/// `analyzing: true` plus a job id means the backend deferred analysis to
/// an async job; anything else is an immediate result.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub project: ProjectRef,
    #[serde(default)]
    pub analyzing: bool,
    #[serde(rename = "jobId", default)]
    pub job_id: Option<String>,
}

/// Lifecycle of a deferred analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Analyzing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }
}

/// Response of `GET analysis-status/:jobId`.
#[derive(Debug, Deserialize)]
pub struct AnalysisStatusResponse {
    #[serde(rename = "analysisStatus")]
    pub analysis_status: AnalysisStatus,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A user as returned by search and inside team documents.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// A reference that the backend serializes either as a bare id or as an
/// expanded user document. Both carry the id; nothing else is relied on.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PersonRef {
    Id(String),
    Expanded {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl PersonRef {
    pub fn id(&self) -> &str {
        match self {
            PersonRef::Id(id) => id,
            PersonRef::Expanded { id } => id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub creator: PersonRef,
    #[serde(default)]
    pub members: Vec<UserSummary>,
}

/// Envelope of `POST /api/v1/teams`: `{ data: { team } }`.
#[derive(Debug, Deserialize)]
pub struct CreatedTeamResponse {
    pub data: CreatedTeamData,
}

#[derive(Debug, Deserialize)]
pub struct CreatedTeamData {
    pub team: Team,
}

/// Envelope of `GET /api/v1/teams`.
#[derive(Debug, Deserialize)]
pub struct TeamsResponse {
    pub data: TeamsData,
}

#[derive(Debug, Deserialize)]
pub struct TeamsData {
    #[serde(rename = "myTeams", default)]
    pub my_teams: Vec<Team>,
    #[serde(rename = "addedToTeams", default)]
    pub added_to_teams: Vec<Team>,
    #[serde(rename = "hasTeams", default)]
    pub has_teams: bool,
    #[serde(rename = "totalTeams", default)]
    pub total_teams: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    /// No existing team has this exact member set.
    New,
    /// The caller already shares a team with exactly these members.
    Exists,
}

/// Response of `POST /api/v1/teams/check-membership`.
#[derive(Debug, Deserialize)]
pub struct MembershipCheck {
    pub status: MembershipStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub team: Option<Team>,
}

/// Reference to the team a project belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRef {
    #[serde(rename = "_id")]
    pub id: String,
}

/// A project, reduced to what routing and version-candidate filtering need.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub owner: PersonRef,
    #[serde(default)]
    pub team: Option<TeamRef>,
}

/// Envelope of `GET /api/v1/projects`.
#[derive(Debug, Deserialize)]
pub struct ProjectsResponse {
    pub data: ProjectsData,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsData {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Response of `GET /api/v1/users/search`.
#[derive(Debug, Deserialize)]
pub struct UserSearchResponse {
    #[serde(default)]
    pub users: Vec<UserSummary>,
}

/// Error body shape used by every endpoint on non-2xx.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
