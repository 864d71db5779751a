//! HTTP client for the Code Doctor REST API.
//!
//! Thin, typed wrappers around the handful of endpoints the upload flow
//! consumes. Every call is bearer-authenticated through the injected
//! `TokenProvider`, bounded by the 60 s transfer ceiling, and decoded into
//! the explicit schemas in [`types`]; a shape mismatch is an
//! `ApiError::Decode` naming the endpoint, not a silent fallback.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::errors::ApiError;
use crate::upload::intent::Archive;
use crate::upload::progress::{ProgressFn, ProgressReporter, progress_stream};

pub mod types;

use types::{
    AnalysisStatusResponse, CreatedTeamResponse, ErrorBody, MembershipCheck, Project,
    ProjectsResponse, Team, TeamsData, TeamsResponse, UploadResponse, UserSearchResponse,
    UserSummary,
};

pub(crate) const CREATE_PROJECT_PATH: &str = "/api/v1/projects/create-project";
pub(crate) const UPDATE_PROJECT_PREFIX: &str = "/api/v1/projects/update-project";
pub(crate) const ANALYSIS_STATUS_PREFIX: &str = "/api/v1/projects/analysis-status";
pub(crate) const TEAMS_PATH: &str = "/api/v1/teams";
pub(crate) const CHECK_MEMBERSHIP_PATH: &str = "/api/v1/teams/check-membership";
pub(crate) const PROJECTS_PATH: &str = "/api/v1/projects";
pub(crate) const USER_SEARCH_PATH: &str = "/api/v1/users/search";

/// Field name the backend expects the archive under.
const ARCHIVE_FIELD: &str = "project";

#[derive(Serialize)]
struct CreateTeamBody<'a> {
    name: &'a str,
    members: &'a [String],
}

#[derive(Serialize)]
struct CheckMembershipBody<'a> {
    members: &'a [String],
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(cfg: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.transfer_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let status = resp.status();
        let body = resp.text().await.map_err(map_reqwest)?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            tracing::warn!(endpoint, %status, "request failed");
            return Err(ApiError::Status { status, message });
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_owned(),
            source,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self
            .authorize(self.http.get(self.url(path)))
            .send()
            .await
            .map_err(map_reqwest)?;
        self.read_json(resp, path).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .authorize(self.http.post(self.url(path)))
            .json(body)
            .send()
            .await
            .map_err(map_reqwest)?;
        self.read_json(resp, path).await
    }

    async fn send_upload(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<UploadResponse, ApiError> {
        let resp = self
            .authorize(self.http.request(method, self.url(path)))
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest)?;
        self.read_json(resp, path).await
    }

    fn archive_part(&self, archive: &Archive, progress: ProgressFn) -> Result<Part, ApiError> {
        let reporter = ProgressReporter::new(progress);
        let total = archive.len();
        let stream = progress_stream(archive.data().to_vec(), reporter);
        Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(archive.file_name().to_owned())
            .mime_str(archive.mime())
            .map_err(map_reqwest)
    }

    /// `POST /api/v1/projects/create-project`: new project with archive,
    /// name, description, and optional owning team.
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
        team_id: Option<&str>,
        archive: &Archive,
        progress: ProgressFn,
    ) -> Result<UploadResponse, ApiError> {
        let mut form = Form::new()
            .part(ARCHIVE_FIELD, self.archive_part(archive, progress)?)
            .text("name", name.trim().to_owned())
            .text("description", description.trim().to_owned());
        if let Some(team_id) = team_id {
            form = form.text("team", team_id.to_owned());
        }
        self.send_upload(Method::POST, CREATE_PROJECT_PATH, form)
            .await
    }

    /// `PATCH /api/v1/projects/update-project/:id`: new version of an
    /// existing project; archive and description only.
    pub async fn update_project(
        &self,
        project_id: &str,
        description: &str,
        archive: &Archive,
        progress: ProgressFn,
    ) -> Result<UploadResponse, ApiError> {
        let form = Form::new()
            .part(ARCHIVE_FIELD, self.archive_part(archive, progress)?)
            .text("description", description.trim().to_owned());
        let path = format!("{UPDATE_PROJECT_PREFIX}/{project_id}");
        self.send_upload(Method::PATCH, &path, form).await
    }

    /// `GET /api/v1/projects/analysis-status/:jobId`: one poll step.
    pub async fn analysis_status(&self, job_id: &str) -> Result<AnalysisStatusResponse, ApiError> {
        self.get_json(&format!("{ANALYSIS_STATUS_PREFIX}/{job_id}"))
            .await
    }

    /// `POST /api/v1/teams`: create a team. Not idempotent; callers must
    /// not retry a failed creation.
    pub async fn create_team(&self, name: &str, members: &[String]) -> Result<Team, ApiError> {
        let body = CreateTeamBody {
            name: name.trim(),
            members,
        };
        let resp: CreatedTeamResponse = self.post_json(TEAMS_PATH, &body).await?;
        Ok(resp.data.team)
    }

    /// `POST /api/v1/teams/check-membership`: does any existing team have
    /// exactly this member set?
    pub async fn check_membership(&self, members: &[String]) -> Result<MembershipCheck, ApiError> {
        self.post_json(CHECK_MEMBERSHIP_PATH, &CheckMembershipBody { members })
            .await
    }

    /// `GET /api/v1/teams`: the caller's teams, split into created vs.
    /// added-to.
    pub async fn list_teams(&self) -> Result<TeamsData, ApiError> {
        let resp: TeamsResponse = self.get_json(TEAMS_PATH).await?;
        Ok(resp.data)
    }

    /// `GET /api/v1/projects`: every project visible to the caller.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let resp: ProjectsResponse = self.get_json(PROJECTS_PATH).await?;
        Ok(resp.data.projects)
    }

    /// `GET /api/v1/users/search?username=`: member search for the
    /// new-team form.
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>, ApiError> {
        let resp = self
            .authorize(self.http.get(self.url(USER_SEARCH_PATH)))
            .query(&[("username", query)])
            .send()
            .await
            .map_err(map_reqwest)?;
        let resp: UserSearchResponse = self.read_json(resp, USER_SEARCH_PATH).await?;
        Ok(resp.users)
    }
}

fn map_reqwest(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(err)
    } else {
        ApiError::Transport(err)
    }
}
