//! The transfer coordinator: endpoint selection and the single-attempt
//! multipart upload.
//!
//! Both routes stream the archive with progress callbacks and are bounded
//! by the 60 s request ceiling. A failed transfer is never retried; the
//! backend may already have accepted the project. A team created
//! moments earlier is deliberately not rolled back.

use reqwest::Method;

use crate::api::{ApiClient, CREATE_PROJECT_PATH, UPDATE_PROJECT_PREFIX};
use crate::api::types::UploadResponse;
use crate::errors::UploadError;
use crate::upload::intent::UploadIntent;
use crate::upload::progress::ProgressFn;

/// Which endpoint one submission goes to. Pure function of the form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferRoute {
    /// `POST create-project`.
    Create,
    /// `PATCH update-project/:id`.
    UpdateVersion { project_id: String },
}

impl TransferRoute {
    /// Version mode with a concrete target patches that project; anything
    /// else creates a new one.
    pub fn select(uploading_version: bool, selected_project_id: Option<&str>) -> Self {
        match selected_project_id {
            Some(id) if uploading_version && !id.is_empty() => TransferRoute::UpdateVersion {
                project_id: id.to_owned(),
            },
            _ => TransferRoute::Create,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            TransferRoute::Create => Method::POST,
            TransferRoute::UpdateVersion { .. } => Method::PATCH,
        }
    }

    pub fn path(&self) -> String {
        match self {
            TransferRoute::Create => CREATE_PROJECT_PATH.to_owned(),
            TransferRoute::UpdateVersion { project_id } => {
                format!("{UPDATE_PROJECT_PREFIX}/{project_id}")
            }
        }
    }
}

/// Run the upload for a validated intent. `team_id` is the resolved team,
/// if any; it only applies to the creation route.
pub async fn run_transfer(
    api: &ApiClient,
    intent: &UploadIntent,
    team_id: Option<&str>,
    progress: ProgressFn,
) -> Result<UploadResponse, UploadError> {
    let route = TransferRoute::select(
        intent.version_target.is_some(),
        intent.version_target.as_deref(),
    );
    tracing::info!(route = ?route, archive_bytes = intent.archive.len(), "starting transfer");
    let result = match &route {
        TransferRoute::Create => {
            let name = intent.title.as_deref().unwrap_or_default();
            api.create_project(name, &intent.description, team_id, &intent.archive, progress)
                .await
        }
        TransferRoute::UpdateVersion { project_id } => {
            api.update_project(project_id, &intent.description, &intent.archive, progress)
                .await
        }
    };
    result.map_err(UploadError::transfer_from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_mode_with_target_selects_patch_route() {
        let route = TransferRoute::select(true, Some("p7"));
        assert_eq!(
            route,
            TransferRoute::UpdateVersion {
                project_id: "p7".into()
            }
        );
        assert_eq!(route.method(), Method::PATCH);
        assert_eq!(route.path(), "/api/v1/projects/update-project/p7");
    }

    #[test]
    fn test_create_mode_always_posts() {
        let route = TransferRoute::select(false, None);
        assert_eq!(route, TransferRoute::Create);
        assert_eq!(route.method(), Method::POST);
        assert_eq!(route.path(), "/api/v1/projects/create-project");
    }

    #[test]
    fn test_selected_project_without_version_mode_still_creates() {
        // The project picker may hold a stale selection after the user
        // switches back to new-project mode.
        assert_eq!(TransferRoute::select(false, Some("p7")), TransferRoute::Create);
    }

    #[test]
    fn test_version_mode_without_target_falls_back_to_create() {
        assert_eq!(TransferRoute::select(true, None), TransferRoute::Create);
        assert_eq!(TransferRoute::select(true, Some("")), TransferRoute::Create);
    }
}
