//! Team resolution: turning a `TeamTarget` into a concrete team id.
//!
//! Creating a team is not idempotent and is never retried here: a failed
//! creation aborts the whole submission and the user resubmits explicitly.

use crate::api::ApiClient;
use crate::api::types::{MembershipStatus, Team, TeamsData};
use crate::errors::UploadError;
use crate::upload::intent::TeamTarget;

/// The caller's teams as last fetched, split into created vs. added-to.
#[derive(Debug, Default, Clone)]
pub struct TeamRoster {
    pub my_teams: Vec<Team>,
    pub added_to_teams: Vec<Team>,
}

impl TeamRoster {
    pub async fn fetch(api: &ApiClient) -> Result<Self, crate::errors::ApiError> {
        let TeamsData {
            my_teams,
            added_to_teams,
            ..
        } = api.list_teams().await?;
        Ok(Self {
            my_teams,
            added_to_teams,
        })
    }

    pub fn all(&self) -> impl Iterator<Item = &Team> {
        self.my_teams.iter().chain(self.added_to_teams.iter())
    }

    /// Whether the caller created any team; drives the default team-mode
    /// choice in the host UI.
    pub fn is_creator_of_any(&self) -> bool {
        !self.my_teams.is_empty()
    }

    pub fn is_creator_of(&self, team_id: &str, user_id: &str) -> bool {
        self.all()
            .any(|t| t.id == team_id && t.creator.id() == user_id)
    }

    /// Advisory, client-side duplicate check on the team *name* (the
    /// member-set collision is the backend's call).
    pub fn has_name(&self, name: &str) -> bool {
        self.all().any(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// Resolve the target to a team id, creating the team first if asked.
/// On a successful creation the roster is refreshed so the host UI picks
/// up the caller's new creator status; a refresh failure is logged and
/// does not fail the upload.
pub async fn resolve_team(
    api: &ApiClient,
    roster: &mut TeamRoster,
    target: &TeamTarget,
) -> Result<Option<String>, UploadError> {
    match target {
        TeamTarget::Personal => Ok(None),
        TeamTarget::Existing(id) => Ok(Some(id.clone())),
        TeamTarget::New { name, member_ids } => {
            let team = api
                .create_team(name, member_ids)
                .await
                .map_err(UploadError::team_creation_from)?;
            tracing::info!(team_id = %team.id, "created team for upload");
            match TeamRoster::fetch(api).await {
                Ok(fresh) => *roster = fresh,
                Err(err) => tracing::warn!(error = %err, "team roster refresh failed"),
            }
            Ok(Some(team.id))
        }
    }
}

/// Ask the backend whether the caller already shares a team with exactly
/// this member set. `Some(message)` is the non-fatal warning the host UI
/// shows; it turns fatal at submit time through the validation gate.
/// Check failures are swallowed; the backend re-checks on creation.
pub async fn membership_warning(api: &ApiClient, member_ids: &[String]) -> Option<String> {
    if member_ids.is_empty() {
        return None;
    }
    match api.check_membership(member_ids).await {
        Ok(check) if check.status == MembershipStatus::Exists => Some(
            check.message.unwrap_or_else(|| {
                let name = check.team.map(|t| t.name).unwrap_or_default();
                format!("You are already in team \"{name}\" with these members")
            }),
        ),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(error = %err, "membership check failed");
            None
        }
    }
}
