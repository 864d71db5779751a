//! Version-upload candidates and member search.
//!
//! Which existing projects may receive a new version depends on the team
//! mode: personal uploads only offer the caller's own team-less projects,
//! existing-team uploads only offer that team's projects and only to the
//! team's creator, and a yet-to-be-created team has no projects at all.

use crate::api::ApiClient;
use crate::api::types::{Project, UserSummary};
use crate::errors::ApiError;
use crate::upload::team::TeamRoster;

/// Minimum query length before member search hits the backend.
pub const MIN_SEARCH_LEN: usize = 2;

/// The namespace a version upload would land in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionScope<'a> {
    Personal { user_id: &'a str },
    ExistingTeam { team_id: &'a str, user_is_creator: bool },
    NewTeam,
}

impl<'a> VersionScope<'a> {
    /// Scope for an existing-team upload, deciding creator status from the
    /// cached roster.
    pub fn for_existing_team(roster: &TeamRoster, team_id: &'a str, user_id: &str) -> Self {
        VersionScope::ExistingTeam {
            team_id,
            user_is_creator: roster.is_creator_of(team_id, user_id),
        }
    }
}

/// Filter the full project list down to valid version targets.
pub fn version_candidates(projects: Vec<Project>, scope: &VersionScope) -> Vec<Project> {
    match scope {
        VersionScope::Personal { user_id } => projects
            .into_iter()
            .filter(|p| p.team.is_none() && p.owner.id() == *user_id)
            .collect(),
        VersionScope::ExistingTeam {
            team_id,
            user_is_creator,
        } => {
            if !user_is_creator {
                return Vec::new();
            }
            projects
                .into_iter()
                .filter(|p| p.team.as_ref().is_some_and(|t| t.id == *team_id))
                .collect()
        }
        VersionScope::NewTeam => Vec::new(),
    }
}

/// Fetch and filter in one step.
pub async fn fetch_version_candidates(
    api: &ApiClient,
    scope: &VersionScope<'_>,
) -> Result<Vec<Project>, ApiError> {
    let projects = api.list_projects().await?;
    Ok(version_candidates(projects, scope))
}

/// Drop users already on the team and the caller from search results.
pub fn filter_member_results(
    users: Vec<UserSummary>,
    current_members: &[String],
    current_user_id: &str,
) -> Vec<UserSummary> {
    users
        .into_iter()
        .filter(|u| !current_members.contains(&u.id) && u.id != current_user_id)
        .collect()
}

/// Member search for the new-team form. Queries shorter than
/// `MIN_SEARCH_LEN` and backend failures both yield an empty result; the
/// host UI treats them the same.
pub async fn search_members(
    api: &ApiClient,
    query: &str,
    current_members: &[String],
    current_user_id: &str,
) -> Vec<UserSummary> {
    if query.len() < MIN_SEARCH_LEN {
        return Vec::new();
    }
    match api.search_users(query).await {
        Ok(users) => filter_member_results(users, current_members, current_user_id),
        Err(err) => {
            tracing::warn!(error = %err, "member search failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{PersonRef, TeamRef};

    fn project(id: &str, owner: &str, team: Option<&str>) -> Project {
        Project {
            id: id.into(),
            title: Some(id.into()),
            owner: PersonRef::Id(owner.into()),
            team: team.map(|t| TeamRef { id: t.into() }),
        }
    }

    fn sample_projects() -> Vec<Project> {
        vec![
            project("p1", "u1", None),
            project("p2", "u2", None),
            project("p3", "u1", Some("t1")),
            project("p4", "u9", Some("t1")),
            project("p5", "u1", Some("t2")),
        ]
    }

    #[test]
    fn test_personal_scope_keeps_only_own_teamless_projects() {
        let scope = VersionScope::Personal { user_id: "u1" };
        let out = version_candidates(sample_projects(), &scope);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "p1");
    }

    #[test]
    fn test_existing_team_scope_requires_creator() {
        let creator = VersionScope::ExistingTeam {
            team_id: "t1",
            user_is_creator: true,
        };
        let out = version_candidates(sample_projects(), &creator);
        let ids: Vec<_> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p3", "p4"]);

        let member = VersionScope::ExistingTeam {
            team_id: "t1",
            user_is_creator: false,
        };
        assert!(version_candidates(sample_projects(), &member).is_empty());
    }

    #[test]
    fn test_new_team_scope_has_no_candidates() {
        assert!(version_candidates(sample_projects(), &VersionScope::NewTeam).is_empty());
    }

    fn user(id: &str) -> UserSummary {
        UserSummary {
            id: id.into(),
            name: id.into(),
            username: id.into(),
            photo: None,
        }
    }

    #[test]
    fn test_member_results_exclude_existing_members_and_self() {
        let users = vec![user("u1"), user("u2"), user("u3")];
        let out = filter_member_results(users, &["u2".into()], "u1");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "u3");
    }
}
