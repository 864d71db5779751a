//! The validation gate: pure, synchronous, first-failing-rule-wins.
//!
//! Runs over the raw form draft before any mutation is attempted. Rule
//! order is part of the contract: a draft missing both a title and an
//! archive must be told about the title first.

use crate::errors::UploadError;
use crate::upload::intent::{Archive, TeamTarget, UploadIntent};

pub(crate) const MSG_TITLE_REQUIRED: &str = "Project title is required";
pub(crate) const MSG_FILE_REQUIRED: &str = "Please select a ZIP file to upload";
pub(crate) const MSG_TEAM_REQUIRED: &str = "Please select a team";
pub(crate) const MSG_TEAM_NAME_REQUIRED: &str = "Please enter a team name";
pub(crate) const MSG_MEMBERS_REQUIRED: &str = "Please add at least one team member";
pub(crate) const MSG_VERSION_PROJECT_REQUIRED: &str = "Please select a project for the new version";

/// Team portion of the form draft, mirroring the three team modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamDraft {
    /// Personal upload, no team involved.
    Personal,
    /// Existing-team mode; `selected` is empty until the user picks one.
    Existing { selected: Option<String> },
    /// New-team mode. `duplicate_warning` is the membership-collision
    /// message currently shown, if any; it turns fatal at submit time.
    New {
        name: String,
        member_ids: Vec<String>,
        duplicate_warning: Option<String>,
    },
}

/// The full form draft as the host UI holds it.
#[derive(Debug)]
pub struct UploadDraft {
    /// True when the submission is a new version of an existing project.
    pub uploading_version: bool,
    pub title: String,
    pub description: String,
    pub archive: Option<Archive>,
    pub team: TeamDraft,
    pub selected_project_id: Option<String>,
}

impl UploadDraft {
    /// Run the gate and, on success, produce the validated intent.
    pub fn into_intent(self) -> Result<UploadIntent, UploadError> {
        if let Some(message) = validate(&self) {
            return Err(UploadError::Validation(message));
        }
        let team_target = match self.team {
            TeamDraft::Personal => TeamTarget::Personal,
            // The gate already rejected an empty selection; re-checked here
            // so this function stands on its own.
            TeamDraft::Existing { selected } => match selected {
                Some(id) if !id.is_empty() => TeamTarget::Existing(id),
                _ => return Err(UploadError::Validation(MSG_TEAM_REQUIRED.to_owned())),
            },
            TeamDraft::New {
                name, member_ids, ..
            } => TeamTarget::New {
                name: name.trim().to_owned(),
                member_ids,
            },
        };
        let Some(archive) = self.archive else {
            return Err(UploadError::Validation(MSG_FILE_REQUIRED.to_owned()));
        };
        let (title, version_target) = if self.uploading_version {
            (None, self.selected_project_id)
        } else {
            (Some(self.title.trim().to_owned()), None)
        };
        Ok(UploadIntent {
            title,
            description: self.description,
            archive,
            team_target,
            version_target,
        })
    }
}

/// `None` when the draft is submittable; otherwise the first failing
/// rule's message, in contract order.
pub fn validate(draft: &UploadDraft) -> Option<String> {
    if !draft.uploading_version && draft.title.trim().is_empty() {
        return Some(MSG_TITLE_REQUIRED.to_owned());
    }

    if draft.archive.is_none() {
        return Some(MSG_FILE_REQUIRED.to_owned());
    }

    match &draft.team {
        TeamDraft::Personal => {}
        TeamDraft::Existing { selected } => {
            if selected.as_deref().is_none_or(str::is_empty) {
                return Some(MSG_TEAM_REQUIRED.to_owned());
            }
        }
        TeamDraft::New {
            name,
            member_ids,
            duplicate_warning,
        } => {
            if name.trim().is_empty() {
                return Some(MSG_TEAM_NAME_REQUIRED.to_owned());
            }
            if member_ids.is_empty() {
                return Some(MSG_MEMBERS_REQUIRED.to_owned());
            }
            if let Some(warning) = duplicate_warning {
                if !warning.is_empty() {
                    return Some(warning.clone());
                }
            }
        }
    }

    if draft.uploading_version && draft.selected_project_id.as_deref().is_none_or(str::is_empty) {
        return Some(MSG_VERSION_PROJECT_REQUIRED.to_owned());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive() -> Archive {
        Archive::new("p.zip", None, vec![1, 2, 3]).unwrap()
    }

    fn valid_draft() -> UploadDraft {
        UploadDraft {
            uploading_version: false,
            title: "Foo".into(),
            description: "desc".into(),
            archive: Some(archive()),
            team: TeamDraft::Personal,
            selected_project_id: None,
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate(&valid_draft()).is_none());
    }

    #[test]
    fn test_blank_title_rejected_for_new_project() {
        let draft = UploadDraft {
            title: "   ".into(),
            ..valid_draft()
        };
        assert_eq!(validate(&draft).as_deref(), Some(MSG_TITLE_REQUIRED));
    }

    #[test]
    fn test_title_not_required_for_version_upload() {
        let draft = UploadDraft {
            uploading_version: true,
            title: String::new(),
            selected_project_id: Some("p1".into()),
            ..valid_draft()
        };
        assert!(validate(&draft).is_none());
    }

    #[test]
    fn test_title_error_wins_over_missing_file() {
        // Rule order is part of the contract.
        let draft = UploadDraft {
            title: String::new(),
            archive: None,
            ..valid_draft()
        };
        assert_eq!(validate(&draft).as_deref(), Some(MSG_TITLE_REQUIRED));
    }

    #[test]
    fn test_missing_file_rejected() {
        let draft = UploadDraft {
            archive: None,
            ..valid_draft()
        };
        assert_eq!(validate(&draft).as_deref(), Some(MSG_FILE_REQUIRED));
    }

    #[test]
    fn test_existing_team_mode_requires_selection() {
        let draft = UploadDraft {
            team: TeamDraft::Existing { selected: None },
            ..valid_draft()
        };
        assert_eq!(validate(&draft).as_deref(), Some(MSG_TEAM_REQUIRED));

        let draft = UploadDraft {
            team: TeamDraft::Existing {
                selected: Some(String::new()),
            },
            ..valid_draft()
        };
        assert_eq!(validate(&draft).as_deref(), Some(MSG_TEAM_REQUIRED));
    }

    #[test]
    fn test_new_team_requires_name_then_members() {
        let draft = UploadDraft {
            team: TeamDraft::New {
                name: "  ".into(),
                member_ids: vec![],
                duplicate_warning: None,
            },
            ..valid_draft()
        };
        assert_eq!(validate(&draft).as_deref(), Some(MSG_TEAM_NAME_REQUIRED));

        let draft = UploadDraft {
            team: TeamDraft::New {
                name: "Team 1".into(),
                member_ids: vec![],
                duplicate_warning: None,
            },
            ..valid_draft()
        };
        assert_eq!(validate(&draft).as_deref(), Some(MSG_MEMBERS_REQUIRED));
    }

    #[test]
    fn test_duplicate_warning_becomes_the_error_verbatim() {
        let warning = "You are already in team \"Alpha\" with these members";
        let draft = UploadDraft {
            team: TeamDraft::New {
                name: "Team 1".into(),
                member_ids: vec!["u2".into()],
                duplicate_warning: Some(warning.into()),
            },
            ..valid_draft()
        };
        assert_eq!(validate(&draft).as_deref(), Some(warning));
    }

    #[test]
    fn test_version_upload_requires_target_project() {
        let draft = UploadDraft {
            uploading_version: true,
            selected_project_id: None,
            ..valid_draft()
        };
        assert_eq!(
            validate(&draft).as_deref(),
            Some(MSG_VERSION_PROJECT_REQUIRED)
        );
    }

    #[test]
    fn test_into_intent_trims_and_splits_fields() {
        let draft = UploadDraft {
            title: "  Foo  ".into(),
            ..valid_draft()
        };
        let intent = draft.into_intent().unwrap();
        assert_eq!(intent.title.as_deref(), Some("Foo"));
        assert!(intent.is_new_project());
        assert!(intent.version_target.is_none());
    }

    #[test]
    fn test_into_intent_version_upload_drops_title() {
        let draft = UploadDraft {
            uploading_version: true,
            title: "ignored".into(),
            selected_project_id: Some("p1".into()),
            ..valid_draft()
        };
        let intent = draft.into_intent().unwrap();
        assert!(intent.title.is_none());
        assert_eq!(intent.version_target.as_deref(), Some("p1"));
    }

    #[test]
    fn test_into_intent_surfaces_gate_error() {
        let draft = UploadDraft {
            archive: None,
            ..valid_draft()
        };
        match draft.into_intent() {
            Err(UploadError::Validation(msg)) => assert_eq!(msg, MSG_FILE_REQUIRED),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }
}
