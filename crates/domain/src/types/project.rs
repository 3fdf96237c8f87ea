//! Project types
//!
//! Projects are referenced by id from sessions, timers and away intervals.
//! Archiving is a soft delete: archived projects leave active selection and
//! totals but keep their history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{ARCHIVED_SUFFIX, UNTITLED_PROJECT_LABEL};
use crate::impl_wire_names;
use crate::utils::lenient::or_default;

/// Workflow status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "In Queue")]
    InQueue,
    #[serde(rename = "Active")]
    Active,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Done")]
    Done,
}

impl_wire_names!(ProjectStatus {
    InQueue => "in queue",
    Active => "active",
    OnHold => "on hold",
    Done => "done",
});

/// A project that sessions are attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub project_no: String,
    #[serde(default, deserialize_with = "or_default")]
    pub task_no: String,
    #[serde(default, deserialize_with = "or_default")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "or_default")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "or_default")]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "or_default")]
    pub note: String,
    #[serde(default, deserialize_with = "or_default")]
    pub archived: bool,
}

impl Project {
    /// Build a new, unarchived project from a draft
    pub fn from_draft(id: impl Into<String>, draft: ProjectDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name.trim().to_string(),
            project_no: draft.project_no.trim().to_string(),
            task_no: draft.task_no.trim().to_string(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: draft.status,
            note: draft.note.trim().to_string(),
            archived: false,
        }
    }

    /// Name for display, substituting a placeholder for unnamed projects
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            UNTITLED_PROJECT_LABEL
        } else {
            &self.name
        }
    }

    /// Chooser entry for this project
    pub fn option(&self) -> ProjectOption {
        ProjectOption { id: self.id.clone(), name: self.name.clone(), archived: self.archived }
    }
}

/// Fields supplied when creating or editing a project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub project_no: String,
    pub task_no: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub note: String,
}

impl ProjectDraft {
    /// Draft carrying only a name and a note
    pub fn named(name: impl Into<String>, note: impl Into<String>) -> Self {
        Self { name: name.into(), note: note.into(), ..Self::default() }
    }
}

/// Minimal project view handed to choosers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOption {
    pub id: String,
    pub name: String,
    pub archived: bool,
}

impl ProjectOption {
    /// Chooser label: `Untitled Project` for empty names, `(Archived)` suffix
    pub fn label(&self) -> String {
        let base = if self.name.trim().is_empty() { UNTITLED_PROJECT_LABEL } else { &self.name };
        if self.archived {
            format!("{base}{ARCHIVED_SUFFIX}")
        } else {
            base.to_string()
        }
    }
}
