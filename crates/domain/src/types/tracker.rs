//! Persisted tracker record (`tt_v1`)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::project::Project;
use crate::types::session::Session;
use crate::types::timer::ActiveTimer;
use crate::utils::lenient::elements;

/// Projects, sessions and the running timer, stored under one key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerRecord {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub active_timer: Option<ActiveTimer>,
}

/// What a lenient load had to discard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub dropped_projects: usize,
    pub dropped_sessions: usize,
    pub dropped_timer: bool,
}

impl LoadReport {
    /// True when nothing was discarded
    pub const fn is_clean(&self) -> bool {
        self.dropped_projects == 0 && self.dropped_sessions == 0 && !self.dropped_timer
    }
}

impl TrackerRecord {
    /// Read a stored record without ever failing
    ///
    /// Unreadable projects and sessions are dropped, as are sessions whose
    /// interval is unusable and duplicate project ids (first one wins).
    pub fn from_value_lenient(value: &Value) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        let (raw_projects, unreadable) = elements::<Project>(value.get("projects"));
        report.dropped_projects = unreadable;
        let mut projects: Vec<Project> = Vec::with_capacity(raw_projects.len());
        for project in raw_projects {
            if project.id.trim().is_empty() || projects.iter().any(|p| p.id == project.id) {
                report.dropped_projects += 1;
            } else {
                projects.push(project);
            }
        }

        let (raw_sessions, unreadable) = elements::<Session>(value.get("sessions"));
        let read = raw_sessions.len();
        let sessions: Vec<Session> =
            raw_sessions.into_iter().filter_map(Session::normalized).collect();
        report.dropped_sessions = unreadable + (read - sessions.len());

        let active_timer = match value.get("activeTimer") {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let timer = serde_json::from_value::<ActiveTimer>(raw.clone())
                    .ok()
                    .filter(|t| !t.project_id.trim().is_empty());
                report.dropped_timer = timer.is_none();
                timer
            }
        };

        (Self { projects, sessions, active_timer }, report)
    }
}
