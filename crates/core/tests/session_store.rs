//! Integration tests for the session store
//!
//! Covers session validation, per-range totals, cascade deletion and the
//! persistence contract (debounced writes, lenient reloads, failures that
//! never block the caller).

mod support;

use lapse_common::time::{all_time_bounds, TimeRange};
use lapse_core::WritePolicy;
use lapse_domain::constants::TRACKER_STORAGE_KEY;
use lapse_domain::{LapseError, SessionDraft, SessionPatch, SessionSource};
use serde_json::json;
use support::{create_test_context, create_test_context_with, MemoryStateStore, T0};

fn draft(project_id: &str, start: i64, end: i64) -> SessionDraft {
    SessionDraft {
        project_id: project_id.to_string(),
        start,
        end,
        note: String::new(),
        source: SessionSource::Manual,
    }
}

/// Validates `totals_for_range` with no sessions.
///
/// Assertions:
/// - Every active project gets a zero row, in insertion order.
/// - Archived projects are left out.
#[test]
fn test_totals_for_empty_session_set() {
    let mut ctx = create_test_context();
    let alpha = ctx.project("Alpha");
    let archived = ctx.project("Archived");
    let beta = ctx.project("Beta");
    ctx.store.set_archived(&archived.id, true).expect("archive");

    let totals = ctx.store.totals_for_range(all_time_bounds(), false);

    let ids: Vec<_> = totals.iter().map(|t| t.project_id.as_str()).collect();
    assert_eq!(ids, vec![alpha.id.as_str(), beta.id.as_str()]);
    assert!(totals.iter().all(|t| t.session_count == 0 && t.total_seconds == 0));
    assert_eq!(totals[0].label(), "0s");
}

#[test]
fn test_totals_use_half_open_range_on_session_start() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");
    let range = TimeRange::new(T0, T0 + 3_600_000);

    ctx.store.add_session(draft(&project.id, T0 - 1_000, T0 + 59_000)).expect("straddles start");
    ctx.store.add_session(draft(&project.id, T0, T0 + 90_000)).expect("at start");
    ctx.store.add_session(draft(&project.id, T0 + 3_599_999, T0 + 3_700_000)).expect("last ms");
    ctx.store.add_session(draft(&project.id, T0 + 3_600_000, T0 + 3_660_000)).expect("at end");

    let totals = ctx.store.totals_for_range(range, false);
    assert_eq!(totals[0].session_count, 2);
    assert_eq!(totals[0].total_seconds, 90 + 100);
}

#[test]
fn test_add_session_rejects_invalid_input() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");

    let inverted = ctx.store.add_session(draft(&project.id, T0, T0));
    assert!(matches!(inverted, Err(LapseError::Validation(_))));

    let blank = ctx.store.add_session(draft("", T0, T0 + 1_000));
    assert!(matches!(blank, Err(LapseError::Validation(_))));

    let unknown = ctx.store.add_session(draft("nope", T0, T0 + 1_000));
    assert!(matches!(unknown, Err(LapseError::Validation(_))));

    assert!(ctx.store.sessions().is_empty());
}

/// Validates that a rejected edit leaves the stored session unchanged.
///
/// Assertions:
/// - `end <= start` yields a validation error.
/// - The session keeps its original interval and seconds.
/// - Unknown ids yield `NotFound`.
#[test]
fn test_invalid_edit_leaves_session_unchanged() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");
    let session = ctx.store.add_session(draft(&project.id, T0, T0 + 120_000)).expect("add");

    let patch = SessionPatch { end: Some(T0 - 5), ..SessionPatch::default() };
    let result = ctx.store.edit_session(&session.id, &patch);

    assert!(matches!(result, Err(LapseError::Validation(_))));
    assert_eq!(ctx.store.session(&session.id), Some(&session));

    let missing = ctx.store.edit_session("missing", &SessionPatch::note("x"));
    assert!(matches!(missing, Err(LapseError::NotFound(_))));
}

#[test]
fn test_edit_rederives_seconds_and_note_update() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");
    let session = ctx.store.add_session(draft(&project.id, T0, T0 + 60_000)).expect("add");

    let patch = SessionPatch { start: Some(T0 - 60_000), ..SessionPatch::default() };
    let edited = ctx.store.edit_session(&session.id, &patch).expect("edit");
    assert_eq!(edited.seconds, 120);

    ctx.store.set_session_note(&session.id, "standup").expect("note");
    assert_eq!(ctx.store.session(&session.id).map(|s| s.note.as_str()), Some("standup"));
}

/// Validates cascade deletion of a project.
///
/// Assertions:
/// - No session references the deleted project afterwards.
/// - Totals over any range no longer include it.
/// - Other projects' sessions survive.
#[test]
fn test_remove_project_cascades_to_sessions() {
    let mut ctx = create_test_context();
    let doomed = ctx.project("Doomed");
    let kept = ctx.project("Kept");
    for offset in 0..3 {
        ctx.store
            .add_session(draft(&doomed.id, T0 + offset * 10_000, T0 + offset * 10_000 + 5_000))
            .expect("add");
    }
    ctx.store.add_session(draft(&kept.id, T0, T0 + 5_000)).expect("add");

    let removed = ctx.store.remove_project(&doomed.id).expect("remove");

    assert_eq!(removed, 3);
    assert!(ctx.store.sessions().iter().all(|s| s.project_id != doomed.id));
    assert_eq!(ctx.store.sessions().len(), 1);
    let totals = ctx.store.totals_for_range(all_time_bounds(), true);
    assert!(totals.iter().all(|t| t.project_id != doomed.id));
    assert_eq!(ctx.store.remove_project(&doomed.id), Err(LapseError::NotFound(format!("project {}", doomed.id))));
}

/// Validates deleting the project that is being timed.
///
/// Assertions:
/// - The running timer is discarded with an immediate write.
/// - A later stop reports that nothing is running and records no session.
#[test]
fn test_remove_project_discards_its_running_timer() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");
    ctx.store.start_timer(&project.id).expect("start");

    assert_eq!(ctx.store.remove_project(&project.id), Ok(0));
    ctx.clock.advance_ms(5_000);

    assert!(ctx.store.active_timer().is_none());
    assert_eq!(ctx.store.stop_timer(), Err(LapseError::NotRunning));
    assert!(ctx.store.sessions().is_empty());
    assert_eq!(ctx.backend.policies(TRACKER_STORAGE_KEY).last(), Some(&WritePolicy::Immediate));
    assert!(ctx.restart().store.active_timer().is_none());
}

#[test]
fn test_stop_rejects_timer_for_missing_project() {
    let backend = std::sync::Arc::new(MemoryStateStore::seeded(
        TRACKER_STORAGE_KEY,
        json!({
            "projects": [],
            "sessions": [],
            "activeTimer": { "projectId": "gone", "start": T0 - 5_000 },
        }),
    ));
    let mut ctx = create_test_context_with(backend, lapse_common::time::MockClock::at(T0));

    let result = ctx.store.stop_timer();

    assert!(matches!(result, Err(LapseError::Validation(_))));
    assert!(ctx.store.sessions().is_empty());
    assert!(ctx.store.active_timer().is_none());
}

#[test]
fn test_remove_sessions_for_project_zeroes_totals() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");
    ctx.store.add_session(draft(&project.id, T0, T0 + 5_000)).expect("add");
    ctx.store.add_session(draft(&project.id, T0 + 10_000, T0 + 15_000)).expect("add");

    assert_eq!(ctx.store.remove_sessions_for_project(&project.id), 2);
    assert_eq!(ctx.store.remove_sessions_for_project(&project.id), 0);

    let totals = ctx.store.totals_for_range(all_time_bounds(), false);
    assert_eq!((totals[0].session_count, totals[0].total_seconds), (0, 0));
}

#[test]
fn test_session_and_project_mutations_are_debounced() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");
    let session = ctx.store.add_session(draft(&project.id, T0, T0 + 5_000)).expect("add");
    ctx.store.remove_session(&session.id).expect("remove");

    let policies = ctx.backend.policies(TRACKER_STORAGE_KEY);
    assert_eq!(policies.len(), 3);
    assert!(policies.iter().all(|p| *p == WritePolicy::Debounced));
}

#[test]
fn test_timer_transitions_are_written_immediately() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");
    ctx.store.start_timer(&project.id).expect("start");
    ctx.clock.advance_ms(5_000);
    ctx.store.stop_timer().expect("stop");

    let policies = ctx.backend.policies(TRACKER_STORAGE_KEY);
    assert_eq!(&policies[1..], &[WritePolicy::Immediate, WritePolicy::Immediate]);
}

/// Validates the stop-at-the-same-instant clamp.
///
/// Assertions:
/// - Stopping with zero elapsed time records exactly one second.
#[test]
fn test_stop_immediately_after_start_records_one_second() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");
    ctx.store.start_timer(&project.id).expect("start");

    let session = ctx.store.stop_timer().expect("stop");
    assert_eq!(session.seconds, 1);
    assert_eq!(session.source, SessionSource::Timer);
}

#[test]
fn test_running_timer_survives_restart() {
    let mut ctx = create_test_context();
    let project = ctx.project("Alpha");
    let timer = ctx.store.start_timer(&project.id).expect("start");

    ctx.clock.advance_ms(300_000);
    let ctx = ctx.restart();

    let resumed = ctx.store.resume_timer().expect("timer should resume");
    assert_eq!(resumed.start, timer.start);
    assert_eq!(ctx.store.elapsed_ms(), Some(300_000));
}

#[test]
fn test_persistence_failure_does_not_block_mutations() {
    let mut ctx = create_test_context();
    ctx.backend.fail_saves();

    let project = ctx.project("Alpha");
    let session = ctx.store.add_session(draft(&project.id, T0, T0 + 5_000)).expect("add");
    assert_eq!(ctx.store.session(&session.id), Some(&session));
}

#[test]
fn test_load_drops_malformed_elements() {
    let backend = std::sync::Arc::new(MemoryStateStore::seeded(
        TRACKER_STORAGE_KEY,
        json!({
            "projects": [{ "id": "p1", "name": "Alpha", "status": "Active" }, 17],
            "sessions": [
                { "id": "s1", "projectId": "p1", "start": T0, "end": T0 + 2_000, "seconds": 2 },
                { "id": "s2", "projectId": "p1", "start": "bad", "end": T0 },
            ],
            "activeTimer": null,
        }),
    ));
    let ctx = create_test_context_with(backend, lapse_common::time::MockClock::at(T0));

    assert_eq!(ctx.store.projects().len(), 1);
    assert_eq!(ctx.store.sessions().len(), 1);
    assert!(ctx.store.active_timer().is_none());
}

#[test]
fn test_replace_all_and_clear_all() {
    let mut ctx = create_test_context();
    ctx.project("Old");

    let report = ctx.store.replace_all(&json!({
        "projects": [{ "id": "imp", "name": "Imported" }],
        "sessions": [{ "id": "s1", "projectId": "imp", "start": T0, "end": T0 + 1_000 }, "junk"],
    }));
    assert_eq!(report.dropped_sessions, 1);
    assert_eq!(ctx.store.projects()[0].name, "Imported");
    assert_eq!(ctx.store.sessions()[0].seconds, 1);

    ctx.store.clear_all();
    assert!(ctx.store.projects().is_empty());
    assert_eq!(ctx.backend.policies(TRACKER_STORAGE_KEY).last(), Some(&WritePolicy::Immediate));
}
