//! Integration tests for the application commands
//!
//! Each test drives commands through an `AppContext` the way the CLI does
//! and checks the resulting tracker and idle state.

mod support;

use chrono::{Local, TimeZone};
use lapse_core::TimerStatus;
use lapse_domain::{LapseError, ScreenState, SessionSource};
use lapse_infra::export::ExportFormat;
use lapse_lib::commands::{self, TotalsRange};
use support::{TestApp, T0};

#[tokio::test]
async fn test_timer_start_by_name_and_stop_with_note() {
    let mut app = TestApp::new();
    let alpha = app.project("Alpha");

    let timer = commands::start_timer(&mut app.ctx, "  alpha ").expect("start by name");
    assert_eq!(timer.project_id, alpha.id);
    app.clock.advance_ms(90_000);
    assert!(matches!(commands::timer_status(&app.ctx), TimerStatus::Running { elapsed_ms: 90_000, .. }));

    let session = commands::stop_timer(&mut app.ctx, Some(" wrote tests ")).expect("stop");

    assert_eq!(session.seconds, 90);
    assert_eq!(session.note, "wrote tests");
    assert_eq!(session.source, SessionSource::Timer);
    assert_eq!(app.ctx.sessions.session(&session.id).map(|s| s.note.as_str()), Some("wrote tests"));
    assert_eq!(commands::timer_status(&app.ctx), TimerStatus::Idle);
}

#[tokio::test]
async fn test_blank_stop_note_leaves_session_note_empty() {
    let mut app = TestApp::new();
    let alpha = app.project("Alpha");
    commands::start_timer(&mut app.ctx, &alpha.id).expect("start");
    app.clock.advance_ms(5_000);

    let session = commands::stop_timer(&mut app.ctx, Some("   ")).expect("stop");

    assert_eq!(session.note, "");
    assert!(app.ctx.sessions.pending_note_session().is_none());
}

#[tokio::test]
async fn test_ambiguous_project_name_is_rejected() {
    let mut app = TestApp::new();
    app.project("Alpha");
    app.project("ALPHA");

    let result = commands::start_timer(&mut app.ctx, "alpha");

    assert!(matches!(result, Err(LapseError::Validation(_))));
    assert!(app.ctx.sessions.active_timer().is_none());
}

/// Validates allocating a queued away interval through the dialog.
///
/// Assertions:
/// - The signal opens the dialog on the new interval.
/// - `away show` pre-selects nothing without a suggestion and lists the project.
/// - Allocation records one idle-detection session and empties the queue.
#[tokio::test]
async fn test_away_allocate_records_idle_session() {
    let mut app = TestApp::new();
    let alpha = app.project("Alpha");
    app.step_away(120_000);
    assert!(app.ctx.dialog.is_open());

    let prompt = commands::show_away(&mut app.ctx).expect("show").expect("pending away");
    assert_eq!(prompt.summary.headline, "Away for 2m 0s");
    assert_eq!(prompt.queued, 1);
    assert_eq!(prompt.chooser.selected, "");
    assert!(prompt.chooser.options.iter().any(|o| o.value == alpha.id));

    let session = commands::allocate_away(&mut app.ctx, "Alpha", "hallway chat").expect("allocate");

    assert_eq!(session.project_id, alpha.id);
    assert_eq!((session.start, session.end, session.seconds), (T0, T0 + 120_000, 120));
    assert_eq!(session.source, SessionSource::IdleDetection);
    assert_eq!(session.note, "hallway chat");
    assert_eq!(app.ctx.detector.pending_count(), 0);
    assert!(!app.ctx.dialog.is_open());
}

#[tokio::test]
async fn test_away_create_makes_project_and_allocates() {
    let mut app = TestApp::new();
    app.step_away(61_000);

    let session =
        commands::create_and_allocate_away(&mut app.ctx, "Research", "reading").expect("create");

    let project = app.ctx.sessions.project(&session.project_id).expect("project created");
    assert_eq!(project.name, "Research");
    assert_eq!(project.note, "reading");
    assert_eq!(session.seconds, 61);
    assert_eq!(app.ctx.detector.pending_count(), 0);
}

#[tokio::test]
async fn test_away_commands_with_empty_queue() {
    let mut app = TestApp::new();
    app.project("Alpha");

    assert_eq!(commands::show_away(&mut app.ctx), Ok(None));
    assert!(matches!(commands::discard_away(&mut app.ctx), Err(LapseError::NotFound(_))));
    assert!(app.ctx.sessions.sessions().is_empty());
}

#[tokio::test]
async fn test_short_absence_queues_nothing() {
    let mut app = TestApp::new();

    commands::apply_signal(&mut app.ctx, ScreenState::Locked);
    app.clock.advance_ms(10_000);
    commands::apply_signal(&mut app.ctx, ScreenState::Unlocked);

    assert_eq!(app.ctx.detector.pending_count(), 0);
    assert!(!app.ctx.dialog.is_open());
}

#[tokio::test]
async fn test_day_totals_cover_sessions_of_that_day() {
    let mut app = TestApp::new();
    let alpha = app.project("Alpha");
    let beta = app.project("Beta");
    commands::add_session(&mut app.ctx, "Alpha", T0, T0 + 60_000, "").expect("add");
    commands::add_session(&mut app.ctx, &beta.id, T0 + 60_000, T0 + 90_000, "").expect("add");
    let day = Local.timestamp_millis_opt(T0).earliest().expect("valid instant").date_naive();

    let report = commands::totals(&app.ctx, TotalsRange::Day, Some(day), false);

    assert_eq!(report.anchor, day);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].project_id, alpha.id);
    assert_eq!(report.rows[0].total_seconds, 60);
    assert_eq!(report.total_seconds(), 90);

    let next_week = day + chrono::Duration::days(7);
    let later = commands::totals(&app.ctx, TotalsRange::Week, Some(next_week), false);
    assert_eq!(later.total_seconds(), 0);
}

#[tokio::test]
async fn test_edit_session_accepts_project_name() {
    let mut app = TestApp::new();
    app.project("Alpha");
    let beta = app.project("Beta");
    let session = commands::add_session(&mut app.ctx, "Alpha", T0, T0 + 60_000, "").expect("add");

    let patch = lapse_domain::SessionPatch {
        project_id: Some("beta".to_string()),
        ..lapse_domain::SessionPatch::default()
    };
    let edited = commands::edit_session(&mut app.ctx, &session.id, patch).expect("edit");

    assert_eq!(edited.project_id, beta.id);
    let listed = commands::list_sessions(&app.ctx, Some("Beta")).expect("list");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_delete_project_removes_its_sessions() {
    let mut app = TestApp::new();
    app.project("Alpha");
    commands::add_session(&mut app.ctx, "Alpha", T0, T0 + 1_000, "").expect("add");
    commands::add_session(&mut app.ctx, "Alpha", T0 + 5_000, T0 + 6_000, "").expect("add");

    assert_eq!(commands::delete_project(&mut app.ctx, "alpha"), Ok(2));
    assert!(app.ctx.sessions.sessions().is_empty());
}

/// Validates export, import and reset.
///
/// Assertions:
/// - CSV export has the header and one row per session.
/// - Importing a JSON export into an empty context restores it.
/// - `clear_all` empties the record.
#[tokio::test]
async fn test_export_import_round_trip_and_clear() {
    let mut app = TestApp::new();
    app.project("Alpha");
    commands::add_session(&mut app.ctx, "Alpha", T0, T0 + 60_000, "notes, with comma")
        .expect("add");

    let csv = commands::export_record(&app.ctx, ExportFormat::Csv).expect("csv");
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("\"Project\""));
    assert!(lines[1].contains("\"notes, with comma\""));

    let json = commands::export_record(&app.ctx, ExportFormat::Json).expect("json");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("export.json");
    std::fs::write(&path, json).expect("write export");

    let mut restored = TestApp::new();
    let report = commands::import_file(&mut restored.ctx, &path).expect("import");
    assert!(report.is_clean());
    assert_eq!(restored.ctx.sessions.record(), app.ctx.sessions.record());

    commands::clear_all(&mut restored.ctx).expect("clear");
    assert!(restored.ctx.sessions.projects().is_empty());
    assert!(restored.ctx.sessions.sessions().is_empty());
}

#[tokio::test]
async fn test_import_rejects_invalid_json() {
    let mut app = TestApp::new();
    app.project("Keep");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").expect("write");

    let result = commands::import_file(&mut app.ctx, &path);

    assert!(matches!(result, Err(LapseError::Validation(_))));
    assert_eq!(app.ctx.sessions.projects().len(), 1);
}
