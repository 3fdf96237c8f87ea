//! Plain-text rendering of command results

use std::fmt::Write as _;

use lapse_common::time::{duration_label, duration_label_ms, format_timestamp};
use lapse_core::{SessionStore, SignalOutcome, TimerStatus};
use lapse_domain::{LoadReport, Project, Session};

use crate::commands::{AwayPrompt, TotalsRange, TotalsReport};
use crate::context::StartupReport;

pub fn timer_status(status: &TimerStatus, store: &SessionStore) -> String {
    match status {
        TimerStatus::Idle => "No timer running".to_string(),
        TimerStatus::Running { project_id, start, elapsed_ms } => format!(
            "Timing {} since {} ({})",
            store.project_label(project_id),
            format_timestamp(*start),
            duration_label_ms(*elapsed_ms)
        ),
    }
}

/// One line per session: id, project, interval, duration, source, note
pub fn session_line(session: &Session, store: &SessionStore) -> String {
    let mut line = format!(
        "{}  {}  {} - {}  {}  [{}]",
        session.id,
        store.project_label(&session.project_id),
        format_timestamp(session.start),
        format_timestamp(session.end),
        duration_label(session.seconds),
        session.source
    );
    if !session.note.is_empty() {
        let _ = write!(line, "  {}", session.note);
    }
    line
}

pub fn project_line(project: &Project) -> String {
    let mut line = format!("{}  {}  ({})", project.id, project.option().label(), project.status);
    for (label, value) in [("no", &project.project_no), ("task", &project.task_no)] {
        if !value.is_empty() {
            let _ = write!(line, "  {label} {value}");
        }
    }
    if let Some(date) = project.start_date {
        let _ = write!(line, "  from {date}");
    }
    if let Some(date) = project.end_date {
        let _ = write!(line, "  until {date}");
    }
    line
}

pub fn totals(report: &TotalsReport) -> String {
    let mut out = match report.range {
        TotalsRange::Day => format!("Totals for {}\n", report.anchor),
        TotalsRange::Week => format!("Totals for the week of {}\n", report.anchor),
        TotalsRange::All => "Totals for all time\n".to_string(),
    };
    let width = report.rows.iter().map(|row| row.project_name.len()).max().unwrap_or(0);
    for row in &report.rows {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>12}  {} session(s)",
            row.project_name,
            row.label(),
            row.session_count
        );
    }
    let _ = write!(out, "Total: {}", duration_label(report.total_seconds()));
    out
}

pub fn away_prompt(prompt: &AwayPrompt) -> String {
    let mut out = prompt.summary.headline.clone();
    if !prompt.summary.detail.is_empty() {
        let _ = write!(out, "\n{}", prompt.summary.detail);
    }
    if prompt.queued > 1 {
        let _ = write!(out, "\n{} more interval(s) queued after this one", prompt.queued - 1);
    }
    let _ = write!(out, "\nProjects:");
    for option in prompt.chooser.options.iter().filter(|o| !o.value.is_empty()) {
        let marker = if option.value == prompt.chooser.selected { "*" } else { " " };
        let _ = write!(out, "\n {marker} {}  {}", option.value, option.label);
    }
    out
}

pub fn signal_outcome(outcome: &SignalOutcome) -> String {
    match outcome {
        SignalOutcome::LockRecorded { lock_start } => {
            format!("Locked at {}", format_timestamp(*lock_start))
        }
        SignalOutcome::AlreadyLocked => "Already locked; ignored".to_string(),
        SignalOutcome::ShortAway(away) => {
            format!("Back after {}", away_label(away.duration_ms))
        }
        SignalOutcome::AwayQueued(pending) => format!(
            "Away for {}; run `lapse away show` to reconcile",
            away_label(pending.duration_ms)
        ),
        SignalOutcome::NotLocked => "Not locked; ignored".to_string(),
    }
}

pub fn load_report(report: &LoadReport, store: &SessionStore) -> String {
    let mut out = format!(
        "Imported {} project(s) and {} session(s)",
        store.projects().len(),
        store.sessions().len()
    );
    if !report.is_clean() {
        let _ = write!(
            out,
            "; skipped {} malformed project(s) and {} malformed session(s)",
            report.dropped_projects, report.dropped_sessions
        );
        if report.dropped_timer {
            out.push_str(" and an invalid timer");
        }
    }
    out
}

fn away_label(duration_ms: u64) -> String {
    duration_label_ms(i64::try_from(duration_ms).unwrap_or(i64::MAX))
}

/// Lines worth telling the user before the command output, if any
pub fn startup_notice(report: &StartupReport, store: &SessionStore) -> Option<String> {
    let mut lines = Vec::new();
    if let Some(SignalOutcome::AwayQueued(pending)) = &report.recovered_lock {
        lines.push(format!(
            "Recovered a screen lock from the previous run ({} away)",
            away_label(pending.duration_ms)
        ));
    }
    if let Some(timer) = &report.resumed_timer {
        lines.push(format!(
            "Timer running for {} since {}",
            store.project_label(&timer.project_id),
            format_timestamp(timer.start)
        ));
    }
    if report.pending_away > 0 {
        lines.push(format!(
            "{} away interval(s) awaiting a decision; run `lapse away show`",
            report.pending_away
        ));
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use lapse_common::time::{day_bounds, MockClock};
    use lapse_core::ProjectTotal;
    use lapse_infra::MemoryStore;

    use super::*;

    fn row(name: &str, seconds: u64, count: usize) -> ProjectTotal {
        ProjectTotal {
            project_id: name.to_lowercase(),
            project_name: name.to_string(),
            session_count: count,
            total_seconds: seconds,
        }
    }

    #[test]
    fn totals_lists_rows_and_grand_total() {
        let anchor = NaiveDate::from_ymd_opt(2024, 5, 13).expect("date");
        let report = TotalsReport {
            range: TotalsRange::Day,
            anchor,
            bounds: day_bounds(anchor),
            rows: vec![row("Alpha", 3_661, 2), row("Beta", 0, 0)],
        };

        let text = totals(&report);
        assert!(text.starts_with("Totals for 2024-05-13\n"));
        assert!(text.contains("Alpha"));
        assert!(text.contains("1h 1m 1s"));
        assert!(text.ends_with("Total: 1h 1m 1s"));
    }

    #[test]
    fn quiet_startup_has_no_notice() {
        let store = SessionStore::load(Arc::new(MemoryStore::new()), Arc::new(MockClock::at(0)));
        assert_eq!(startup_notice(&StartupReport::default(), &store), None);

        let report = StartupReport { pending_away: 2, ..StartupReport::default() };
        let notice = startup_notice(&report, &store).expect("notice");
        assert!(notice.starts_with("2 away interval(s)"));
    }
}
