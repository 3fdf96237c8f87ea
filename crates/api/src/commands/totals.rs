//! Totals command

use chrono::NaiveDate;
use lapse_common::time::{all_time_bounds, day_bounds, week_bounds, TimeRange};
use lapse_core::ProjectTotal;
use lapse_domain::impl_wire_names;

use crate::context::AppContext;

/// Period the totals are computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TotalsRange {
    #[default]
    Day,
    Week,
    All,
}

impl_wire_names!(TotalsRange {
    Day => "day",
    Week => "week",
    All => "all",
});

/// Per-project totals with the period they cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsReport {
    pub range: TotalsRange,
    /// Day the day/week bounds were computed from
    pub anchor: NaiveDate,
    pub bounds: TimeRange,
    pub rows: Vec<ProjectTotal>,
}

impl TotalsReport {
    pub fn total_seconds(&self) -> u64 {
        self.rows.iter().map(|row| row.total_seconds).sum()
    }
}

/// Totals for the day or week containing `anchor` (today by default)
pub fn totals(
    ctx: &AppContext,
    range: TotalsRange,
    anchor: Option<NaiveDate>,
    include_archived: bool,
) -> TotalsReport {
    let anchor = anchor.unwrap_or_else(|| ctx.clock.now_local().date_naive());
    let bounds = match range {
        TotalsRange::Day => day_bounds(anchor),
        TotalsRange::Week => week_bounds(anchor),
        TotalsRange::All => all_time_bounds(),
    };
    let rows = ctx.sessions.totals_for_range(bounds, include_archived);
    TotalsReport { range, anchor, bounds, rows }
}
