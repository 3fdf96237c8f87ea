//! Screen lock signals

use lapse_core::SignalOutcome;
use lapse_domain::ScreenState;

use crate::context::AppContext;

/// Feed one lock/unlock signal to the detector
///
/// A newly queued away interval opens the reconciliation dialog unless it is
/// already showing an earlier one.
pub fn apply_signal(ctx: &mut AppContext, state: ScreenState) -> SignalOutcome {
    let outcome = ctx.detector.handle_signal(state, &ctx.sessions);
    if matches!(outcome, SignalOutcome::AwayQueued(_)) && !ctx.dialog.is_open() {
        ctx.dialog.open(&ctx.detector);
    }
    outcome
}
