//! Long-running `watch` mode
//!
//! Shows the live timer label and feeds lock events from the detection
//! monitor into the idle detector until Ctrl-C or the end of the event
//! stream. State is re-read before every event so one-shot commands run
//! against the same data directory in the meantime are respected.

use std::io::Write;
use std::sync::Arc;

use lapse_core::LiveTimerDisplay;
use lapse_domain::ScreenState;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::output;
use crate::commands::apply_signal;
use crate::context::AppContext;

/// Run until interrupted or the lock event stream closes
///
/// # Errors
/// Returns write errors on `out`; detection problems are reported as
/// notices and never end the loop.
pub async fn watch(ctx: &mut AppContext, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut display = LiveTimerDisplay::new(Arc::clone(&ctx.clock), ctx.config.timer.tick_interval_ms);
    refresh_display(ctx, &mut display);

    let mut signals = ctx.monitor.start().await;
    if let Some(notice) = ctx.monitor.notice() {
        writeln!(out, "{notice}")?;
    }
    info!(detection_active = ctx.monitor.is_active(), "watch started");

    loop {
        tokio::select! {
            interrupted = tokio::signal::ctrl_c() => {
                if let Err(err) = interrupted {
                    warn!(error = %err, "failed to listen for ctrl-c");
                }
                break;
            }
            signal = next_signal(&mut signals) => {
                let Some(state) = signal else {
                    info!("lock event stream closed");
                    break;
                };
                ctx.reload();
                let outcome = apply_signal(ctx, state);
                writeln!(out, "\n{}", output::signal_outcome(&outcome))?;
                refresh_display(ctx, &mut display);
            }
        }
    }

    display.stop();
    ctx.monitor.stop();
    writeln!(out)?;
    Ok(())
}

async fn next_signal(signals: &mut Option<mpsc::Receiver<ScreenState>>) -> Option<ScreenState> {
    match signals {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn refresh_display(ctx: &AppContext, display: &mut LiveTimerDisplay) {
    let Some(timer) = ctx.sessions.active_timer() else {
        display.stop();
        return;
    };
    let project = ctx.sessions.project_label(&timer.project_id).to_string();
    display.start(timer.start, move |label| {
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "\r{project}  {label}");
        let _ = stdout.flush();
    });
}
